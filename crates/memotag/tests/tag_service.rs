use memotag::api::{DeleteStrategy, ListTagsRequest};
use memotag::model::Memo;
use memotag::store::fs::FileStore;
use memotag::store::memory::InMemoryStore;
use memotag::store::{FindMemo, MemoStore};
use memotag::tags::{total_count, TagMap, TagNode};
use memotag::{ErrorKind, MemotagApi, MemotagConfig, RequestContext};
use std::collections::HashSet;
use tempfile::TempDir;

fn api() -> MemotagApi<InMemoryStore> {
    MemotagApi::new(InMemoryStore::new(), MemotagConfig::default())
}

fn seed<S: MemoStore>(api: &mut MemotagApi<S>, ctx: &RequestContext, contents: &[&str]) -> Vec<Memo> {
    contents
        .iter()
        .map(|c| api.create_memo(ctx, c.to_string(), None).unwrap())
        .collect()
}

#[test]
fn test_cached_paths_are_canonical_and_unique() {
    let mut api = api();
    let ctx = RequestContext::new(1);
    seed(
        &mut api,
        &ctx,
        &[
            "#a #a #b/c",
            "- [ ] task #todo/next\n- [x] done #todo",
            "> quoted #q and `#notatag`",
            "```\n#not-a-tag\n```\n\n#after",
        ],
    );

    for memo in api.list_memos(&ctx, None).unwrap() {
        let tags = &memo.payload.tags;
        assert!(tags.iter().all(|t| t.starts_with('/')), "{:?}", tags);
        let unique: HashSet<&String> = tags.iter().collect();
        assert_eq!(unique.len(), tags.len());
        assert!(!tags.iter().any(|t| t.contains("notatag") || t.contains("not-a-tag")));
    }
}

#[test]
fn test_direct_counts_sum_to_memberships() {
    let mut api = api();
    let ctx = RequestContext::new(1);
    seed(
        &mut api,
        &ctx,
        &["#x #y", "#x/z", "#y #x/z #w", "no tags"],
    );

    let memberships: usize = api
        .list_memos(&ctx, None)
        .unwrap()
        .iter()
        .map(|m| m.payload.tags.len())
        .sum();
    let resp = api.list_tags(&ctx, &ListTagsRequest::default()).unwrap();
    let direct: usize = resp.tags.iter().map(|t| t.direct_count).sum();
    assert_eq!(direct, memberships);
    assert_eq!(direct, 6);
}

#[test]
fn test_three_level_totals_and_children() {
    let mut api = api();
    let ctx = RequestContext::new(1);
    seed(
        &mut api,
        &ctx,
        &[
            "#work",
            "#work/project1",
            "#work/project1/backend",
            "#work/project1/backend again",
            "#work/project2 #workshop",
        ],
    );

    let resp = api.list_tags(&ctx, &ListTagsRequest::default()).unwrap();
    for node in &resp.tags {
        let children_total: usize = node
            .child_paths
            .iter()
            .map(|c| resp.tags.iter().find(|t| &t.path == c).unwrap().total_count)
            .sum();
        assert_eq!(node.total_count, node.direct_count + children_total);

        for other in &resp.tags {
            let expected = other.path.starts_with(&format!("{}/", node.path))
                && other.segments.len() == node.segments.len() + 1;
            assert_eq!(node.child_paths.contains(&other.path), expected);
        }
    }

    let work = api.get_tag(&ctx, "/work", false).unwrap();
    assert_eq!(work.total_count, 5);
    assert_eq!(work.child_paths, vec!["/work/project1", "/work/project2"]);
}

#[test]
fn test_cycle_in_manufactured_map_terminates() {
    let mut map = TagMap::new();
    let mut a = TagNode::new("/a");
    a.direct_count = 1;
    a.child_paths = vec!["/b".into()];
    let mut b = TagNode::new("/b");
    b.direct_count = 1;
    b.child_paths = vec!["/a".into()];
    map.insert(a.path.clone(), a);
    map.insert(b.path.clone(), b);

    assert_eq!(total_count(&map, "/a"), 2);
    assert_eq!(total_count(&map, "/b"), 2);
}

#[test]
fn test_rename_tag_moves_markers() {
    let mut api = api();
    let ctx = RequestContext::new(1);
    let memos = seed(&mut api, &ctx, &["alpha #old", "beta #old #keep", "gamma #keep"]);

    let err = api.rename_tag(&ctx, "absent", "x", false).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let resp = api.rename_tag(&ctx, "old", "fresh", false).unwrap();
    assert_eq!(resp.affected_memo_ids, vec![memos[0].id, memos[1].id]);
    for memo in &memos[..2] {
        let content = api.get_memo(&ctx, &memo.name()).unwrap().content;
        assert!(!content.contains("#old"));
        assert!(content.contains("#fresh"));
    }
    assert!(api.get_tag(&ctx, "old", false).is_err());
    assert_eq!(api.get_tag(&ctx, "fresh", false).unwrap().direct_count, 2);
}

#[test]
fn test_delete_tag_strategies() {
    let mut api = api();
    let ctx = RequestContext::new(1);
    let memos = seed(
        &mut api,
        &ctx,
        &["This is a memo with #work #project tags", "#gone with the wind"],
    );

    api.delete_tag(&ctx, "work", DeleteStrategy::RemoveFromContent)
        .unwrap();
    assert_eq!(
        api.get_memo(&ctx, &memos[0].name()).unwrap().content,
        "This is a memo with #project tags"
    );

    let resp = api
        .delete_tag(&ctx, "gone", DeleteStrategy::DeleteRelatedMemos)
        .unwrap();
    assert_eq!(resp.affected_memo_ids, vec![memos[1].id]);
    assert_eq!(
        api.get_memo(&ctx, &memos[1].name()).unwrap_err().kind(),
        ErrorKind::NotFound
    );

    let err = api
        .delete_tag(&ctx, "project", "bogus".parse().unwrap_or_default())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    assert!("bogus".parse::<DeleteStrategy>().is_err());
}

#[test]
fn test_batch_delete_dry_run_then_real() {
    let mut api = api();
    let ctx = RequestContext::new(1);
    let memos = seed(
        &mut api,
        &ctx,
        &["#proj", "#proj/a", "#proj/a/deep #other", "#projector", "#misc"],
    );
    let before = api.store().list_memos(&FindMemo::default()).unwrap();

    let dry = api.batch_delete_by_tag(&ctx, "proj", true, true).unwrap();
    assert!(dry.dry_run);
    assert_eq!(dry.deleted_count, 3);
    assert_eq!(dry.affected_tag_paths, vec!["/proj", "/proj/a", "/proj/a/deep"]);
    assert_eq!(api.store().list_memos(&FindMemo::default()).unwrap(), before);

    let real = api.batch_delete_by_tag(&ctx, "proj", true, false).unwrap();
    assert_eq!(real.deleted_memo_ids, dry.deleted_memo_ids);
    assert_eq!(real.affected_tag_paths, dry.affected_tag_paths);

    let left: Vec<_> = api.list_memos(&ctx, None).unwrap().iter().map(|m| m.id).collect();
    assert_eq!(left, vec![memos[3].id, memos[4].id]);
}

#[test]
fn test_example_a_structural_removal_keeps_spacing() {
    let mut api = api();
    let ctx = RequestContext::new(1);
    let memo = seed(&mut api, &ctx, &["Meeting notes #work are important"]).remove(0);

    api.delete_memo_tag(&ctx, &memo.name(), "work").unwrap();
    assert_eq!(
        api.get_memo(&ctx, &memo.name()).unwrap().content,
        "Meeting notes  are important"
    );
}

#[test]
fn test_single_memo_edits_keep_the_rest_of_the_markdown() {
    let mut api = api();
    let ctx = RequestContext::new(1);
    let content = "## Plan #q3\n\n* step \\#1 for #q3\n* [ ] [spec](https://x.io 'v2') &amp; *more*  \n  done\n\n***\n";
    let memo = seed(&mut api, &ctx, &[content]).remove(0);
    assert_eq!(memo.payload.tags, vec!["/q3"]);

    api.rename_memo_tag(&ctx, &memo.name(), "q3", "q4").unwrap();
    let renamed = content.replace("#q3", "#q4");
    assert_eq!(api.get_memo(&ctx, &memo.name()).unwrap().content, renamed);

    api.delete_memo_tag(&ctx, &memo.name(), "q4").unwrap();
    let memo = api.get_memo(&ctx, &memo.name()).unwrap();
    assert_eq!(memo.content, renamed.replace("#q4", ""));
    assert!(memo.payload.tags.is_empty());
    assert!(memo.payload.property.has_incomplete_tasks);
}

#[test]
fn test_global_sentinel_points_to_global_operations() {
    let mut api = api();
    let ctx = RequestContext::new(1);
    seed(&mut api, &ctx, &["#a"]);

    let err = api.rename_memo_tag(&ctx, "memos/-", "a", "b").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    assert!(err.to_string().contains("rename_tag"));

    let err = api.delete_memo_tag(&ctx, "memos/-", "a").unwrap_err();
    assert!(err.to_string().contains("delete_tag"));
    assert!(err.to_string().contains("batch_delete_by_tag"));
}

#[test]
fn test_partial_failure_keeps_committed_writes() {
    let store = InMemoryStore::new();
    let mut api = MemotagApi::new(store, MemotagConfig::default());
    let ctx = RequestContext::new(1);
    let memos = seed(&mut api, &ctx, &["one #t", "two #t", "three #t"]);

    api.store().fail_writes_after(1);
    let err = api
        .delete_tag(&ctx, "t", DeleteStrategy::RemoveFromContent)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Internal);
    assert!(err.to_string().contains(&memos[1].id.to_string()));

    let contents: Vec<String> = api
        .store()
        .list_memos(&FindMemo::default())
        .unwrap()
        .into_iter()
        .map(|m| m.content)
        .collect();
    assert_eq!(contents, vec!["one", "two #t", "three #t"]);
}

#[test]
fn test_owner_isolation() {
    let mut api = api();
    let alice = RequestContext::new(1);
    let bob = RequestContext::new(2);
    let memo = seed(&mut api, &alice, &["#shared"]).remove(0);
    seed(&mut api, &bob, &["#shared"]);

    let resp = api.delete_tag(&bob, "shared", DeleteStrategy::RemoveFromContent).unwrap();
    assert_eq!(resp.affected_memo_ids.len(), 1);
    assert_eq!(api.get_memo(&alice, &memo.name()).unwrap().content, "#shared");
    assert_eq!(
        api.delete_memo_tag(&bob, &memo.name(), "shared").unwrap_err().kind(),
        ErrorKind::PermissionDenied
    );
}

#[test]
fn test_file_store_round_trip_through_api() {
    let dir = TempDir::new().unwrap();
    let ctx = RequestContext::new(1);
    {
        let mut api = MemotagApi::new(FileStore::new(dir.path().to_path_buf()), MemotagConfig::default());
        seed(&mut api, &ctx, &["#persist/me", "#persist"]);
        api.rename_tag(&ctx, "persist", "kept", false).unwrap();
    }

    let api = MemotagApi::new(FileStore::new(dir.path().to_path_buf()), MemotagConfig::default());
    let resp = api.list_tags(&ctx, &ListTagsRequest::default()).unwrap();
    let paths: Vec<&str> = resp.tags.iter().map(|t| t.path.as_str()).collect();
    assert_eq!(paths, vec!["/kept", "/persist/me"]);
}
