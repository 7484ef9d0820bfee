//! Aggregation of per-memo tag caches into a [`TagMap`].
//!
//! Aggregation is a pure function of the memos handed in. Nothing is cached
//! between calls; every listing rebuilds the map from the memos' payloads.
//! Callers decide which memos to pass (owner scoping, comment exclusion).

use super::path_segments;
use crate::model::{Memo, MemoId};
use serde::Serialize;
use std::collections::BTreeMap;

/// One tag path and the memos carrying it. Request-scoped, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagNode {
    pub path: String,
    pub segments: Vec<String>,
    /// Memos carrying this exact path, in memo iteration order.
    pub memo_ids: Vec<MemoId>,
    pub direct_count: usize,
    /// `direct_count` until [`super::build_hierarchy`] rolls children in.
    pub total_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_path: Option<String>,
    pub child_paths: Vec<String>,
}

impl TagNode {
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            segments: path_segments(&path),
            path,
            memo_ids: Vec::new(),
            direct_count: 0,
            total_count: 0,
            parent_path: None,
            child_paths: Vec::new(),
        }
    }

    fn add_memo(&mut self, id: MemoId) {
        if !self.memo_ids.contains(&id) {
            self.memo_ids.push(id);
            self.direct_count += 1;
            self.total_count = self.direct_count;
        }
    }
}

/// Tag path → node, ordered by path.
pub type TagMap = BTreeMap<String, TagNode>;

/// Merges the cached tag paths of `memos` into a fresh map.
pub fn aggregate<'a, I>(memos: I) -> TagMap
where
    I: IntoIterator<Item = &'a Memo>,
{
    let mut map = TagMap::new();
    for memo in memos {
        for tag in &memo.payload.tags {
            if tag.is_empty() {
                continue;
            }
            let path = if tag.starts_with('/') {
                tag.clone()
            } else {
                format!("/{}", tag)
            };
            map.entry(path.clone())
                .or_insert_with(|| TagNode::new(path))
                .add_memo(memo.id);
        }
    }
    map
}

/// Keeps only nodes whose path starts with `prefix`.
///
/// This is a plain string prefix test: `/work` keeps `/workshop` too. A prefix
/// without a leading `/` gets one. An empty prefix keeps everything.
pub fn filter_by_prefix(map: TagMap, prefix: &str) -> TagMap {
    if prefix.is_empty() {
        return map;
    }
    let prefix = if prefix.starts_with('/') {
        prefix.to_string()
    } else {
        format!("/{}", prefix)
    };
    map.into_iter()
        .filter(|(path, _)| path.starts_with(&prefix))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MemoPayload;

    fn memo_with_tags(tags: &[&str]) -> Memo {
        let mut memo = Memo::new(1, "");
        memo.payload = MemoPayload {
            tags: tags.iter().map(|t| t.to_string()).collect(),
            ..Default::default()
        };
        memo
    }

    #[test]
    fn test_counts_and_ids() {
        let m1 = memo_with_tags(&["/work"]);
        let m2 = memo_with_tags(&["/work", "/project"]);
        let map = aggregate([&m1, &m2]);

        let work = &map["/work"];
        assert_eq!(work.memo_ids, vec![m1.id, m2.id]);
        assert_eq!(work.direct_count, 2);
        assert_eq!(work.total_count, 2);
        assert_eq!(work.segments, vec!["work"]);
        assert_eq!(map["/project"].direct_count, 1);
    }

    #[test]
    fn test_sum_of_direct_counts_equals_membership_pairs() {
        let memos = vec![
            memo_with_tags(&["/a", "/a/b"]),
            memo_with_tags(&["/a/b", "/c"]),
            memo_with_tags(&["/c"]),
            memo_with_tags(&[]),
        ];
        let map = aggregate(&memos);
        let pairs: usize = memos.iter().map(|m| m.payload.tags.len()).sum();
        let direct: usize = map.values().map(|n| n.direct_count).sum();
        assert_eq!(direct, pairs);
    }

    #[test]
    fn test_memo_ids_follow_iteration_order() {
        let memos: Vec<Memo> = (0..4).map(|_| memo_with_tags(&["/x"])).collect();
        let map = aggregate(memos.iter().rev());
        let expected: Vec<MemoId> = memos.iter().rev().map(|m| m.id).collect();
        assert_eq!(map["/x"].memo_ids, expected);
    }

    #[test]
    fn test_duplicate_cache_entry_counts_once() {
        let memo = memo_with_tags(&["/dup", "/dup"]);
        let map = aggregate([&memo]);
        assert_eq!(map["/dup"].direct_count, 1);
    }

    #[test]
    fn test_unslashed_cache_entries_are_prefixed() {
        let memo = memo_with_tags(&["legacy", ""]);
        let map = aggregate([&memo]);
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["/legacy"]);
    }

    #[test]
    fn test_no_placeholder_ancestors() {
        let memo = memo_with_tags(&["/work/a"]);
        let map = aggregate([&memo]);
        assert!(!map.contains_key("/work"));
    }

    #[test]
    fn test_prefix_filter_is_plain_string_prefix() {
        let memo = memo_with_tags(&["/work", "/work/a", "/workshop", "/home"]);
        let map = filter_by_prefix(aggregate([&memo]), "work");
        assert_eq!(
            map.keys().cloned().collect::<Vec<_>>(),
            vec!["/work", "/work/a", "/workshop"]
        );
    }

    #[test]
    fn test_empty_prefix_keeps_all() {
        let memo = memo_with_tags(&["/a", "/b"]);
        assert_eq!(filter_by_prefix(aggregate([&memo]), "").len(), 2);
    }
}
