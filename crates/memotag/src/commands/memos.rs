//! Memo write path.
//!
//! Every write parses the new content and stores the rebuilt payload with it,
//! so the tag cache never lags behind the text.

use super::{load_owned, write_content, ContentCodec};
use crate::context::RequestContext;
use crate::error::{MemotagError, Result};
use crate::model::{Memo, MemoId, MemoScope};
use crate::store::{FindMemo, MemoStore, TagFilter};
use log::info;

fn check_length(content: &str, limit: usize) -> Result<()> {
    let len = content.chars().count();
    if len > limit {
        return Err(MemotagError::InvalidArgument(format!(
            "content too long ({} characters, limit {})",
            len, limit
        )));
    }
    Ok(())
}

/// Resolves `memos/<uuid>`; the `memos/-` sentinel is not a single memo.
pub fn resolve_memo_name(name: &str) -> Result<MemoId> {
    match MemoScope::parse(name)? {
        MemoScope::Memo(id) => Ok(id),
        MemoScope::All => Err(MemotagError::InvalidArgument(format!(
            "{} does not name a single memo",
            name
        ))),
    }
}

pub fn create<S: MemoStore>(
    store: &mut S,
    ctx: &RequestContext,
    codec: ContentCodec<'_>,
    content_limit: usize,
    content: String,
    parent: Option<&str>,
) -> Result<Memo> {
    check_length(&content, content_limit)?;

    let mut memo = Memo::new(ctx.user_id, content);
    if let Some(parent_name) = parent {
        let parent_id = resolve_memo_name(parent_name)?;
        let parent = load_owned(store, ctx, &parent_id)?;
        memo = memo.with_parent(parent.id);
    }
    memo.payload = codec.payload_for(&memo.content)?;

    let memo = store.create_memo(memo)?;
    info!(
        "event=memo_create module=commands status=ok memo={} tags={}",
        memo.id,
        memo.payload.tags.len()
    );
    Ok(memo)
}

pub fn update<S: MemoStore>(
    store: &mut S,
    ctx: &RequestContext,
    codec: ContentCodec<'_>,
    content_limit: usize,
    name: &str,
    content: String,
) -> Result<Memo> {
    check_length(&content, content_limit)?;
    let id = resolve_memo_name(name)?;
    let memo = load_owned(store, ctx, &id)?;

    write_content(store, codec, &memo, content)?;
    info!("event=memo_update module=commands status=ok memo={}", id);

    store.get_memo(&id)?.ok_or(MemotagError::MemoNotFound(id))
}

pub fn get<S: MemoStore>(store: &S, ctx: &RequestContext, name: &str) -> Result<Memo> {
    let id = resolve_memo_name(name)?;
    load_owned(store, ctx, &id)
}

/// Top-level memos of the caller, optionally narrowed to a tag subtree.
pub fn list<S: MemoStore>(
    store: &S,
    ctx: &RequestContext,
    tag: Option<&str>,
) -> Result<Vec<Memo>> {
    let mut find = FindMemo::owned_by(ctx.user_id);
    if let Some(tag) = tag {
        let path = super::require_tag_path(tag, "tag")?;
        find = find.with_tag(TagFilter::StartsWith(path));
    }
    store.list_memos(&find)
}

/// Deletes a memo and its comments.
pub fn delete<S: MemoStore>(store: &mut S, ctx: &RequestContext, name: &str) -> Result<MemoId> {
    let id = resolve_memo_name(name)?;
    load_owned(store, ctx, &id)?;
    store.delete_memo(&id)?;
    info!("event=memo_delete module=commands status=ok memo={}", id);
    Ok(id)
}
