//! Tag edits scoped to one memo.
//!
//! These work on the parsed tree, not on raw text. Only real tag nodes change;
//! code, escaped `\#` and longer tags are left alone, every other byte of the
//! memo is written back as it was, and removal does no whitespace cleanup
//! (`a #x b` becomes `a  b`).
//!
//! The `memos/-` sentinel is rejected. Collection-wide edits go through
//! `rename_tag`, `delete_tag` and `batch_delete_by_tag`.

use super::{load_owned, require_tag_path, ContentCodec};
use crate::context::RequestContext;
use crate::error::{MemotagError, Result};
use crate::model::{Memo, MemoId, MemoScope};
use crate::store::{MemoStore, UpdateMemo};
use crate::tags::build_payload;
use crate::tags::remove::{remove_tag_from_nodes, rename_tag_in_nodes};
use log::info;
use serde::Serialize;

pub const GLOBAL_RENAME_REJECTED: &str = "Global tag operations are not supported on memos/-. \
     Use rename_tag (memotag rename) to rename a tag across all memos.";

pub const GLOBAL_DELETE_REJECTED: &str = "Global tag operations are not supported on memos/-. \
     Use delete_tag (memotag delete) to remove a tag from all memos, \
     or batch_delete_by_tag (memotag batch-delete) to delete the memos.";

#[derive(Debug, Clone, Serialize)]
pub struct MemoTagResponse {
    pub memo_id: MemoId,
    /// False when the memo did not carry the tag and nothing was written.
    pub changed: bool,
}

fn resolve(name: &str, rejection: &str) -> Result<MemoId> {
    match MemoScope::parse(name)? {
        MemoScope::All => Err(MemotagError::InvalidArgument(rejection.to_string())),
        MemoScope::Memo(id) => Ok(id),
    }
}

fn persist<S: MemoStore>(
    store: &mut S,
    codec: ContentCodec<'_>,
    memo: &Memo,
    nodes: &[crate::content::Node],
) -> Result<()> {
    let content = codec.restore(nodes)?;
    store.update_memo(&UpdateMemo {
        id: memo.id,
        content: Some(content),
        payload: Some(build_payload(nodes)),
    })
}

pub fn rename_memo_tag<S: MemoStore>(
    store: &mut S,
    ctx: &RequestContext,
    codec: ContentCodec<'_>,
    memo_name: &str,
    old_tag: &str,
    new_tag: &str,
) -> Result<MemoTagResponse> {
    let id = resolve(memo_name, GLOBAL_RENAME_REJECTED)?;
    let old_path = require_tag_path(old_tag, "old_tag")?;
    let new_path = require_tag_path(new_tag, "new_tag")?;
    let memo = load_owned(store, ctx, &id)?;

    if !memo.payload.has_tag(&old_path) {
        return Ok(MemoTagResponse {
            memo_id: id,
            changed: false,
        });
    }

    let mut nodes = codec.parse(&memo.content)?;
    let renamed = rename_tag_in_nodes(&mut nodes, &old_path, &new_path);
    persist(store, codec, &memo, &nodes)?;

    info!(
        "event=memo_tag_rename module=commands status=ok memo={} old={} new={} nodes={}",
        id, old_path, new_path, renamed
    );
    Ok(MemoTagResponse {
        memo_id: id,
        changed: true,
    })
}

pub fn delete_memo_tag<S: MemoStore>(
    store: &mut S,
    ctx: &RequestContext,
    codec: ContentCodec<'_>,
    memo_name: &str,
    tag: &str,
) -> Result<MemoTagResponse> {
    let id = resolve(memo_name, GLOBAL_DELETE_REJECTED)?;
    let path = require_tag_path(tag, "tag")?;
    let memo = load_owned(store, ctx, &id)?;

    if !memo.payload.has_tag(&path) {
        return Ok(MemoTagResponse {
            memo_id: id,
            changed: false,
        });
    }

    let mut nodes = codec.parse(&memo.content)?;
    let removed = remove_tag_from_nodes(&mut nodes, &path);
    persist(store, codec, &memo, &nodes)?;

    info!(
        "event=memo_tag_delete module=commands status=ok memo={} path={} nodes={}",
        id, path, removed
    );
    Ok(MemoTagResponse {
        memo_id: id,
        changed: true,
    })
}
