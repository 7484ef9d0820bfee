//! Global tag rename.
//!
//! Selection is by exact membership of the old path in each memo's payload.
//! The edit itself is a plain substring replacement of `#old` with `#new` on
//! the raw content (see [`crate::tags::remove::replace_tag_marker`]), so it
//! also rewrites markers inside code and the front of longer tags such as
//! `#old/child` or `#oldish`.
//!
//! `move_children` is accepted but does not widen selection: a memo carrying
//! only `/old/child` is not touched.

use super::{require_tag_path, write_content, ContentCodec};
use crate::context::RequestContext;
use crate::error::{MemotagError, Result};
use crate::model::MemoId;
use crate::store::{FindMemo, MemoStore, TagFilter};
use crate::tags::remove::replace_tag_marker;
use log::{info, warn};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, Serialize)]
pub struct RenameTagResponse {
    pub affected_memo_ids: Vec<MemoId>,
    /// Old path → new path.
    pub renamed_paths: BTreeMap<String, String>,
}

pub fn rename_tag<S: MemoStore>(
    store: &mut S,
    ctx: &RequestContext,
    codec: ContentCodec<'_>,
    old_path: &str,
    new_path: &str,
    move_children: bool,
) -> Result<RenameTagResponse> {
    let old_path = require_tag_path(old_path, "old_tag_path")?;
    let new_path = require_tag_path(new_path, "new_tag_path")?;

    let memos = store.list_memos(
        &FindMemo::owned_by(ctx.user_id).with_tag(TagFilter::In(old_path.clone())),
    )?;
    if memos.is_empty() {
        return Err(MemotagError::NoMemosWithTag(old_path));
    }

    let mut response = RenameTagResponse::default();
    for memo in &memos {
        ctx.ensure_active()?;
        let content = replace_tag_marker(&memo.content, &old_path, &new_path);
        if let Err(err) = write_content(store, codec, memo, content) {
            warn!(
                "event=tag_rename module=commands status=error memo={} done={} err={}",
                memo.id,
                response.affected_memo_ids.len(),
                err
            );
            return Err(MemotagError::for_memo(memo.id, err));
        }
        response.affected_memo_ids.push(memo.id);
        response
            .renamed_paths
            .insert(old_path.clone(), new_path.clone());
    }

    info!(
        "event=tag_rename module=commands status=ok old={} new={} move_children={} affected={}",
        old_path,
        new_path,
        move_children,
        response.affected_memo_ids.len()
    );
    Ok(response)
}
