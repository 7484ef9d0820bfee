//! Global tag deletion and batch memo deletion by tag.
//!
//! ## DeleteTag strategies
//!
//! - [`DeleteStrategy::RemoveFromContent`]: strips the marker text from every
//!   memo carrying the exact path (substring editing, result trimmed), then
//!   rebuilds the payload. Memos survive.
//! - [`DeleteStrategy::DeleteRelatedMemos`]: deletes every such memo; the
//!   store removes their comments with them.
//!
//! ## Batch delete
//!
//! [`batch_delete_by_tag`] deletes memos by exact path, or by subtree when
//! `include_children` is set. A dry run reports the same ids and paths without
//! writing anything. Reported paths are only those actually seen on selected
//! memos: the requested path first, then descendants in encounter order.

use super::{require_tag_path, write_content, ContentCodec};
use crate::context::RequestContext;
use crate::error::{MemotagError, Result};
use crate::model::{Memo, MemoId};
use crate::store::{FindMemo, MemoStore, TagFilter};
use crate::tags::is_same_or_descendant;
use crate::tags::remove::strip_tag_marker;
use log::{info, warn};
use serde::Serialize;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeleteStrategy {
    #[default]
    Unspecified,
    RemoveFromContent,
    DeleteRelatedMemos,
}

impl FromStr for DeleteStrategy {
    type Err = MemotagError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "unspecified" => Ok(DeleteStrategy::Unspecified),
            "remove-from-content" | "remove" => Ok(DeleteStrategy::RemoveFromContent),
            "delete-related-memos" | "delete-memos" => Ok(DeleteStrategy::DeleteRelatedMemos),
            other => Err(MemotagError::InvalidArgument(format!(
                "unsupported delete strategy: {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DeleteTagResponse {
    pub affected_memo_ids: Vec<MemoId>,
    pub deleted_tag_paths: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchDeleteResponse {
    pub deleted_memo_ids: Vec<MemoId>,
    pub deleted_count: usize,
    pub affected_tag_paths: Vec<String>,
    pub dry_run: bool,
}

pub fn delete_tag<S: MemoStore>(
    store: &mut S,
    ctx: &RequestContext,
    codec: ContentCodec<'_>,
    tag_path: &str,
    strategy: DeleteStrategy,
) -> Result<DeleteTagResponse> {
    let path = require_tag_path(tag_path, "tag_path")?;
    let keep_memos = match strategy {
        DeleteStrategy::RemoveFromContent => true,
        DeleteStrategy::DeleteRelatedMemos => false,
        DeleteStrategy::Unspecified => {
            return Err(MemotagError::InvalidArgument(
                "unsupported delete strategy".to_string(),
            ))
        }
    };

    let memos = store.list_memos(
        &FindMemo::owned_by(ctx.user_id).with_tag(TagFilter::In(path.clone())),
    )?;

    let mut response = DeleteTagResponse::default();
    for memo in &memos {
        ctx.ensure_active()?;
        let outcome = if keep_memos {
            let content = strip_tag_marker(&memo.content, &path);
            write_content(store, codec, memo, content)
        } else {
            store.delete_memo(&memo.id)
        };
        if let Err(err) = outcome {
            warn!(
                "event=tag_delete module=commands status=error memo={} done={} err={}",
                memo.id,
                response.affected_memo_ids.len(),
                err
            );
            return Err(MemotagError::for_memo(memo.id, err));
        }
        response.affected_memo_ids.push(memo.id);
    }

    if !response.affected_memo_ids.is_empty() {
        response.deleted_tag_paths.push(path.clone());
    }
    info!(
        "event=tag_delete module=commands status=ok path={} strategy={:?} affected={}",
        path,
        strategy,
        response.affected_memo_ids.len()
    );
    Ok(response)
}

/// Paths on `memo` that the batch touches, appended to `paths` once each.
fn collect_paths(memo: &Memo, path: &str, include_children: bool, paths: &mut Vec<String>) {
    if paths.is_empty() {
        paths.push(path.to_string());
    }
    if !include_children {
        return;
    }
    for tag in &memo.payload.tags {
        if is_same_or_descendant(path, tag) && !paths.contains(tag) {
            paths.push(tag.clone());
        }
    }
}

pub fn batch_delete_by_tag<S: MemoStore>(
    store: &mut S,
    ctx: &RequestContext,
    tag_path: &str,
    include_children: bool,
    dry_run: bool,
) -> Result<BatchDeleteResponse> {
    if tag_path.is_empty() {
        return Err(MemotagError::InvalidArgument(
            "tag_path is required".to_string(),
        ));
    }
    let path = require_tag_path(tag_path, "tag_path")?;

    let filter = if include_children {
        TagFilter::StartsWith(path.clone())
    } else {
        TagFilter::In(path.clone())
    };
    let memos = store.list_memos(&FindMemo::owned_by(ctx.user_id).with_tag(filter))?;

    let mut response = BatchDeleteResponse {
        dry_run,
        ..Default::default()
    };
    for memo in &memos {
        ctx.ensure_active()?;
        if !dry_run {
            if let Err(err) = store.delete_memo(&memo.id) {
                warn!(
                    "event=tag_batch_delete module=commands status=error memo={} done={} err={}",
                    memo.id, response.deleted_count, err
                );
                return Err(MemotagError::for_memo(memo.id, err));
            }
        }
        response.deleted_memo_ids.push(memo.id);
        response.deleted_count += 1;
        collect_paths(memo, &path, include_children, &mut response.affected_tag_paths);
    }

    info!(
        "event=tag_batch_delete module=commands status=ok path={} children={} dry_run={} count={}",
        path, include_children, dry_run, response.deleted_count
    );
    Ok(response)
}
