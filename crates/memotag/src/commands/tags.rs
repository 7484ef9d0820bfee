//! Tag listing and lookup.
//!
//! Both commands aggregate the caller's top-level memos from scratch. Nothing
//! is cached, so a listing taken while a rename is running may mix old and
//! new paths.

use super::require_tag_path;
use crate::context::RequestContext;
use crate::error::{MemotagError, Result};
use crate::store::{FindMemo, MemoStore};
use crate::tags::{aggregate, build_hierarchy, filter_by_prefix, TagMap, TagNode};
use log::debug;
use serde::Serialize;

#[derive(Debug, Clone)]
pub struct ListTagsRequest {
    /// Plain string prefix on the path. A missing leading `/` is added.
    pub path_prefix: Option<String>,
    pub include_memo_ids: bool,
    pub include_hierarchy: bool,
}

impl Default for ListTagsRequest {
    fn default() -> Self {
        Self {
            path_prefix: None,
            include_memo_ids: false,
            include_hierarchy: true,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ListTagsResponse {
    /// Sorted by path.
    pub tags: Vec<TagNode>,
    pub total_count: usize,
}

fn caller_tags<S: MemoStore>(store: &S, ctx: &RequestContext) -> Result<TagMap> {
    let memos = store.list_memos(&FindMemo::owned_by(ctx.user_id))?;
    let map = aggregate(&memos);
    debug!(
        "event=tag_aggregate module=commands status=ok memos={} tags={}",
        memos.len(),
        map.len()
    );
    Ok(map)
}

pub fn list_tags<S: MemoStore>(
    store: &S,
    ctx: &RequestContext,
    request: &ListTagsRequest,
) -> Result<ListTagsResponse> {
    let mut map = caller_tags(store, ctx)?;
    if let Some(prefix) = &request.path_prefix {
        map = filter_by_prefix(map, prefix);
    }
    if request.include_hierarchy {
        build_hierarchy(&mut map);
    }

    let tags: Vec<TagNode> = map
        .into_values()
        .map(|mut node| {
            if !request.include_memo_ids {
                node.memo_ids.clear();
            }
            node
        })
        .collect();

    Ok(ListTagsResponse {
        total_count: tags.len(),
        tags,
    })
}

/// One tag with hierarchy computed over the caller's full tag set.
pub fn get_tag<S: MemoStore>(
    store: &S,
    ctx: &RequestContext,
    tag_path: &str,
    include_memo_ids: bool,
) -> Result<TagNode> {
    let path = require_tag_path(tag_path, "tag_path")?;
    let mut map = caller_tags(store, ctx)?;
    if !map.contains_key(&path) {
        return Err(MemotagError::TagNotFound(path));
    }
    build_hierarchy(&mut map);

    let mut node = map.remove(&path).ok_or(MemotagError::TagNotFound(path))?;
    if !include_memo_ids {
        node.memo_ids.clear();
    }
    Ok(node)
}
