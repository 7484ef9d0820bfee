//! # Command Layer
//!
//! This module contains the **core business logic** of memotag. Each command
//! is a plain function generic over [`MemoStore`], taking the caller's
//! [`RequestContext`] and returning a structured response.
//!
//! ## Role and Responsibilities
//!
//! Commands:
//! - Validate caller input (tag paths, strategies, memo names)
//! - Select memos through the store's filters
//! - Edit content, rebuild payloads, persist memo by memo
//! - Return typed responses the UI layer renders as it likes
//!
//! ## What Commands Do NOT Do
//!
//! - **Any terminal I/O**: no stdout, stderr or colors
//! - **Argument parsing**: that's the CLI layer's job
//! - **Transactions**: a multi-memo loop that fails halfway stops there;
//!   memos written before the failure stay written
//!
//! ## Loops and Cancellation
//!
//! Loops over several memos check [`RequestContext::ensure_active`] before
//! each memo and wrap per-memo failures with the memo id
//! ([`MemotagError::for_memo`]).
//!
//! ## Command Modules
//!
//! - [`memos`]: create, update, get, list and delete memos
//! - [`tags`]: list and get aggregated tags
//! - [`rename`]: global tag rename
//! - [`delete`]: global tag delete and batch delete by tag
//! - [`memo_tags`]: rename/delete a tag inside one memo
//! - [`rebuild`]: recompute every memo's payload

use crate::content::{ContentParser, ContentRestorer, Node};
use crate::context::RequestContext;
use crate::error::{MemotagError, Result};
use crate::model::{Memo, MemoPayload};
use crate::store::{MemoStore, UpdateMemo};
use crate::tags::build_payload;

pub mod delete;
pub mod memo_tags;
pub mod memos;
pub mod rebuild;
pub mod rename;
pub mod tags;

/// Parser and restorer pair used by every command that reads or rewrites
/// content.
#[derive(Clone, Copy)]
pub struct ContentCodec<'a> {
    pub parser: &'a dyn ContentParser,
    pub restorer: &'a dyn ContentRestorer,
}

impl<'a> ContentCodec<'a> {
    pub fn new(parser: &'a dyn ContentParser, restorer: &'a dyn ContentRestorer) -> Self {
        Self { parser, restorer }
    }

    pub fn parse(&self, content: &str) -> Result<Vec<Node>> {
        Ok(self.parser.parse(content)?)
    }

    pub fn restore(&self, nodes: &[Node]) -> Result<String> {
        Ok(self.restorer.restore(nodes)?)
    }

    pub fn payload_for(&self, content: &str) -> Result<MemoPayload> {
        Ok(build_payload(&self.parse(content)?))
    }
}

/// Writes new content and its freshly built payload back to one memo.
pub(crate) fn write_content<S: MemoStore>(
    store: &mut S,
    codec: ContentCodec<'_>,
    memo: &Memo,
    content: String,
) -> Result<()> {
    let payload = codec.payload_for(&content)?;
    store.update_memo(&UpdateMemo {
        id: memo.id,
        content: Some(content),
        payload: Some(payload),
    })
}

/// Loads a memo and checks the caller owns it.
pub(crate) fn load_owned<S: MemoStore>(
    store: &S,
    ctx: &RequestContext,
    id: &crate::model::MemoId,
) -> Result<Memo> {
    let memo = store
        .get_memo(id)?
        .ok_or(MemotagError::MemoNotFound(*id))?;
    if memo.creator_id != ctx.user_id {
        return Err(MemotagError::PermissionDenied(format!(
            "memo {} belongs to another user",
            id
        )));
    }
    Ok(memo)
}

/// Validates a caller-supplied tag path, mapping failures to `InvalidArgument`.
pub(crate) fn require_tag_path(input: &str, field: &str) -> Result<String> {
    crate::tags::validation::validate_tag_path(input)
        .map_err(|e| MemotagError::InvalidArgument(format!("{}: {}", field, e)))
}
