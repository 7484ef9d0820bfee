//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer. It is the single
//! entry point for every memotag operation, whichever client drives it.
//!
//! ## Role and Responsibilities
//!
//! The API facade:
//! - **Owns the collaborators**: the store, the content parser and restorer,
//!   and the loaded [`MemotagConfig`]
//! - **Dispatches** to the matching command function
//! - **Returns structured types**: responses, never strings
//!
//! ## What the API Does NOT Do
//!
//! - **Business logic**: that belongs in `commands/*.rs`
//! - **I/O operations**: no stdout, stderr or file formatting
//!
//! ## Generic Over MemoStore
//!
//! `MemotagApi<S: MemoStore>` is generic over the storage backend:
//! - Production: `MemotagApi<FileStore>`
//! - Testing: `MemotagApi<InMemoryStore>`
//!
//! Parser and restorer are boxed trait objects so a client can swap the
//! content dialect without touching the store type.
//!
//! ## Calling Convention
//!
//! Every method takes the caller's [`RequestContext`] first. Reads borrow
//! `&self`; anything that may write borrows `&mut self`.

use crate::commands::{self, ContentCodec};
use crate::config::MemotagConfig;
use crate::content::{ContentParser, ContentRestorer, MarkdownParser, MarkdownRestorer};
use crate::context::RequestContext;
use crate::error::Result;
use crate::model::{Memo, MemoId};
use crate::store::MemoStore;
use crate::tags::TagNode;

pub use commands::delete::{BatchDeleteResponse, DeleteStrategy, DeleteTagResponse};
pub use commands::memo_tags::MemoTagResponse;
pub use commands::rebuild::RebuildReport;
pub use commands::rename::RenameTagResponse;
pub use commands::tags::{ListTagsRequest, ListTagsResponse};

/// The main API facade for memotag operations.
pub struct MemotagApi<S: MemoStore> {
    store: S,
    parser: Box<dyn ContentParser>,
    restorer: Box<dyn ContentRestorer>,
    config: MemotagConfig,
}

impl<S: MemoStore> MemotagApi<S> {
    /// Markdown parser and restorer.
    pub fn new(store: S, config: MemotagConfig) -> Self {
        Self::with_codec(
            store,
            config,
            Box::new(MarkdownParser::new()),
            Box::new(MarkdownRestorer::new()),
        )
    }

    pub fn with_codec(
        store: S,
        config: MemotagConfig,
        parser: Box<dyn ContentParser>,
        restorer: Box<dyn ContentRestorer>,
    ) -> Self {
        Self {
            store,
            parser,
            restorer,
            config,
        }
    }

    pub fn config(&self) -> &MemotagConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn parts(&mut self) -> (&mut S, ContentCodec<'_>) {
        (
            &mut self.store,
            ContentCodec::new(self.parser.as_ref(), self.restorer.as_ref()),
        )
    }

    // --- Memos ---

    pub fn create_memo(
        &mut self,
        ctx: &RequestContext,
        content: String,
        parent: Option<&str>,
    ) -> Result<Memo> {
        let limit = self.config.content_length_limit;
        let (store, codec) = self.parts();
        commands::memos::create(store, ctx, codec, limit, content, parent)
    }

    pub fn update_memo(&mut self, ctx: &RequestContext, name: &str, content: String) -> Result<Memo> {
        let limit = self.config.content_length_limit;
        let (store, codec) = self.parts();
        commands::memos::update(store, ctx, codec, limit, name, content)
    }

    pub fn get_memo(&self, ctx: &RequestContext, name: &str) -> Result<Memo> {
        commands::memos::get(&self.store, ctx, name)
    }

    pub fn list_memos(&self, ctx: &RequestContext, tag: Option<&str>) -> Result<Vec<Memo>> {
        commands::memos::list(&self.store, ctx, tag)
    }

    pub fn delete_memo(&mut self, ctx: &RequestContext, name: &str) -> Result<MemoId> {
        commands::memos::delete(&mut self.store, ctx, name)
    }

    // --- Tags ---

    pub fn list_tags(
        &self,
        ctx: &RequestContext,
        request: &ListTagsRequest,
    ) -> Result<ListTagsResponse> {
        commands::tags::list_tags(&self.store, ctx, request)
    }

    pub fn get_tag(
        &self,
        ctx: &RequestContext,
        tag_path: &str,
        include_memo_ids: bool,
    ) -> Result<TagNode> {
        commands::tags::get_tag(&self.store, ctx, tag_path, include_memo_ids)
    }

    pub fn rename_tag(
        &mut self,
        ctx: &RequestContext,
        old_path: &str,
        new_path: &str,
        move_children: bool,
    ) -> Result<RenameTagResponse> {
        let (store, codec) = self.parts();
        commands::rename::rename_tag(store, ctx, codec, old_path, new_path, move_children)
    }

    pub fn delete_tag(
        &mut self,
        ctx: &RequestContext,
        tag_path: &str,
        strategy: DeleteStrategy,
    ) -> Result<DeleteTagResponse> {
        let (store, codec) = self.parts();
        commands::delete::delete_tag(store, ctx, codec, tag_path, strategy)
    }

    pub fn batch_delete_by_tag(
        &mut self,
        ctx: &RequestContext,
        tag_path: &str,
        include_children: bool,
        dry_run: bool,
    ) -> Result<BatchDeleteResponse> {
        commands::delete::batch_delete_by_tag(
            &mut self.store,
            ctx,
            tag_path,
            include_children,
            dry_run,
        )
    }

    pub fn rename_memo_tag(
        &mut self,
        ctx: &RequestContext,
        memo_name: &str,
        old_tag: &str,
        new_tag: &str,
    ) -> Result<MemoTagResponse> {
        let (store, codec) = self.parts();
        commands::memo_tags::rename_memo_tag(store, ctx, codec, memo_name, old_tag, new_tag)
    }

    pub fn delete_memo_tag(
        &mut self,
        ctx: &RequestContext,
        memo_name: &str,
        tag: &str,
    ) -> Result<MemoTagResponse> {
        let (store, codec) = self.parts();
        commands::memo_tags::delete_memo_tag(store, ctx, codec, memo_name, tag)
    }

    // --- Maintenance ---

    /// Recomputes every memo's payload using the configured batch size.
    pub fn rebuild_payloads(&mut self, ctx: &RequestContext) -> Result<RebuildReport> {
        let batch_size = self.config.rebuild_batch_size;
        let (store, codec) = self.parts();
        commands::rebuild::rebuild_payloads(store, ctx, codec, batch_size)
    }
}
