//! # Storage Layer
//!
//! The [`MemoStore`] trait is everything the tag engine needs from
//! persistence: filtered listing, single lookups, content/payload updates and
//! cascading deletes. The engine never holds memos between calls; each
//! operation lists what it needs and writes back memo by memo.
//!
//! ## Split: Store vs Backend
//!
//! - [`memo_store::MemoRepo`] implements [`MemoStore`]: filtering, ownership
//!   scoping, comment cascade, timestamps.
//! - [`backend::StorageBackend`] is raw I/O: load and save the full memo list.
//!
//! ## Implementations
//!
//! - [`fs::FileStore`]: `memos.json` in a data directory, atomic writes.
//! - [`memory::InMemoryStore`]: for tests, with write-failure simulation.
//!
//! ## Storage Layout
//!
//! ```text
//! <data dir>/
//! ├── memos.json      # every memo, payload included
//! └── memotag.toml    # optional configuration
//! ```

use crate::error::Result;
use crate::model::{Memo, MemoId, MemoPayload, UserId};

pub mod backend;
pub mod fs;
pub mod fs_backend;
pub mod mem_backend;
pub mod memo_store;
pub mod memory;

/// Tag predicate over a memo's cached payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagFilter {
    /// Payload holds exactly this path.
    In(String),
    /// Payload holds this path or a path below it.
    StartsWith(String),
}

impl TagFilter {
    pub fn matches(&self, payload: &MemoPayload) -> bool {
        match self {
            TagFilter::In(path) => payload.has_tag(path),
            TagFilter::StartsWith(path) => payload
                .tags
                .iter()
                .any(|t| crate::tags::is_same_or_descendant(path, t)),
        }
    }
}

/// Listing query. Unset fields do not filter.
#[derive(Debug, Clone, Default)]
pub struct FindMemo {
    pub id: Option<MemoId>,
    pub creator_id: Option<UserId>,
    pub tag_filter: Option<TagFilter>,
    pub exclude_comments: bool,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

impl FindMemo {
    /// Top-level memos of one owner.
    pub fn owned_by(creator_id: UserId) -> Self {
        Self {
            creator_id: Some(creator_id),
            exclude_comments: true,
            ..Default::default()
        }
    }

    pub fn with_tag(mut self, filter: TagFilter) -> Self {
        self.tag_filter = Some(filter);
        self
    }

    pub fn page(mut self, offset: usize, limit: usize) -> Self {
        self.offset = Some(offset);
        self.limit = Some(limit);
        self
    }
}

/// Partial update. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateMemo {
    pub id: MemoId,
    pub content: Option<String>,
    pub payload: Option<MemoPayload>,
}

/// Abstract interface for memo storage.
pub trait MemoStore {
    /// Memos matching `find`, in creation order.
    fn list_memos(&self, find: &FindMemo) -> Result<Vec<Memo>>;

    /// A memo by id, `None` if absent.
    fn get_memo(&self, id: &MemoId) -> Result<Option<Memo>>;

    fn create_memo(&mut self, memo: Memo) -> Result<Memo>;

    /// Errors with `MemoNotFound` if the memo is gone.
    fn update_memo(&mut self, update: &UpdateMemo) -> Result<()>;

    /// Deletes the memo and every comment attached to it.
    fn delete_memo(&mut self, id: &MemoId) -> Result<()>;
}
