//! # Data Model
//!
//! A [`Memo`] is a unit of free text owned by one user. Alongside the raw
//! content it carries a [`MemoPayload`]: the ordered, duplicate-free list of
//! canonical tag paths found in the content, plus a few structural flags.
//!
//! The payload is a cache. It is never edited in place; every content write
//! replaces it wholesale with the output of [`crate::tags::build_payload`].
//! There is no central tag table: tag listings are aggregated from payloads
//! on demand (see [`crate::tags::aggregate`]).
//!
//! Memos with a `parent_id` are comments. They are excluded from tag
//! listings and deleted together with their parent.

use crate::error::{MemotagError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type MemoId = Uuid;
pub type UserId = i32;

/// Prefix used by resource names such as `memos/<uuid>`.
pub const MEMO_NAME_PREFIX: &str = "memos/";

/// Sentinel resource name meaning "every memo".
pub const ALL_MEMOS_NAME: &str = "memos/-";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct MemoProperty {
    pub has_link: bool,
    pub has_task_list: bool,
    pub has_code: bool,
    pub has_incomplete_tasks: bool,
    pub references: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct MemoPayload {
    pub tags: Vec<String>,
    pub property: MemoProperty,
}

impl MemoPayload {
    pub fn has_tag(&self, path: &str) -> bool {
        self.tags.iter().any(|t| t == path)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Memo {
    pub id: MemoId,
    pub creator_id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<MemoId>,
    pub content: String,
    #[serde(default)]
    pub payload: MemoPayload,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Memo {
    pub fn new(creator_id: UserId, content: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            creator_id,
            parent_id: None,
            content: content.into(),
            payload: MemoPayload::default(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_parent(mut self, parent_id: MemoId) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    pub fn is_comment(&self) -> bool {
        self.parent_id.is_some()
    }

    /// Resource name, e.g. `memos/0b7c...`.
    pub fn name(&self) -> String {
        format!("{}{}", MEMO_NAME_PREFIX, self.id)
    }
}

/// Target of a single-memo operation, parsed from a resource name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoScope {
    /// The `memos/-` sentinel.
    All,
    Memo(MemoId),
}

impl MemoScope {
    pub fn parse(name: &str) -> Result<Self> {
        if name == ALL_MEMOS_NAME {
            return Ok(MemoScope::All);
        }
        let raw = name.strip_prefix(MEMO_NAME_PREFIX).ok_or_else(|| {
            MemotagError::InvalidArgument(format!("invalid memo name: {}", name))
        })?;
        let id = Uuid::parse_str(raw).map_err(|_| {
            MemotagError::InvalidArgument(format!("invalid memo name: {}", name))
        })?;
        Ok(MemoScope::Memo(id))
    }
}
