//! # Configuration
//!
//! Memotag configuration is loaded with [`confique`] from two layers, in
//! priority order:
//!
//! 1. **Environment variables**: `MEMOTAG_CONTENT_LENGTH_LIMIT`, `MEMOTAG_USER`.
//! 2. **Config file**: `<data dir>/memotag.toml`, optional.
//!
//! Anything left unset falls back to the compiled defaults.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `content_length_limit` | `8192` | Max characters accepted by create/update |
//! | `default_user` | `1` | Caller id when none is given |
//! | `rebuild_batch_size` | `100` | Page size of the payload rebuild runner |
//!
//! ## Data Directory
//!
//! [`default_data_dir`] resolves the OS data directory through `directories`.
//! The CLI lets `--data` / `MEMOTAG_DATA` override it.

use crate::error::{MemotagError, Result};
use confique::Config;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "memotag.toml";

/// Configuration for memotag, stored in `memotag.toml`.
#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct MemotagConfig {
    /// Maximum memo length in characters.
    #[config(env = "MEMOTAG_CONTENT_LENGTH_LIMIT", default = 8192)]
    pub content_length_limit: usize,

    /// User id used when the caller does not pass one.
    #[config(env = "MEMOTAG_USER", default = 1)]
    pub default_user: i32,

    /// How many memos the rebuild runner loads per page.
    #[config(default = 100)]
    pub rebuild_batch_size: usize,
}

impl Default for MemotagConfig {
    fn default() -> Self {
        Self {
            content_length_limit: 8192,
            default_user: 1,
            rebuild_batch_size: 100,
        }
    }
}

impl MemotagConfig {
    /// Loads env over `<data_dir>/memotag.toml` over defaults. A missing file
    /// is fine.
    pub fn load(data_dir: &Path) -> Result<Self> {
        Self::builder()
            .env()
            .file(data_dir.join(CONFIG_FILE))
            .load()
            .map_err(|e| MemotagError::Config(e.to_string()))
    }
}

/// OS data directory for memotag, e.g. `~/.local/share/memotag` on Linux.
pub fn default_data_dir() -> Result<PathBuf> {
    directories::ProjectDirs::from("", "", "memotag")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| MemotagError::Config("could not determine data directory".to_string()))
}
