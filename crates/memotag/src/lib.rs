//! # Memotag Architecture
//!
//! Memotag is a **hierarchical tag engine for markdown memos**. Memos carry
//! inline tags such as `#work/project1/backend`; memotag extracts them into a
//! per-memo cache, aggregates those caches into a tag tree on demand, and
//! rewrites content when tags are renamed or deleted.
//!
//! Like the CLI that ships with it, everything here is UI agnostic: the same
//! core could sit behind an RPC server.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (crates/memotag-cli)                             │
//! │  - Parses arguments, renders output, owns exit codes        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Owns store, parser, restorer and config                  │
//! │  - Dispatches to commands                                   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Selection, content edits, payload rebuilds               │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌───────────────────────────┐   ┌─────────────────────────────┐
//! │  Tags + Content           │   │  Storage Layer (store/)     │
//! │  - parse / restore trees  │   │  - MemoStore trait          │
//! │  - extract, aggregate,    │   │  - FileStore, InMemoryStore │
//! │    hierarchy, removal     │   │                             │
//! └───────────────────────────┘   └─────────────────────────────┘
//! ```
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! From `api.rs` inward, code never writes to stdout/stderr and never exits
//! the process. Diagnostics go through the `log` facade; the client decides
//! where they land.
//!
//! ## Testing Strategy
//!
//! 1. **Tags and content** (`tags/`, `content/`): pure functions, tested
//!    directly.
//! 2. **Commands** (`commands/*.rs`): the bulk of behavior tests, against
//!    [`store::memory::InMemoryStore`] fixtures.
//! 3. **API** (`api.rs`): dispatch tests.
//! 4. **Integration** (`tests/`): end-to-end flows through the API, on both
//!    store implementations.
//!
//! ## Module Overview
//!
//! - [`api`]: facade, entry point for clients
//! - [`commands`]: business logic
//! - [`config`]: confique-backed settings
//! - [`content`]: content tree, markdown parser and restorer
//! - [`context`]: caller identity and cancellation
//! - [`error`]: error type and classification
//! - [`model`]: memos and payloads
//! - [`store`]: persistence
//! - [`tags`]: tag paths, extraction, aggregation, hierarchy, removal

pub mod api;
pub mod commands;
pub mod config;
pub mod content;
pub mod context;
pub mod error;
pub mod model;
pub mod store;
pub mod tags;

#[cfg(test)]
mod test_utils;

pub use api::MemotagApi;
pub use config::MemotagConfig;
pub use context::{CancellationToken, RequestContext};
pub use error::{ErrorKind, MemotagError, Result};
