//! # CLI Behavior
//!
//! One possible client for memotag. Running `memotag` with no command lists
//! tags, the read path people reach for most.
//!
//! ## Content Input
//!
//! `add` and `edit` take content as trailing words. With no words they read
//! piped stdin, so `cat notes.md | memotag add` works.
//!
//! ## Memo Names
//!
//! Commands taking a memo accept `memos/<uuid>` or the bare uuid. The
//! `memos/-` sentinel is passed through so the library can reject it with a
//! pointer to the collection-wide command.
//!
//! ## Module Structure
//!
//! - `commands`: context setup, dispatch, per-command handlers
//! - `render`: text output
//! - `setup`: clap definitions

mod commands;
mod render;
pub mod setup;

pub use commands::run;
