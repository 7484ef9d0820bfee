//! # Memotag CLI
//!
//! A thin binary over the `memotag` library: all behavior lives there, and
//! this crate parses arguments, renders results and maps errors to exit
//! codes.
//!
//! ## Layering
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (crates/memotag-cli/src/cli/)                    │
//! │  - clap argument parsing (setup.rs)                         │
//! │  - Context wiring + dispatch (commands.rs)                  │
//! │  - Terminal rendering with colored/console (render.rs)      │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (crates/memotag/src/api.rs)                      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Logs go to stderr through flexi_logger; `-v` raises the level, and
//! `MEMOTAG_LOG` sets it when no `-v` is given.

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
