//! Structured logging setup.
//!
//! All crate code logs through `tracing` macros. This module only installs
//! the subscriber that decides where those events go.
//!
//! # Configuration
//!
//! Level is controlled via:
//! 1. `RUST_LOG` environment variable (highest priority)
//! 2. `log_level` config option
//! 3. Default: `"info"`
//!
//! Format is `pretty` (human-readable lines) or `json` (one object per line).
//!
//! # Modules
//!
//! - `init`: subscriber setup and sink selection
//! - `file_writer`: rotating file writer with size-based rotation

mod file_writer;
mod init;

pub use file_writer::FileWriter;
pub use init::{init_tracing, log_path, LOG_FILE_NAME};
