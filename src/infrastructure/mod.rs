//! Infrastructure layer for filesystem and environment interactions.
//!
//! Resolves where the dashboard keeps its log file and where it looks for a
//! default configuration file.

pub mod paths;

pub use paths::{default_config_file, expand_tilde, get_config_dir, get_data_dir};
