//! CLI interface and argument parsing
//!
//! This module builds the command-line surface from the manifest: every
//! non-hidden pipeline becomes a subcommand with an optional target argument.

pub mod app;

// Re-export main types
pub use app::*;
