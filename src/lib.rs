//! Gantry - A YAML-based build pipeline orchestrator
//!
//! Gantry resolves named pipelines of external tool invocations into flat
//! execution plans and runs them sequentially, fail-fast. Pipelines, tools
//! and watch rules are declared in a gantry.yml manifest.

// Public modules
pub mod cli;
pub mod config;
pub mod error;
pub mod orchestrator;

// Re-export commonly used types
pub use error::{GantryError, Result};

/// Current version of Gantry
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
