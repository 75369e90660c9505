//! Manifest parsing and validation
//!
//! This module handles parsing of gantry.yml manifest files
//! and validation of manifest structure.

pub mod parse;
pub mod schema;
pub mod types;

// Re-export main types
pub use parse::*;
pub use schema::*;
pub use types::*;
