//! Task orchestration engine
//!
//! This module resolves pipeline names into flat execution plans and runs
//! them: registry lookup, predicate filtering, cycle detection, sequential
//! fail-fast execution and watch mode.

pub mod context;
pub mod executor;
pub mod plan;
pub mod registry;
pub mod tool;
pub mod watch;
pub mod when;

// Re-export main types
pub use context::*;
pub use executor::*;
pub use plan::*;
pub use registry::*;
pub use tool::*;
pub use watch::{rules_from_manifest, WatchRule};
pub use when::*;
