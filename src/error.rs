//! Error types for Gantry

use std::io;
use thiserror::Error;

/// Result type alias for Gantry operations
pub type Result<T> = std::result::Result<T, GantryError>;

/// Main error type for Gantry
#[derive(Error, Debug)]
pub enum GantryError {
    /// Manifest loading and validation errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Plan resolution errors
    #[error("Resolution error: {0}")]
    Resolve(#[from] ResolveError),

    /// Plan execution errors
    #[error("Execution error: {0}")]
    Execution(#[from] ExecutionError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// YAML parsing errors
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Manifest parsing and validation errors, detected at startup
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to find manifest file (searched: {0})")]
    NotFound(String),

    #[error("Invalid manifest: {0}")]
    Invalid(String),

    #[error("Pipeline '{0}' is defined more than once")]
    DuplicatePipeline(String),

    #[error("Pipeline '{pipeline}' references undeclared tool '{tool}'")]
    UnknownToolRef { pipeline: String, tool: String },

    #[error("Pipeline '{pipeline}' references undefined pipeline '{reference}'")]
    UnknownPipelineRef { pipeline: String, reference: String },

    #[error("Watcher '{watcher}' references undeclared tool '{tool}'")]
    UnknownWatcherToolRef { watcher: String, tool: String },

    #[error("Watcher '{watcher}' references undefined pipeline '{reference}'")]
    UnknownWatcherPipelineRef { watcher: String, reference: String },

    #[error("Watcher '{watcher}' has an invalid glob '{glob}': {error}")]
    InvalidGlob {
        watcher: String,
        glob: String,
        error: String,
    },

    #[error("Circular pipeline reference: {0}")]
    CircularReference(String),
}

/// Plan resolution errors, raised before any tool runs
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("Pipeline '{0}' is not defined")]
    UnknownPipeline(String),

    #[error("Circular pipeline reference: {0}")]
    Cycle(String),
}

/// Plan execution errors
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("Tool '{tool}' (step {step} of {total}) failed with exit code {code:?}")]
    ToolFailed {
        tool: String,
        step: usize,
        total: usize,
        code: Option<i32>,
    },

    #[error("Failed to spawn tool '{tool}': {source}")]
    SpawnFailed {
        tool: String,
        #[source]
        source: io::Error,
    },

    #[error("Tool '{0}' is not declared in the manifest")]
    UnknownTool(String),

    #[error("A watch step cannot run inside a watch-triggered plan")]
    NestedWatch,

    #[error("File watching failed: {0}")]
    Watch(String),
}

/// Specialized result type for manifest operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Specialized result type for resolution operations
pub type ResolveResult<T> = std::result::Result<T, ResolveError>;

/// Specialized result type for execution operations
pub type ExecutionResult<T> = std::result::Result<T, ExecutionError>;
