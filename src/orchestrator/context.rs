//! Invocation context
//!
//! The context carries the caller-supplied target parameter and the ambient
//! state a plan needs while it runs. The pipeline registry itself stays
//! read-only; every invocation builds its own context.

use colored::Colorize;
use std::collections::HashMap;
use std::env;
use std::path::PathBuf;

/// State shared by predicate evaluation and plan execution
pub struct Context {
    /// Caller-supplied target parameter (e.g. "dist", "watch")
    pub target: Option<String>,

    /// Current working directory
    pub working_dir: PathBuf,

    /// Manifest file path
    pub manifest_path: Option<PathBuf>,

    /// Environment variables exported to every tool process
    pub env: HashMap<String, String>,

    /// Interpreter used to run tool commands (e.g., ["sh", "-c"])
    pub interpreter: Vec<String>,

    /// Verbosity level
    pub verbosity: Verbosity,
}

/// Verbosity levels for output
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    Silent = 0,
    Quiet = 1,
    Normal = 2,
    Verbose = 3,
}

impl Context {
    /// Create a new context with default settings
    pub fn new() -> Self {
        Context {
            target: None,
            working_dir: env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            manifest_path: None,
            env: HashMap::new(),
            interpreter: vec!["sh".to_string(), "-c".to_string()],
            verbosity: Verbosity::Normal,
        }
    }

    /// Set the target parameter
    pub fn with_target(mut self, target: Option<String>) -> Self {
        self.target = target;
        self
    }

    /// Create a context with a specific working directory
    pub fn with_working_dir(mut self, dir: PathBuf) -> Self {
        self.working_dir = dir;
        self
    }

    /// Set the manifest file path
    pub fn with_manifest_path(mut self, path: PathBuf) -> Self {
        self.manifest_path = Some(path);
        self
    }

    /// Set environment variables
    pub fn with_env(mut self, env: HashMap<String, String>) -> Self {
        self.env = env;
        self
    }

    /// Set the interpreter
    pub fn with_interpreter(mut self, interpreter: Vec<String>) -> Self {
        self.interpreter = interpreter;
        self
    }

    /// Set verbosity level
    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Get the directory of the manifest (or the working dir)
    ///
    /// Tool working directories and watcher globs are relative to this.
    pub fn manifest_dir(&self) -> PathBuf {
        self.manifest_path
            .as_ref()
            .and_then(|p| p.parent())
            // A bare file name has an empty parent; treat it like none
            .filter(|p| !p.as_os_str().is_empty())
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| self.working_dir.clone())
    }

    /// Print info message
    pub fn print_info(&self, message: &str) {
        if self.verbosity >= Verbosity::Normal {
            eprintln!("{} {}", "[gantry]".cyan(), message);
        }
    }

    /// Print error message
    pub fn print_error(&self, message: &str) {
        if self.verbosity >= Verbosity::Quiet {
            eprintln!("{} {}", "[gantry]".red(), message);
        }
    }

    /// Print debug message (only in verbose mode)
    pub fn print_debug(&self, message: &str) {
        if self.verbosity >= Verbosity::Verbose {
            eprintln!("{} {}", "[gantry]".dimmed(), message);
        }
    }

    /// Print tool run announcement
    pub fn print_run(&self, label: &str) {
        if self.verbosity >= Verbosity::Normal {
            eprintln!("{} {}", "[run]".green(), label);
        }
    }

    /// Print pipeline start message
    pub fn print_pipeline_start(&self, name: &str) {
        match &self.target {
            Some(target) => self.print_info(&format!("Running pipeline: {} ({})", name, target)),
            None => self.print_info(&format!("Running pipeline: {}", name)),
        }
    }

    /// Print pipeline complete message
    pub fn print_pipeline_complete(&self, name: &str) {
        self.print_debug(&format!("Pipeline completed: {}", name));
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}
