//! Tool invocation
//!
//! Tools are the opaque primitives of a plan: named shell commands declared
//! in the manifest and run through the configured interpreter. Everything a
//! tool does (compiling, linting, serving) belongs to the external command;
//! this module only spawns it and reports its exit status.

use crate::config;
use crate::error::{ExecutionError, ExecutionResult};
use crate::orchestrator::Context;
use std::collections::HashMap;
use std::process::{Command as StdCommand, Stdio};

/// Runtime representation of a tool
#[derive(Debug, Clone)]
pub struct Tool {
    /// Tool id
    pub name: String,

    /// The command to execute
    pub exec: String,

    /// What to print when running
    pub print: String,

    /// Whether to suppress the run announcement
    pub quiet: bool,

    /// Working directory, relative to the manifest
    pub dir: Option<String>,
}

impl Tool {
    /// Create from a manifest declaration
    pub fn from_config(name: String, config: config::ToolDef) -> Self {
        match config {
            config::ToolDef::Simple(exec) => Tool {
                name,
                print: exec.clone(),
                exec,
                quiet: false,
                dir: None,
            },
            config::ToolDef::Detailed(detail) => Tool {
                name,
                print: detail.print.unwrap_or_else(|| detail.exec.clone()),
                exec: detail.exec,
                quiet: detail.quiet,
                dir: detail.dir,
            },
        }
    }
}

/// The external collaborator registry: tool id to tool record
#[derive(Debug, Default)]
pub struct ToolSet {
    tools: HashMap<String, Tool>,
}

impl ToolSet {
    /// Build the tool set from a manifest
    pub fn from_manifest(manifest: &config::Manifest) -> Self {
        let tools = manifest
            .tools
            .iter()
            .map(|(name, def)| (name.clone(), Tool::from_config(name.clone(), def.clone())))
            .collect();
        ToolSet { tools }
    }

    /// Look up a tool by id
    pub fn get(&self, name: &str) -> Option<&Tool> {
        self.tools.get(name)
    }

    /// Number of declared tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether no tools are declared
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// Run a tool to completion in the given context
pub fn run_tool(tool: &Tool, ctx: &Context) -> ExecutionResult<()> {
    if !tool.quiet {
        ctx.print_run(&tool.print);
    }

    // Tool working directories are relative to the manifest
    let working_dir = match &tool.dir {
        Some(dir) => ctx.manifest_dir().join(dir),
        None => ctx.manifest_dir(),
    };

    let mut command = StdCommand::new(&ctx.interpreter[0]);

    // Add interpreter args (e.g., "-c" for sh/bash)
    if ctx.interpreter.len() > 1 {
        command.args(&ctx.interpreter[1..]);
    }

    command.arg(&tool.exec);
    command.current_dir(&working_dir);

    command.stdin(Stdio::inherit());
    command.stdout(Stdio::inherit());
    command.stderr(Stdio::inherit());

    for (key, value) in &ctx.env {
        command.env(key, value);
    }

    let status = command.status().map_err(|e| ExecutionError::SpawnFailed {
        tool: tool.name.clone(),
        source: e,
    })?;

    if !status.success() {
        // Position information is filled in by the executor
        return Err(ExecutionError::ToolFailed {
            tool: tool.name.clone(),
            step: 0,
            total: 0,
            code: status.code(),
        });
    }

    Ok(())
}
