//! Core manifest types
//!
//! This module defines the data structures that represent a gantry.yml manifest.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Top-level manifest structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Manifest {
    /// Project name (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Project usage description (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<String>,

    /// Interpreter used to run tool commands (e.g., ["sh", "-c"])
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interpreter: Option<Vec<String>>,

    /// Environment variables exported to every tool process
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub env: HashMap<String, String>,

    /// Tool declarations: opaque units of work delegated to external commands
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub tools: HashMap<String, ToolDef>,

    /// Watch rules: file globs paired with the steps to re-run on change
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub watchers: HashMap<String, WatcherDef>,

    /// Pipelines defined in the manifest
    #[serde(default)]
    pub pipelines: HashMap<String, PipelineDef>,
}

/// A pipeline definition
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PipelineDef {
    /// Usage description for help text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<String>,

    /// Longer description for help text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Whether this pipeline is hidden from the CLI surface
    #[serde(default)]
    pub hidden: bool,

    /// Ordered steps to expand
    #[serde(default, deserialize_with = "deserialize_steps")]
    pub steps: Vec<StepDef>,
}

/// A step - either a bare tool id or a guarded record of actions
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum StepDef {
    /// Shorthand: a tool invocation by id
    SimpleTool(String),

    /// Full step record with predicates and actions
    Detailed(StepDetail),
}

/// A full step record
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StepDetail {
    /// Predicates that must all hold for this step to be included
    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "deserialize_whens"
    )]
    pub when: Vec<WhenDef>,

    /// Tool invocations
    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "deserialize_names"
    )]
    pub tool: Vec<String>,

    /// Pipeline references, expanded in place
    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "deserialize_names"
    )]
    pub pipeline: Vec<String>,

    /// Block here and re-run watcher steps on file changes
    #[serde(default)]
    pub watch: bool,
}

/// A predicate evaluated against the invocation context
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WhenDef {
    /// Holds when the context target equals this value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,

    /// Holds when the context target is absent or different
    #[serde(rename = "not-target", default, skip_serializing_if = "Option::is_none")]
    pub not_target: Option<String>,
}

/// A tool declaration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ToolDef {
    /// Simple command string
    Simple(String),

    /// Structured tool record
    Detailed(ToolDetail),
}

/// Structured tool record
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ToolDetail {
    /// The command to execute
    pub exec: String,

    /// What to print when running (defaults to exec)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub print: Option<String>,

    /// Whether to suppress the run announcement
    #[serde(default)]
    pub quiet: bool,

    /// Working directory for the command, relative to the manifest
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
}

/// A watch rule
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WatcherDef {
    /// File globs that trigger this rule, relative to the manifest
    #[serde(deserialize_with = "deserialize_names")]
    pub paths: Vec<String>,

    /// Steps resolved and run per detected change
    #[serde(default, deserialize_with = "deserialize_steps")]
    pub run: Vec<StepDef>,
}

/// Custom deserializer for steps that handles both single values and arrays
fn deserialize_steps<'de, D>(deserializer: D) -> Result<Vec<StepDef>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;
    use serde_yaml::Value;

    let value = Value::deserialize(deserializer)?;

    match value {
        // Single bare tool id
        Value::String(s) => Ok(vec![StepDef::SimpleTool(s)]),
        // Single step record
        Value::Mapping(_) => {
            let step = StepDef::deserialize(value).map_err(D::Error::custom)?;
            Ok(vec![step])
        }
        // Array of steps
        Value::Sequence(seq) => {
            let mut steps = Vec::new();
            for item in seq {
                let step = StepDef::deserialize(item).map_err(D::Error::custom)?;
                steps.push(step);
            }
            Ok(steps)
        }
        // Null or not present
        Value::Null => Ok(Vec::new()),
        _ => Err(D::Error::custom("steps must be a string, object, or array")),
    }
}

/// Custom deserializer for name lists that handles both single values and arrays
fn deserialize_names<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;
    use serde_yaml::Value;

    let value = Value::deserialize(deserializer)?;

    match value {
        Value::String(s) => Ok(vec![s]),
        Value::Sequence(seq) => {
            let mut names = Vec::new();
            for item in seq {
                match item {
                    Value::String(s) => names.push(s),
                    _ => return Err(D::Error::custom("expected a string")),
                }
            }
            Ok(names)
        }
        Value::Null => Ok(Vec::new()),
        _ => Err(D::Error::custom("expected a string or array of strings")),
    }
}

/// Custom deserializer for predicates that handles both single values and arrays
fn deserialize_whens<'de, D>(deserializer: D) -> Result<Vec<WhenDef>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;
    use serde_yaml::Value;

    let value = Value::deserialize(deserializer)?;

    match value {
        Value::Mapping(_) => {
            let when = WhenDef::deserialize(value).map_err(D::Error::custom)?;
            Ok(vec![when])
        }
        Value::Sequence(seq) => {
            let mut whens = Vec::new();
            for item in seq {
                let when = WhenDef::deserialize(item).map_err(D::Error::custom)?;
                whens.push(when);
            }
            Ok(whens)
        }
        Value::Null => Ok(Vec::new()),
        _ => Err(D::Error::custom("when must be an object or array")),
    }
}
