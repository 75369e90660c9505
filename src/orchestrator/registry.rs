//! Pipeline registry
//!
//! Runtime pipeline representations and the registry that holds them. The
//! registry is populated once from the manifest and is read-only afterwards;
//! resolution borrows it, never mutates it.

use crate::config;
use crate::error::{ConfigError, ConfigResult};
use crate::orchestrator::When;
use std::collections::HashMap;

/// Runtime pipeline representation
#[derive(Debug, Clone)]
pub struct Pipeline {
    /// Pipeline name
    pub name: String,

    /// Usage description
    pub usage: Option<String>,

    /// Longer description
    pub description: Option<String>,

    /// Whether this pipeline is hidden from the CLI surface
    pub hidden: bool,

    /// Ordered steps
    pub steps: Vec<Step>,
}

impl Pipeline {
    /// Create a runtime pipeline from its manifest definition
    pub fn from_config(name: String, config: config::PipelineDef) -> Self {
        Pipeline {
            name,
            usage: config.usage,
            description: config.description,
            hidden: config.hidden,
            steps: config.steps.into_iter().map(Step::from_config).collect(),
        }
    }
}

/// Runtime representation of a step
///
/// One manifest step record may carry several actions; they expand in a
/// fixed order: tools, then pipeline references, then the watch marker.
#[derive(Debug, Clone)]
pub struct Step {
    /// Predicates that must all hold for this step to be included
    pub when: Vec<When>,

    /// Tool invocations
    pub tools: Vec<String>,

    /// Pipeline references, expanded in place
    pub pipelines: Vec<String>,

    /// Block here and re-run watcher steps on file changes
    pub watch: bool,
}

impl Step {
    /// Create from a manifest step
    pub fn from_config(config: config::StepDef) -> Self {
        match config {
            config::StepDef::SimpleTool(tool) => Step {
                when: Vec::new(),
                tools: vec![tool],
                pipelines: Vec::new(),
                watch: false,
            },
            config::StepDef::Detailed(detail) => Step {
                when: detail.when.into_iter().map(When::from_config).collect(),
                tools: detail.tool,
                pipelines: detail.pipeline,
                watch: detail.watch,
            },
        }
    }

    /// A step guarded only by predicates with nothing to do is legal but inert
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty() && self.pipelines.is_empty() && !self.watch
    }
}

/// Immutable mapping of pipeline name to pipeline definition
#[derive(Debug, Default)]
pub struct Registry {
    pipelines: HashMap<String, Pipeline>,
}

impl Registry {
    /// Create an empty registry
    pub fn new() -> Self {
        Registry {
            pipelines: HashMap::new(),
        }
    }

    /// Build a registry from a validated manifest
    pub fn from_manifest(manifest: &config::Manifest) -> ConfigResult<Self> {
        let mut registry = Registry::new();
        for (name, def) in &manifest.pipelines {
            registry.register(Pipeline::from_config(name.clone(), def.clone()))?;
        }
        Ok(registry)
    }

    /// Insert a pipeline definition
    ///
    /// Fails on a duplicate name; the existing entry is left untouched.
    pub fn register(&mut self, pipeline: Pipeline) -> ConfigResult<()> {
        if self.pipelines.contains_key(&pipeline.name) {
            return Err(ConfigError::DuplicatePipeline(pipeline.name));
        }
        self.pipelines.insert(pipeline.name.clone(), pipeline);
        Ok(())
    }

    /// Look up a pipeline by name
    pub fn get(&self, name: &str) -> Option<&Pipeline> {
        self.pipelines.get(name)
    }

    /// Check whether a pipeline is registered
    pub fn contains(&self, name: &str) -> bool {
        self.pipelines.contains_key(name)
    }

    /// Number of registered pipelines
    pub fn len(&self) -> usize {
        self.pipelines.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.pipelines.is_empty()
    }

    /// Iterate over registered pipelines
    pub fn iter(&self) -> impl Iterator<Item = &Pipeline> {
        self.pipelines.values()
    }
}
