//! Manifest validation
//!
//! Cross-reference checks run once at startup, before any tool executes:
//! every step must point at a declared tool or defined pipeline, watcher
//! globs must compile, and pipeline references must be acyclic.

use crate::config::types::{Manifest, StepDef, StepDetail, WatcherDef};
use crate::error::{ConfigError, ConfigResult};
use globset::Glob;
use std::collections::HashSet;

/// Validate a complete manifest
pub fn validate_manifest(manifest: &Manifest) -> ConfigResult<()> {
    if let Some(interpreter) = &manifest.interpreter {
        if interpreter.is_empty() {
            return Err(ConfigError::Invalid(
                "interpreter must name a command".to_string(),
            ));
        }
    }

    for (name, pipeline) in &manifest.pipelines {
        for step in &pipeline.steps {
            validate_step(manifest, name, step, false)?;
        }
    }

    for (name, watcher) in &manifest.watchers {
        validate_watcher(manifest, name, watcher)?;
    }

    // Reference cycles are also caught at resolve time; checking here keeps
    // a bad manifest from getting as far as the CLI surface.
    detect_circular_references(manifest)?;

    Ok(())
}

/// Validate a single step of a pipeline (or of a watcher when `in_watcher`)
fn validate_step(
    manifest: &Manifest,
    owner: &str,
    step: &StepDef,
    in_watcher: bool,
) -> ConfigResult<()> {
    match step {
        StepDef::SimpleTool(tool) => validate_tool_ref(manifest, owner, tool, in_watcher),
        StepDef::Detailed(detail) => {
            validate_predicates(owner, detail)?;

            for tool in &detail.tool {
                validate_tool_ref(manifest, owner, tool, in_watcher)?;
            }
            for reference in &detail.pipeline {
                if !manifest.pipelines.contains_key(reference) {
                    return Err(if in_watcher {
                        ConfigError::UnknownWatcherPipelineRef {
                            watcher: owner.to_string(),
                            reference: reference.clone(),
                        }
                    } else {
                        ConfigError::UnknownPipelineRef {
                            pipeline: owner.to_string(),
                            reference: reference.clone(),
                        }
                    });
                }
            }
            if detail.watch && in_watcher {
                return Err(ConfigError::Invalid(format!(
                    "watcher '{}' must not contain a watch step",
                    owner
                )));
            }
            Ok(())
        }
    }
}

fn validate_tool_ref(
    manifest: &Manifest,
    owner: &str,
    tool: &str,
    in_watcher: bool,
) -> ConfigResult<()> {
    if manifest.tools.contains_key(tool) {
        return Ok(());
    }
    Err(if in_watcher {
        ConfigError::UnknownWatcherToolRef {
            watcher: owner.to_string(),
            tool: tool.to_string(),
        }
    } else {
        ConfigError::UnknownToolRef {
            pipeline: owner.to_string(),
            tool: tool.to_string(),
        }
    })
}

/// A step record must not carry contradictory predicate forms and each
/// predicate must name exactly one condition.
fn validate_predicates(owner: &str, detail: &StepDetail) -> ConfigResult<()> {
    for when in &detail.when {
        match (&when.target, &when.not_target) {
            (None, None) => {
                return Err(ConfigError::Invalid(format!(
                    "empty 'when' predicate in '{}'",
                    owner
                )))
            }
            (Some(_), Some(_)) => {
                return Err(ConfigError::Invalid(format!(
                    "'when' predicate in '{}' sets both 'target' and 'not-target'",
                    owner
                )))
            }
            _ => {}
        }
    }
    Ok(())
}

/// Validate a watcher: globs must compile and its steps must reference
/// declared tools and defined pipelines.
fn validate_watcher(manifest: &Manifest, name: &str, watcher: &WatcherDef) -> ConfigResult<()> {
    if watcher.paths.is_empty() {
        return Err(ConfigError::Invalid(format!(
            "watcher '{}' declares no paths",
            name
        )));
    }

    for glob in &watcher.paths {
        Glob::new(glob).map_err(|e| ConfigError::InvalidGlob {
            watcher: name.to_string(),
            glob: glob.clone(),
            error: e.to_string(),
        })?;
    }

    for step in &watcher.run {
        validate_step(manifest, name, step, true)?;
    }

    Ok(())
}

/// Detect circular references between pipelines
///
/// Follows every pipeline reference regardless of predicates; a manifest
/// whose references only terminate for particular targets is rejected.
fn detect_circular_references(manifest: &Manifest) -> ConfigResult<()> {
    for pipeline_name in manifest.pipelines.keys() {
        let mut visited = HashSet::new();
        let mut stack = Vec::new();
        check_pipeline_cycle(manifest, pipeline_name, &mut visited, &mut stack)?;
    }
    Ok(())
}

/// Recursively check for cycles in pipeline references
fn check_pipeline_cycle(
    manifest: &Manifest,
    pipeline_name: &str,
    visited: &mut HashSet<String>,
    stack: &mut Vec<String>,
) -> ConfigResult<()> {
    // Check if we've found a cycle
    if stack.iter().any(|n| n == pipeline_name) {
        stack.push(pipeline_name.to_string());
        return Err(ConfigError::CircularReference(stack.join(" -> ")));
    }

    // Skip if already fully processed
    if visited.contains(pipeline_name) {
        return Ok(());
    }

    let pipeline = match manifest.pipelines.get(pipeline_name) {
        Some(p) => p,
        // Dangling references are reported by validate_step
        None => return Ok(()),
    };

    stack.push(pipeline_name.to_string());

    for step in &pipeline.steps {
        if let StepDef::Detailed(detail) = step {
            for reference in &detail.pipeline {
                check_pipeline_cycle(manifest, reference, visited, stack)?;
            }
        }
    }

    stack.pop();
    visited.insert(pipeline_name.to_string());

    Ok(())
}
