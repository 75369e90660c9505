//! Watch mode
//!
//! A watch step blocks its plan and turns into a simple event loop: debounced
//! file-change notifications are matched against the manifest's watch rules,
//! and each matching rule re-resolves and re-runs its bounded step list. A
//! failing sub-plan is reported and watching continues; only an external
//! signal ends the process.

use crate::config;
use crate::error::{ConfigError, ConfigResult, ExecutionError, ExecutionResult};
use crate::orchestrator::executor::Executor;
use crate::orchestrator::{resolve_steps, Context, Step};
use globset::{Glob, GlobSet, GlobSetBuilder};
use notify::RecursiveMode;
use notify_debouncer_mini::new_debouncer;
use std::path::Path;
use std::time::Duration;

/// Debounce window for file-change notifications
const DEBOUNCE_WINDOW: Duration = Duration::from_millis(300);

/// A compiled watch rule: globs plus the steps to re-run on change
pub struct WatchRule {
    /// Watcher name
    pub name: String,

    /// Declared globs, relative to the manifest
    pub paths: Vec<String>,

    /// Compiled matcher over the declared globs
    matcher: GlobSet,

    /// Steps resolved and run per detected change
    pub steps: Vec<Step>,
}

impl WatchRule {
    /// Compile a rule from its manifest definition
    pub fn from_config(name: String, config: config::WatcherDef) -> ConfigResult<Self> {
        let mut builder = GlobSetBuilder::new();
        for glob in &config.paths {
            let compiled = Glob::new(glob).map_err(|e| ConfigError::InvalidGlob {
                watcher: name.clone(),
                glob: glob.clone(),
                error: e.to_string(),
            })?;
            builder.add(compiled);
        }
        let matcher = builder.build().map_err(|e| ConfigError::Invalid(format!(
            "watcher '{}': {}",
            name, e
        )))?;

        Ok(WatchRule {
            name,
            paths: config.paths,
            matcher,
            steps: config.run.into_iter().map(Step::from_config).collect(),
        })
    }

    /// Whether a manifest-relative path triggers this rule
    pub fn matches(&self, relative_path: &Path) -> bool {
        self.matcher.is_match(relative_path)
    }
}

/// Compile every watch rule in the manifest, in name order
pub fn rules_from_manifest(manifest: &config::Manifest) -> ConfigResult<Vec<WatchRule>> {
    let mut names: Vec<&String> = manifest.watchers.keys().collect();
    names.sort();

    let mut rules = Vec::with_capacity(names.len());
    for name in names {
        let def = manifest.watchers[name].clone();
        rules.push(WatchRule::from_config(name.clone(), def)?);
    }
    Ok(rules)
}

/// Block on file changes and re-run matching rules until the process ends
pub fn run_watch(executor: &Executor<'_>, ctx: &Context) -> ExecutionResult<()> {
    if executor.watchers().is_empty() {
        ctx.print_info("Watching requested but no watchers are declared");
        return Ok(());
    }

    let root = ctx.manifest_dir();

    let (tx, rx) = std::sync::mpsc::channel();
    let mut debouncer = new_debouncer(DEBOUNCE_WINDOW, tx)
        .map_err(|e| ExecutionError::Watch(e.to_string()))?;
    debouncer
        .watcher()
        .watch(&root, RecursiveMode::Recursive)
        .map_err(|e| ExecutionError::Watch(e.to_string()))?;

    ctx.print_info(&format!("Watching {} for changes...", root.display()));

    loop {
        let batch = match rx.recv() {
            Ok(Ok(events)) => events,
            Ok(Err(e)) => {
                ctx.print_error(&format!("Watch notification error: {:?}", e));
                continue;
            }
            // Channel closed: the watcher backend is gone
            Err(_) => return Ok(()),
        };

        let changed: Vec<_> = batch
            .iter()
            .filter_map(|event| event.path.strip_prefix(&root).ok())
            .collect();

        for rule in executor.watchers() {
            if !changed.iter().any(|path| rule.matches(path)) {
                continue;
            }

            ctx.print_info(&format!("Change matched watcher '{}'", rule.name));

            let plan = match resolve_steps(executor.registry(), &rule.steps, ctx) {
                Ok(plan) => plan,
                Err(e) => {
                    ctx.print_error(&format!("Watcher '{}': {}", rule.name, e));
                    continue;
                }
            };

            // Keep watching after a failed sub-plan
            if let Err(e) = executor.run_watch_plan(&plan, ctx) {
                ctx.print_error(&format!("Watcher '{}': {}", rule.name, e));
            }
        }
    }
}
