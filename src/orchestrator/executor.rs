//! Plan execution
//!
//! Runs an execution plan step by step: sequentially, fail-fast, no rollback.
//! One plan runs to completion (or first failure) before another may start.

use crate::error::{ExecutionError, ExecutionResult};
use crate::orchestrator::watch::{run_watch, WatchRule};
use crate::orchestrator::{run_tool, Context, Plan, PlanStep, Registry, ToolSet};

/// Executes plans against the declared tools and watch rules
pub struct Executor<'a> {
    registry: &'a Registry,
    tools: &'a ToolSet,
    watchers: &'a [WatchRule],
}

impl<'a> Executor<'a> {
    /// Create an executor over a read-only registry, tool set and watch rules
    pub fn new(registry: &'a Registry, tools: &'a ToolSet, watchers: &'a [WatchRule]) -> Self {
        Executor {
            registry,
            tools,
            watchers,
        }
    }

    /// Registry used for resolving watcher sub-plans
    pub fn registry(&self) -> &Registry {
        self.registry
    }

    /// Watch rules declared in the manifest
    pub fn watchers(&self) -> &[WatchRule] {
        self.watchers
    }

    /// Run a plan to completion, stopping at the first failure
    pub fn run_plan(&self, plan: &Plan, ctx: &Context) -> ExecutionResult<()> {
        self.run(plan, ctx, false)
    }

    /// Run a watch-triggered sub-plan (watch steps are rejected here)
    pub(crate) fn run_watch_plan(&self, plan: &Plan, ctx: &Context) -> ExecutionResult<()> {
        self.run(plan, ctx, true)
    }

    fn run(&self, plan: &Plan, ctx: &Context, in_watch: bool) -> ExecutionResult<()> {
        let total = plan.len();

        for (idx, step) in plan.steps().iter().enumerate() {
            match step {
                PlanStep::Tool(name) => {
                    let tool = self
                        .tools
                        .get(name)
                        .ok_or_else(|| ExecutionError::UnknownTool(name.clone()))?;

                    match run_tool(tool, ctx) {
                        Ok(()) => {}
                        Err(ExecutionError::ToolFailed { tool, code, .. }) => {
                            return Err(ExecutionError::ToolFailed {
                                tool,
                                step: idx + 1,
                                total,
                                code,
                            });
                        }
                        Err(e) => return Err(e),
                    }
                }
                PlanStep::Watch => {
                    if in_watch {
                        return Err(ExecutionError::NestedWatch);
                    }
                    run_watch(self, ctx)?;
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_manifest;
    use tempfile::TempDir;

    fn run_manifest(yaml: &str, pipeline: &str, dir: &TempDir) -> ExecutionResult<()> {
        let manifest = parse_manifest(yaml).unwrap();
        let registry = Registry::from_manifest(&manifest).unwrap();
        let tools = ToolSet::from_manifest(&manifest);
        let ctx = Context::new()
            .with_manifest_path(dir.path().join("gantry.yml"))
            .with_verbosity(crate::orchestrator::Verbosity::Silent);

        let plan = crate::orchestrator::resolve(&registry, pipeline, &ctx).unwrap();
        let executor = Executor::new(&registry, &tools, &[]);
        executor.run_plan(&plan, &ctx)
    }

    #[test]
    fn test_run_plan_in_order() {
        let temp_dir = TempDir::new().unwrap();
        let yaml = r#"
tools:
  first: printf 1 >> order.txt
  second: printf 2 >> order.txt
  third: printf 3 >> order.txt
pipelines:
  all:
    steps:
      - first
      - second
      - third
"#;
        run_manifest(yaml, "all", &temp_dir).unwrap();
        let order = std::fs::read_to_string(temp_dir.path().join("order.txt")).unwrap();
        assert_eq!(order, "123");
    }

    #[test]
    fn test_run_plan_fail_fast() {
        let temp_dir = TempDir::new().unwrap();
        let yaml = r#"
tools:
  one: touch one.txt
  two: touch two.txt
  boom: "false"
  four: touch four.txt
  five: touch five.txt
pipelines:
  doomed:
    steps:
      - one
      - two
      - boom
      - four
      - five
"#;
        let result = run_manifest(yaml, "doomed", &temp_dir);

        // The error identifies the failing step
        match result {
            Err(ExecutionError::ToolFailed {
                tool, step, total, ..
            }) => {
                assert_eq!(tool, "boom");
                assert_eq!(step, 3);
                assert_eq!(total, 5);
            }
            other => panic!("expected tool failure, got {:?}", other),
        }

        // Prior steps ran, later steps never did
        assert!(temp_dir.path().join("one.txt").exists());
        assert!(temp_dir.path().join("two.txt").exists());
        assert!(!temp_dir.path().join("four.txt").exists());
        assert!(!temp_dir.path().join("five.txt").exists());
    }

    #[test]
    fn test_run_plan_unknown_tool() {
        let registry = Registry::new();
        let tools = ToolSet::default();
        let executor = Executor::new(&registry, &tools, &[]);

        let mut plan = Plan::new();
        plan.push(PlanStep::Tool("ghost".to_string()));

        let ctx = Context::new();
        let result = executor.run_plan(&plan, &ctx);
        assert!(matches!(result, Err(ExecutionError::UnknownTool(_))));
    }

    #[test]
    fn test_nested_watch_is_rejected() {
        let registry = Registry::new();
        let tools = ToolSet::default();
        let executor = Executor::new(&registry, &tools, &[]);

        let mut plan = Plan::new();
        plan.push(PlanStep::Watch);

        let ctx = Context::new();
        let result = executor.run_watch_plan(&plan, &ctx);
        assert!(matches!(result, Err(ExecutionError::NestedWatch)));
    }
}
