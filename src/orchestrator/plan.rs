//! Plan resolution
//!
//! Expands a pipeline name into a flat, ordered execution plan: depth-first,
//! left-to-right, with predicates filtered against the invocation context.
//! A pipeline included twice expands twice; nothing is deduplicated. A stack
//! of in-progress names along the expansion path catches cycles before any
//! tool runs.

use crate::error::{ResolveError, ResolveResult};
use crate::orchestrator::{evaluate_when_list, Context, Registry, Step};
use std::fmt;

/// One entry of an execution plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanStep {
    /// Invoke a declared tool
    Tool(String),

    /// Block and re-run watcher steps on file changes
    Watch,
}

impl fmt::Display for PlanStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanStep::Tool(name) => write!(f, "{}", name),
            PlanStep::Watch => write!(f, "(watch)"),
        }
    }
}

/// The fully expanded, ordered sequence of plan steps for one invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Plan {
    steps: Vec<PlanStep>,
}

impl Plan {
    /// Create an empty plan
    pub fn new() -> Self {
        Plan { steps: Vec::new() }
    }

    /// Append a step
    pub fn push(&mut self, step: PlanStep) {
        self.steps.push(step);
    }

    /// Steps in execution order
    pub fn steps(&self) -> &[PlanStep] {
        &self.steps
    }

    /// Number of steps
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the plan is empty
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Tool ids in execution order (watch markers excluded)
    pub fn tool_names(&self) -> Vec<&str> {
        self.steps
            .iter()
            .filter_map(|step| match step {
                PlanStep::Tool(name) => Some(name.as_str()),
                PlanStep::Watch => None,
            })
            .collect()
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for step in &self.steps {
            writeln!(f, "{}", step)?;
        }
        Ok(())
    }
}

/// Resolve a pipeline name into an execution plan
pub fn resolve(registry: &Registry, name: &str, ctx: &Context) -> ResolveResult<Plan> {
    let mut plan = Plan::new();
    let mut path = Vec::new();
    expand_pipeline(registry, name, ctx, &mut path, &mut plan)?;
    Ok(plan)
}

/// Resolve a free-standing step list (used for watcher sub-plans)
pub fn resolve_steps(registry: &Registry, steps: &[Step], ctx: &Context) -> ResolveResult<Plan> {
    let mut plan = Plan::new();
    let mut path = Vec::new();
    expand_steps(registry, steps, ctx, &mut path, &mut plan)?;
    Ok(plan)
}

fn expand_pipeline(
    registry: &Registry,
    name: &str,
    ctx: &Context,
    path: &mut Vec<String>,
    plan: &mut Plan,
) -> ResolveResult<()> {
    if path.iter().any(|n| n == name) {
        path.push(name.to_string());
        return Err(ResolveError::Cycle(path.join(" -> ")));
    }

    let pipeline = registry
        .get(name)
        .ok_or_else(|| ResolveError::UnknownPipeline(name.to_string()))?;

    path.push(name.to_string());
    expand_steps(registry, &pipeline.steps, ctx, path, plan)?;
    path.pop();

    Ok(())
}

fn expand_steps(
    registry: &Registry,
    steps: &[Step],
    ctx: &Context,
    path: &mut Vec<String>,
    plan: &mut Plan,
) -> ResolveResult<()> {
    for step in steps {
        if !evaluate_when_list(&step.when, ctx) {
            continue;
        }

        for tool in &step.tools {
            plan.push(PlanStep::Tool(tool.clone()));
        }
        for reference in &step.pipelines {
            expand_pipeline(registry, reference, ctx, path, plan)?;
        }
        if step.watch {
            plan.push(PlanStep::Watch);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_manifest;

    fn registry_from(yaml: &str) -> Registry {
        let manifest = parse_manifest(yaml).unwrap();
        Registry::from_manifest(&manifest).unwrap()
    }

    #[test]
    fn test_resolve_flat_pipeline() {
        let registry = registry_from(
            r#"
pipelines:
  build:
    steps:
      - clean
      - compile
      - rev
"#,
        );
        let ctx = Context::new();
        let plan = resolve(&registry, "build", &ctx).unwrap();
        assert_eq!(plan.tool_names(), vec!["clean", "compile", "rev"]);
    }

    #[test]
    fn test_resolve_depth_first_left_to_right() {
        let registry = registry_from(
            r#"
pipelines:
  assets:
    steps:
      - sass
      - autoprefixer
  build:
    steps:
      - clean
      - pipeline: assets
      - rev
"#,
        );
        let ctx = Context::new();
        let plan = resolve(&registry, "build", &ctx).unwrap();
        assert_eq!(
            plan.tool_names(),
            vec!["clean", "sass", "autoprefixer", "rev"]
        );
    }

    #[test]
    fn test_resolve_no_deduplication() {
        // "clean" appears in two flows and runs once per inclusion
        let registry = registry_from(
            r#"
pipelines:
  prep:
    steps:
      - clean
      - copy-styles
  default:
    steps:
      - pipeline: prep
      - clean
      - pipeline: prep
"#,
        );
        let ctx = Context::new();
        let plan = resolve(&registry, "default", &ctx).unwrap();
        assert_eq!(
            plan.tool_names(),
            vec!["clean", "copy-styles", "clean", "clean", "copy-styles"]
        );
    }

    #[test]
    fn test_resolve_unknown_pipeline() {
        let registry = Registry::new();
        let ctx = Context::new();
        let result = resolve(&registry, "missing", &ctx);
        assert!(matches!(result, Err(ResolveError::UnknownPipeline(_))));
    }

    #[test]
    fn test_resolve_direct_cycle() {
        let registry = registry_from(
            r#"
pipelines:
  loop:
    steps:
      - pipeline: loop
"#,
        );
        let ctx = Context::new();
        let result = resolve(&registry, "loop", &ctx);
        match result {
            Err(ResolveError::Cycle(path)) => assert_eq!(path, "loop -> loop"),
            other => panic!("expected cycle error, got {:?}", other),
        }
    }

    #[test]
    fn test_resolve_transitive_cycle() {
        let registry = registry_from(
            r#"
pipelines:
  a:
    steps:
      - pipeline: b
  b:
    steps:
      - pipeline: c
  c:
    steps:
      - pipeline: a
"#,
        );
        let ctx = Context::new();
        let result = resolve(&registry, "a", &ctx);
        match result {
            Err(ResolveError::Cycle(path)) => assert_eq!(path, "a -> b -> c -> a"),
            other => panic!("expected cycle error, got {:?}", other),
        }
    }

    #[test]
    fn test_repeated_sibling_reference_is_not_a_cycle() {
        let registry = registry_from(
            r#"
pipelines:
  clean:
    steps:
      - rm-tmp
  default:
    steps:
      - pipeline: clean
      - pipeline: clean
"#,
        );
        let ctx = Context::new();
        let plan = resolve(&registry, "default", &ctx).unwrap();
        assert_eq!(plan.tool_names(), vec!["rm-tmp", "rm-tmp"]);
    }

    #[test]
    fn test_resolve_with_matching_target() {
        let registry = registry_from(
            r#"
pipelines:
  build:
    steps:
      - clean-dist
      - compile
  serve:
    steps:
      - when:
          target: dist
        pipeline: build
      - when:
          target: dist
        tool: keepalive
      - when:
          not-target: dist
        tool: clean-tmp
      - when:
          not-target: dist
        tool: livereload
"#,
        );

        // target=dist: equal to resolving build, plus the keep-alive tool
        let dist_ctx = Context::new().with_target(Some("dist".to_string()));
        let serve_plan = resolve(&registry, "serve", &dist_ctx).unwrap();
        let build_plan = resolve(&registry, "build", &dist_ctx).unwrap();

        let mut expected = build_plan.clone();
        expected.push(PlanStep::Tool("keepalive".to_string()));
        assert_eq!(serve_plan, expected);

        // Non-matching branches are excluded entirely
        assert!(!serve_plan.tool_names().contains(&"clean-tmp"));
        assert!(!serve_plan.tool_names().contains(&"livereload"));

        // No target: the dev branch only
        let dev_ctx = Context::new();
        let dev_plan = resolve(&registry, "serve", &dev_ctx).unwrap();
        assert_eq!(dev_plan.tool_names(), vec!["clean-tmp", "livereload"]);
    }

    #[test]
    fn test_resolve_watch_step() {
        let registry = registry_from(
            r#"
pipelines:
  serve:
    steps:
      - clean-tmp
      - watch: true
"#,
        );
        let ctx = Context::new();
        let plan = resolve(&registry, "serve", &ctx).unwrap();
        assert_eq!(plan.len(), 2);
        assert_eq!(plan.steps()[1], PlanStep::Watch);
        // watch markers do not show up as tools
        assert_eq!(plan.tool_names(), vec!["clean-tmp"]);
    }

    #[test]
    fn test_resolve_steps_for_watcher() {
        let registry = registry_from(
            r#"
pipelines:
  styles:
    steps:
      - sass
      - autoprefixer
"#,
        );
        let steps = vec![
            Step {
                when: Vec::new(),
                tools: vec!["lint".to_string()],
                pipelines: vec!["styles".to_string()],
                watch: false,
            },
        ];
        let ctx = Context::new();
        let plan = resolve_steps(&registry, &steps, &ctx).unwrap();
        assert_eq!(plan.tool_names(), vec!["lint", "sass", "autoprefixer"]);
    }

    #[test]
    fn test_plan_display() {
        let mut plan = Plan::new();
        plan.push(PlanStep::Tool("clean".to_string()));
        plan.push(PlanStep::Watch);
        assert_eq!(plan.to_string(), "clean\n(watch)\n");
    }
}
