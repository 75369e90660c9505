//! Predicate evaluation
//!
//! Predicates are pure functions of the invocation context: they never touch
//! the filesystem or spawn commands, which keeps branch logic testable in
//! isolation from the tools it dispatches to.

use crate::config;
use crate::orchestrator::Context;

/// Runtime representation of a step predicate
#[derive(Debug, Clone)]
pub struct When {
    pub condition: WhenCondition,
}

/// Predicate forms
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WhenCondition {
    /// Context target equals the value
    TargetIs(String),

    /// Context target is absent or different
    TargetIsNot(String),

    /// No condition specified
    Always,
}

impl When {
    /// Create from a manifest predicate
    pub fn from_config(config: config::WhenDef) -> Self {
        let condition = if let Some(target) = config.target {
            WhenCondition::TargetIs(target)
        } else if let Some(target) = config.not_target {
            WhenCondition::TargetIsNot(target)
        } else {
            WhenCondition::Always
        };

        When { condition }
    }

    /// Evaluate against the invocation context
    pub fn evaluate(&self, ctx: &Context) -> bool {
        match &self.condition {
            WhenCondition::Always => true,
            WhenCondition::TargetIs(value) => ctx.target.as_deref() == Some(value.as_str()),
            WhenCondition::TargetIsNot(value) => ctx.target.as_deref() != Some(value.as_str()),
        }
    }
}

/// Evaluate a list of predicates (all must hold - AND logic)
pub fn evaluate_when_list(when_list: &[When], ctx: &Context) -> bool {
    when_list.iter().all(|when| when.evaluate(ctx))
}
