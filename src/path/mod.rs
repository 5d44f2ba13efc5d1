//! Derives the ordered list of steps a run will visit.

use crate::evaluator::{ConditionOutcome, evaluate_traced};
use crate::model::{ConditionalWorkflow, ExecutionContext, StepType, WorkflowStep};
use ahash::{AHashMap, AHashSet};
use std::fmt;

/// Why a walk stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Termination {
    /// The last visited step had no successor.
    Completed,
    /// The workflow has no steps to start from.
    NoEntry,
    /// The walk came back to a step it had already visited.
    Cycle { step_id: String },
    /// A link pointed at a step that does not exist.
    MissingStep { step_id: String },
    /// An `if` step had no target for the branch its condition selected.
    DeadEnd { step_id: String },
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Termination::Completed => write!(f, "completed"),
            Termination::NoEntry => write!(f, "no entry step"),
            Termination::Cycle { step_id } => write!(f, "cycle back to '{}'", step_id),
            Termination::MissingStep { step_id } => write!(f, "missing step '{}'", step_id),
            Termination::DeadEnd { step_id } => write!(f, "dead end at '{}'", step_id),
        }
    }
}

/// One visited step, with the branch decision when it was an `if` step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepVisit {
    pub step_id: String,
    pub step_name: String,
    pub step_type: StepType,
    pub decision: Option<ConditionOutcome>,
}

/// The full record of a walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionTrace {
    pub visits: Vec<StepVisit>,
    pub termination: Termination,
}

impl ExecutionTrace {
    pub fn step_ids(&self) -> Vec<String> {
        self.visits.iter().map(|v| v.step_id.clone()).collect()
    }

    /// Whether the walk ended naturally rather than on a graph anomaly.
    pub fn is_complete(&self) -> bool {
        matches!(self.termination, Termination::Completed)
    }
}

/// Walks a workflow graph from its entry step.
///
/// The walk is bounded by the number of steps: every step is visited at most
/// once, and a revisit ends the walk.
pub struct ExecutionPathBuilder<'a> {
    workflow: &'a ConditionalWorkflow,
    index: AHashMap<&'a str, &'a WorkflowStep>,
}

impl<'a> ExecutionPathBuilder<'a> {
    pub fn new(workflow: &'a ConditionalWorkflow) -> Self {
        Self {
            workflow,
            index: workflow.step_index(),
        }
    }

    /// Returns just the visited step ids.
    pub fn build(&self, context: &ExecutionContext) -> Vec<String> {
        self.trace(context).step_ids()
    }

    pub fn trace(&self, context: &ExecutionContext) -> ExecutionTrace {
        let mut visited: AHashSet<&str> = AHashSet::new();
        let mut visits = Vec::new();
        let mut current = self.workflow.entry_step_id();

        let termination = loop {
            let Some(step_id) = current else {
                break if visits.is_empty() {
                    Termination::NoEntry
                } else {
                    Termination::Completed
                };
            };
            if visited.contains(step_id) {
                break Termination::Cycle {
                    step_id: step_id.to_string(),
                };
            }
            let Some(step) = self.index.get(step_id).copied() else {
                break Termination::MissingStep {
                    step_id: step_id.to_string(),
                };
            };

            visited.insert(step.id.as_str());
            let (next, decision) = Self::successor(step, context);
            visits.push(StepVisit {
                step_id: step.id.clone(),
                step_name: step.name.clone(),
                step_type: step.step_type,
                decision,
            });

            if next.is_none() && step.step_type == StepType::If {
                break Termination::DeadEnd {
                    step_id: step.id.clone(),
                };
            }
            current = next;
        };

        if !matches!(termination, Termination::Completed) {
            tracing::debug!(
                workflow_id = %self.workflow.id,
                visited = visits.len(),
                %termination,
                "Execution path stopped early"
            );
        }

        ExecutionTrace {
            visits,
            termination,
        }
    }

    fn successor<'s>(
        step: &'s WorkflowStep,
        context: &ExecutionContext,
    ) -> (Option<&'s str>, Option<ConditionOutcome>) {
        match step.step_type {
            StepType::If => {
                // An if step without a condition can only take its false branch.
                let outcome = step
                    .condition
                    .as_ref()
                    .map(|condition| evaluate_traced(condition, context));
                let taken = outcome.as_ref().is_some_and(|o| o.result);
                let next = if taken {
                    step.if_true()
                } else {
                    step.if_false()
                };
                (next, outcome)
            }
            StepType::Sequence => (step.first_child().or_else(|| step.next()), None),
            StepType::Instruction | StepType::Trigger => (step.next(), None),
        }
    }
}

/// Computes the ordered step ids a run of `workflow` will visit under `context`.
///
/// Never fails and never loops: cycles, missing steps and dead-end branches
/// simply end the path early. Run the validator beforehand when a strict
/// guarantee is needed.
pub fn build_execution_path(
    workflow: &ConditionalWorkflow,
    context: &ExecutionContext,
) -> Vec<String> {
    ExecutionPathBuilder::new(workflow).build(context)
}
