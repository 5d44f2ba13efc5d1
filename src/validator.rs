//! Structural checks for a workflow snapshot.
//!
//! Validation is read-only and never fails: every problem found is collected
//! and reported, none of them is repaired.

use crate::model::{ConditionalWorkflow, StepType, WorkflowStep};
use ahash::{AHashMap, AHashSet};
use itertools::Itertools;
use thiserror::Error;

/// A single structural defect.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    #[error("Workflow must have at least one step")]
    NoSteps,

    #[error("If step \"{step}\" must have a condition")]
    MissingCondition { step: String },

    #[error("If step \"{step}\" must have at least one branch (true or false)")]
    MissingBranch { step: String },

    #[error("Instruction step \"{step}\" must have either instruction text or a tool name")]
    EmptyInstruction { step: String },

    #[error("Step \"{step}\" references non-existent {link} step: {target}")]
    DanglingReference {
        step: String,
        link: &'static str,
        target: String,
    },

    #[error("Step \"{step}\" is part of a cycle")]
    Cycle { step: String },

    #[error("Step \"{step}\" is not reachable from the entry step")]
    Unreachable { step: String },
}

/// The outcome of validating a workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub issues: Vec<ValidationIssue>,
}

impl ValidationResult {
    fn from_issues(issues: Vec<ValidationIssue>) -> Self {
        Self {
            is_valid: issues.is_empty(),
            errors: issues.iter().map(ToString::to_string).collect(),
            issues,
        }
    }
}

/// Which of the optional graph checks to run on top of the structural ones.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidatorOptions {
    pub detect_cycles: bool,
    pub detect_unreachable: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Validator {
    options: ValidatorOptions,
}

impl Validator {
    pub fn new(options: ValidatorOptions) -> Self {
        Self { options }
    }

    /// A validator that also reports cycles and unreachable steps.
    pub fn strict() -> Self {
        Self::new(ValidatorOptions {
            detect_cycles: true,
            detect_unreachable: true,
        })
    }

    pub fn validate(&self, workflow: &ConditionalWorkflow) -> ValidationResult {
        if workflow.steps.is_empty() {
            return ValidationResult::from_issues(vec![ValidationIssue::NoSteps]);
        }

        let ids: AHashSet<&str> = workflow.steps.iter().map(|s| s.id.as_str()).collect();
        // Issues are reported in display order, not arena order.
        let ordered = workflow.steps.iter().sorted_by_key(|s| s.order).collect_vec();
        let mut issues = Vec::new();

        for step in &ordered {
            Self::check_payload(step, &mut issues);
            Self::check_references(step, &ids, &mut issues);
        }

        if self.options.detect_cycles || self.options.detect_unreachable {
            self.check_graph(workflow, &ordered, &mut issues);
        }

        tracing::debug!(
            workflow_id = %workflow.id,
            issues = issues.len(),
            "Validated workflow"
        );
        ValidationResult::from_issues(issues)
    }

    fn check_payload(step: &WorkflowStep, issues: &mut Vec<ValidationIssue>) {
        match step.step_type {
            StepType::If => {
                if step.condition.is_none() {
                    issues.push(ValidationIssue::MissingCondition {
                        step: step.name.clone(),
                    });
                }
                if step.if_true().is_none() && step.if_false().is_none() {
                    issues.push(ValidationIssue::MissingBranch {
                        step: step.name.clone(),
                    });
                }
            }
            StepType::Instruction if !step.has_payload() => {
                issues.push(ValidationIssue::EmptyInstruction {
                    step: step.name.clone(),
                });
            }
            _ => {}
        }
    }

    fn check_references(
        step: &WorkflowStep,
        ids: &AHashSet<&str>,
        issues: &mut Vec<ValidationIssue>,
    ) {
        let links = [
            ("next", step.next()),
            ("true branch", step.if_true()),
            ("false branch", step.if_false()),
        ];
        let children = step
            .child_step_ids
            .iter()
            .filter(|id| !id.is_empty())
            .map(|id| ("child", Some(id.as_str())));

        for (link, target) in links.into_iter().chain(children) {
            if let Some(target) = target.filter(|t| !ids.contains(t)) {
                issues.push(ValidationIssue::DanglingReference {
                    step: step.name.clone(),
                    link,
                    target: target.to_string(),
                });
            }
        }
    }

    /// Depth-first search from the entry over every outgoing link.
    fn check_graph(
        &self,
        workflow: &ConditionalWorkflow,
        ordered: &[&WorkflowStep],
        issues: &mut Vec<ValidationIssue>,
    ) {
        let index = workflow.step_index();
        let mut state: AHashMap<&str, VisitState> = AHashMap::new();
        let mut cyclic: AHashSet<&str> = AHashSet::new();

        if let Some(entry) = workflow.entry_step_id() {
            Self::visit(entry, &index, &mut state, &mut cyclic);
        }

        if self.options.detect_cycles {
            for step in ordered.iter().filter(|s| cyclic.contains(s.id.as_str())) {
                issues.push(ValidationIssue::Cycle {
                    step: step.name.clone(),
                });
            }
        }
        if self.options.detect_unreachable {
            issues.extend(
                ordered
                    .iter()
                    .filter(|s| !state.contains_key(s.id.as_str()))
                    .map(|s| ValidationIssue::Unreachable {
                        step: s.name.clone(),
                    }),
            );
        }
    }

    fn visit<'w>(
        id: &'w str,
        index: &AHashMap<&'w str, &'w WorkflowStep>,
        state: &mut AHashMap<&'w str, VisitState>,
        cyclic: &mut AHashSet<&'w str>,
    ) {
        let Some(step) = index.get(id).copied() else {
            return;
        };
        match state.get(id) {
            Some(VisitState::InProgress) => {
                cyclic.insert(step.id.as_str());
                return;
            }
            Some(VisitState::Done) => return,
            None => {}
        }

        state.insert(step.id.as_str(), VisitState::InProgress);
        for target in step.references() {
            Self::visit(target, index, state, cyclic);
        }
        state.insert(step.id.as_str(), VisitState::Done);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VisitState {
    InProgress,
    Done,
}

/// Runs the documented structural checks.
///
/// Cycles and unreachable steps are not reported here; use
/// [`Validator::strict`] for those.
pub fn validate(workflow: &ConditionalWorkflow) -> ValidationResult {
    Validator::default().validate(workflow)
}
