use crate::evaluator::ConditionOutcome;
use crate::path::{ExecutionTrace, StepVisit, Termination};
use itertools::Itertools;

/// Formats execution traces into human-readable strings
pub struct PathFormatter;

impl PathFormatter {
    /// Format a trace as `Step -> Step [reason] -> Step`, followed by the
    /// termination when the walk stopped on an anomaly.
    pub fn format_trace(trace: &ExecutionTrace) -> String {
        let mut result = trace.visits.iter().map(Self::format_visit).join(" -> ");

        match &trace.termination {
            Termination::Completed => {}
            Termination::NoEntry => result.push_str("(empty workflow)"),
            other => result.push_str(&format!(" (stopped: {})", other)),
        }
        result
    }

    fn format_visit(visit: &StepVisit) -> String {
        match &visit.decision {
            Some(outcome) => format!("{} [{}]", visit.step_name, Self::format_outcome(outcome)),
            None => visit.step_name.clone(),
        }
    }

    /// Format a single condition decision, e.g. `$user_input (was "no") equals "yes" => false`.
    pub fn format_outcome(outcome: &ConditionOutcome) -> String {
        let subject = format!("{} (was {:?})", outcome.source, outcome.resolved);
        match &outcome.operand {
            Some(operand) => format!(
                "{} {} {:?} => {}",
                subject, outcome.operation, operand, outcome.result
            ),
            None => format!("{} {} => {}", subject, outcome.operation, outcome.result),
        }
    }
}
