//! Condition evaluation.
//!
//! Evaluation never fails. Variables that cannot be resolved behave like the
//! empty string and unknown operations evaluate to `false`, so a malformed or
//! newer condition document degrades instead of stopping a walk.

use crate::model::{Condition, ConditionOperation, ExecutionContext};
use std::fmt;

mod engine;
pub mod value;

use engine::ConditionEngine;

/// Reserved variable name that resolves to `ExecutionContext::user_input`.
pub const USER_INPUT_VARIABLE: &str = "user_input";

/// Prefix that turns a variable into a reference to a previous step's output.
pub const STEP_OUTPUT_PREFIX: &str = "step_";

/// Where a condition's variable is read from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum VariableSource {
    UserInput,
    StepOutput { step_id: String },
    Variable { name: String },
}

impl VariableSource {
    /// Classifies a variable name. The user input token wins over the step
    /// prefix, which wins over a plain variable lookup.
    pub fn parse(variable: &str) -> Self {
        if variable == USER_INPUT_VARIABLE {
            VariableSource::UserInput
        } else if let Some(step_id) = variable.strip_prefix(STEP_OUTPUT_PREFIX) {
            VariableSource::StepOutput {
                step_id: step_id.to_string(),
            }
        } else {
            VariableSource::Variable {
                name: variable.to_string(),
            }
        }
    }
}

impl fmt::Display for VariableSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VariableSource::UserInput => write!(f, "${}", USER_INPUT_VARIABLE),
            VariableSource::StepOutput { step_id } => write!(f, "$output[{}]", step_id),
            VariableSource::Variable { name } => write!(f, "${}", name),
        }
    }
}

/// A record of how one condition was decided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionOutcome {
    pub source: VariableSource,
    /// The resolved value after string coercion.
    pub resolved: String,
    pub operation: ConditionOperation,
    /// The coerced operand, for operations that use one.
    pub operand: Option<String>,
    pub result: bool,
}

/// Evaluates `condition` against `context`.
///
/// ```
/// use bunki::evaluator::evaluate;
/// use bunki::model::{Condition, ExecutionContext};
///
/// let ctx = ExecutionContext::new().with_user_input("Yes please");
/// assert!(evaluate(&Condition::contains("user_input", "yes"), &ctx));
/// assert!(!evaluate(&Condition::new("user_input", "bogus_op"), &ctx));
/// ```
pub fn evaluate(condition: &Condition, context: &ExecutionContext) -> bool {
    ConditionEngine::new(condition, context).evaluate().result
}

/// Evaluates `condition` and keeps the resolved values for later reporting.
pub fn evaluate_traced(condition: &Condition, context: &ExecutionContext) -> ConditionOutcome {
    ConditionEngine::new(condition, context).evaluate()
}
