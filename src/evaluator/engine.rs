use super::value::{coerce_to_string, is_falsy};
use super::{ConditionOutcome, VariableSource};
use crate::model::{Condition, ConditionOperation, ExecutionContext};
use serde_json::Value;
use std::borrow::Cow;

/// Evaluates a single condition against a borrowed context.
pub(super) struct ConditionEngine<'a> {
    condition: &'a Condition,
    context: &'a ExecutionContext,
}

impl<'a> ConditionEngine<'a> {
    pub(super) fn new(condition: &'a Condition, context: &'a ExecutionContext) -> Self {
        Self { condition, context }
    }

    pub(super) fn evaluate(&self) -> ConditionOutcome {
        let source = VariableSource::parse(&self.condition.variable);
        let resolved = self.resolve(&source);
        let resolved = resolved.as_deref();
        let resolved_text = coerce_to_string(resolved);
        let operand = coerce_to_string(self.condition.value.as_ref());

        let result = match &self.condition.operation {
            ConditionOperation::Equals => resolved_text == operand,
            ConditionOperation::NotEquals => resolved_text != operand,
            ConditionOperation::Contains => resolved_text
                .to_lowercase()
                .contains(&operand.to_lowercase()),
            ConditionOperation::IsEmpty => is_empty(resolved, &resolved_text),
            ConditionOperation::IsNotEmpty => !is_empty(resolved, &resolved_text),
            ConditionOperation::Unknown(raw) => {
                tracing::debug!(
                    operation = %raw,
                    variable = %self.condition.variable,
                    "unknown condition operation, failing closed"
                );
                false
            }
        };

        ConditionOutcome {
            source,
            resolved: resolved_text,
            operation: self.condition.operation.clone(),
            operand: self.condition.operation.takes_operand().then_some(operand),
            result,
        }
    }

    /// Looks the variable up in the context. `None` means it is not there.
    fn resolve(&self, source: &VariableSource) -> Option<Cow<'a, Value>> {
        match source {
            VariableSource::UserInput => {
                Some(Cow::Owned(Value::String(self.context.user_input.clone())))
            }
            VariableSource::StepOutput { step_id } => self
                .context
                .previous_outputs
                .get(step_id)
                .map(Cow::Borrowed),
            VariableSource::Variable { name } => {
                self.context.variables.get(name).map(Cow::Borrowed)
            }
        }
    }
}

fn is_empty(resolved: Option<&Value>, text: &str) -> bool {
    is_falsy(resolved) || text.trim().is_empty()
}
