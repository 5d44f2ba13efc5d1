use serde::{Deserialize, Serialize};
use std::fmt;

/// The comparison applied by a [`Condition`].
///
/// The set is closed. Operation names that are not recognised are kept
/// verbatim in `Unknown` so a document written by a newer editor still
/// round-trips, but such conditions always evaluate to `false`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ConditionOperation {
    Contains,
    Equals,
    NotEquals,
    IsEmpty,
    IsNotEmpty,
    Unknown(String),
}

impl ConditionOperation {
    pub fn as_str(&self) -> &str {
        match self {
            ConditionOperation::Contains => "contains",
            ConditionOperation::Equals => "equals",
            ConditionOperation::NotEquals => "not_equals",
            ConditionOperation::IsEmpty => "is_empty",
            ConditionOperation::IsNotEmpty => "is_not_empty",
            ConditionOperation::Unknown(raw) => raw,
        }
    }

    /// Whether the operation compares against `Condition::value`.
    pub fn takes_operand(&self) -> bool {
        matches!(
            self,
            ConditionOperation::Contains
                | ConditionOperation::Equals
                | ConditionOperation::NotEquals
        )
    }
}

impl From<String> for ConditionOperation {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "contains" => ConditionOperation::Contains,
            "equals" => ConditionOperation::Equals,
            "not_equals" => ConditionOperation::NotEquals,
            "is_empty" => ConditionOperation::IsEmpty,
            "is_not_empty" => ConditionOperation::IsNotEmpty,
            _ => ConditionOperation::Unknown(raw),
        }
    }
}

impl From<&str> for ConditionOperation {
    fn from(raw: &str) -> Self {
        ConditionOperation::from(raw.to_string())
    }
}

impl From<ConditionOperation> for String {
    fn from(op: ConditionOperation) -> Self {
        match op {
            ConditionOperation::Unknown(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ConditionOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A decision predicate steering an `if` step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    /// `user_input`, `step_<id>` or a key into the workflow variables.
    pub variable: String,
    pub operation: ConditionOperation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Condition {
    pub fn new(variable: impl Into<String>, operation: impl Into<ConditionOperation>) -> Self {
        Self {
            variable: variable.into(),
            operation: operation.into(),
            value: None,
            description: None,
        }
    }

    pub fn with_value(mut self, value: impl Into<serde_json::Value>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn equals(variable: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        Self::new(variable, ConditionOperation::Equals).with_value(value)
    }

    pub fn not_equals(variable: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        Self::new(variable, ConditionOperation::NotEquals).with_value(value)
    }

    pub fn contains(variable: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        Self::new(variable, ConditionOperation::Contains).with_value(value)
    }

    pub fn is_empty(variable: impl Into<String>) -> Self {
        Self::new(variable, ConditionOperation::IsEmpty)
    }

    pub fn is_not_empty(variable: impl Into<String>) -> Self {
        Self::new(variable, ConditionOperation::IsNotEmpty)
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.value, self.operation.takes_operand()) {
            (Some(value), true) => write!(f, "{} {} {}", self.variable, self.operation, value),
            _ => write!(f, "{} {}", self.variable, self.operation),
        }
    }
}
