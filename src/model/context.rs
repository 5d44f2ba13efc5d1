use super::{ConditionalWorkflow, Variables};
use crate::error::WorkflowError;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::fs;

/// Per-run state that conditions are evaluated against.
///
/// The execution engine owns and fills this; the evaluator and the path
/// builder only ever read it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecutionContext {
    #[serde(default)]
    pub variables: Variables,
    /// Results of completed steps, keyed by step id.
    #[serde(default)]
    pub previous_outputs: AHashMap<String, serde_json::Value>,
    #[serde(default)]
    pub user_input: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_step_id: Option<String>,
}

impl ExecutionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a context from a working copy of the workflow's variables.
    pub fn for_workflow(workflow: &ConditionalWorkflow) -> Self {
        Self {
            variables: workflow.variables.clone(),
            ..Self::default()
        }
    }

    pub fn with_user_input(mut self, input: impl Into<String>) -> Self {
        self.user_input = input.into();
        self
    }

    pub fn with_variable(
        mut self,
        name: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.variables.insert(name.into(), value.into());
        self
    }

    pub fn with_output(
        mut self,
        step_id: impl Into<String>,
        output: impl Into<serde_json::Value>,
    ) -> Self {
        self.record_output(step_id, output);
        self
    }

    /// Stores the result of a completed step so later conditions can see it.
    pub fn record_output(
        &mut self,
        step_id: impl Into<String>,
        output: impl Into<serde_json::Value>,
    ) {
        self.previous_outputs.insert(step_id.into(), output.into());
    }

    pub fn from_json_str(json: &str) -> Result<Self, WorkflowError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a context from a JSON file.
    pub fn from_file(path: &str) -> Result<Self, WorkflowError> {
        let content = fs::read_to_string(path).map_err(|source| WorkflowError::Io {
            path: path.to_string(),
            source,
        })?;
        Self::from_json_str(&content)
    }
}
