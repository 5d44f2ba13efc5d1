use crate::model::{ConditionalWorkflow, Variables, WorkflowStatus, WorkflowStep};
use serde::{Deserialize, Serialize};

/// The body a persistence service expects when creating a workflow.
///
/// The service assigns the workflow id and the timestamps, so neither is
/// sent. Steps keep their ids since links between them depend on those.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateWorkflowRequest {
    pub agent_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub status: WorkflowStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger_phrase: Option<String>,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_step_id: Option<String>,
    pub steps: Vec<WorkflowStep>,
    #[serde(default)]
    pub variables: Variables,
}

impl From<&ConditionalWorkflow> for CreateWorkflowRequest {
    fn from(workflow: &ConditionalWorkflow) -> Self {
        Self {
            agent_id: workflow.agent_id.clone(),
            name: workflow.name.clone(),
            description: workflow.description.clone(),
            status: workflow.status,
            trigger_phrase: workflow.trigger_phrase.clone(),
            is_default: workflow.is_default,
            root_step_id: workflow.root_step_id.clone(),
            steps: workflow.steps.clone(),
            variables: workflow.variables.clone(),
        }
    }
}

/// A partial update of a stored workflow. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateWorkflowRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<WorkflowStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger_phrase: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_default: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_step_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steps: Option<Vec<WorkflowStep>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variables: Option<Variables>,
}

impl From<&ConditionalWorkflow> for UpdateWorkflowRequest {
    /// A full replacement of everything the snapshot knows about.
    fn from(workflow: &ConditionalWorkflow) -> Self {
        Self {
            name: Some(workflow.name.clone()),
            description: workflow.description.clone(),
            status: Some(workflow.status),
            trigger_phrase: workflow.trigger_phrase.clone(),
            is_default: Some(workflow.is_default),
            root_step_id: workflow.root_step_id.clone(),
            steps: Some(workflow.steps.clone()),
            variables: Some(workflow.variables.clone()),
        }
    }
}
