//! The persisted JSON form of a workflow.
//!
//! A document splits a snapshot into descriptive metadata and the graph
//! itself. Converting a snapshot to a document and back through
//! [`create_workflow_from_json`] rebuilds an equal snapshot.

use crate::builder::WorkflowBuilder;
use crate::error::WorkflowError;
use crate::model::{ConditionalWorkflow, Variables, WorkflowStatus, WorkflowStep};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;

pub mod conversion;
pub mod request;

pub use conversion::*;
pub use request::*;

/// Descriptive fields of a workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowMetadata {
    pub id: String,
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
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The graph half of a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowFlow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_step_id: Option<String>,
    pub steps: Vec<WorkflowStep>,
    #[serde(default)]
    pub variables: Variables,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowDocument {
    pub workflow: WorkflowMetadata,
    pub flow: WorkflowFlow,
}

impl WorkflowDocument {
    pub fn from_workflow(workflow: &ConditionalWorkflow) -> Self {
        Self {
            workflow: WorkflowMetadata {
                id: workflow.id.clone(),
                agent_id: workflow.agent_id.clone(),
                name: workflow.name.clone(),
                description: workflow.description.clone(),
                status: workflow.status,
                trigger_phrase: workflow.trigger_phrase.clone(),
                is_default: workflow.is_default,
                created_at: workflow.created_at,
                updated_at: workflow.updated_at,
            },
            flow: WorkflowFlow {
                root_step_id: workflow.root_step_id.clone(),
                steps: workflow.steps.clone(),
                variables: workflow.variables.clone(),
            },
        }
    }

    /// Rebuilds a builder holding every step and all metadata of this document.
    pub fn into_builder(self) -> WorkflowBuilder {
        let WorkflowDocument { workflow: meta, flow } = self;

        let mut builder = WorkflowBuilder::new(meta.name, meta.agent_id);
        builder
            .set_id(meta.id)
            .set_status(meta.status)
            .set_default(meta.is_default)
            .set_variables(flow.variables);
        if let Some(description) = meta.description {
            builder.set_description(description);
        }
        if let Some(phrase) = meta.trigger_phrase {
            builder.set_trigger_phrase(phrase);
        }
        for step in flow.steps {
            builder.add_step(step);
        }
        if let Some(root) = flow.root_step_id {
            builder.set_root_step(root);
        }
        // Last, so the replayed setters above do not count as edits.
        builder.restore_timestamps(meta.created_at, meta.updated_at);
        builder
    }

    pub fn to_json_string(&self) -> Result<String, WorkflowError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json_str(json: &str) -> Result<Self, WorkflowError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Saves the document as pretty-printed JSON.
    pub fn save(&self, path: &str) -> Result<(), WorkflowError> {
        let json = self.to_json_string()?;
        fs::write(path, json).map_err(|source| WorkflowError::Io {
            path: path.to_string(),
            source,
        })
    }

    /// Loads a document from a JSON file.
    pub fn from_file(path: &str) -> Result<Self, WorkflowError> {
        let content = fs::read_to_string(path).map_err(|source| WorkflowError::Io {
            path: path.to_string(),
            source,
        })?;
        Self::from_json_str(&content)
    }
}

/// Splits a snapshot into its persisted document form.
pub fn workflow_to_json(workflow: &ConditionalWorkflow) -> WorkflowDocument {
    WorkflowDocument::from_workflow(workflow)
}

/// Reconstructs a builder from a persisted document.
pub fn create_workflow_from_json(document: WorkflowDocument) -> WorkflowBuilder {
    document.into_builder()
}
