use super::WorkflowStep;
use super::step::non_empty;
use ahash::AHashMap;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Initial key/value map available to condition evaluation.
pub type Variables = AHashMap<String, serde_json::Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkflowStatus {
    #[default]
    Draft,
    Active,
    Paused,
    Archived,
}

impl fmt::Display for WorkflowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WorkflowStatus::Draft => "draft",
            WorkflowStatus::Active => "active",
            WorkflowStatus::Paused => "paused",
            WorkflowStatus::Archived => "archived",
        };
        f.write_str(name)
    }
}

/// An immutable workflow snapshot, as produced by `WorkflowBuilder::build`.
///
/// `steps` is an arena: the graph lives in the string ids each step carries,
/// not in the order of this vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionalWorkflow {
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
    pub steps: Vec<WorkflowStep>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_step_id: Option<String>,
    #[serde(default)]
    pub variables: Variables,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ConditionalWorkflow {
    /// Looks up a step by id.
    pub fn step(&self, id: &str) -> Option<&WorkflowStep> {
        self.steps.iter().find(|step| step.id == id)
    }

    /// Builds an id -> step index over the arena.
    pub fn step_index(&self) -> AHashMap<&str, &WorkflowStep> {
        self.steps
            .iter()
            .map(|step| (step.id.as_str(), step))
            .collect()
    }

    /// The step a walk starts from.
    ///
    /// `root_step_id` wins when set. Otherwise the step with the lowest `order`
    /// is used, and among equal orders the one that comes first in `steps`.
    pub fn entry_step_id(&self) -> Option<&str> {
        non_empty(&self.root_step_id).or_else(|| {
            self.steps
                .iter()
                .min_by_key(|step| step.order)
                .map(|step| step.id.as_str())
        })
    }
}
