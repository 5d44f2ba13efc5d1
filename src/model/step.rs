use super::Condition;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of step kinds a workflow graph is made of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepType {
    /// A leaf step carrying an instruction or a tool call.
    Instruction,
    /// A branch steered by a condition.
    If,
    /// A container that enters its first child.
    Sequence,
    /// An entry marker, usually matched against a trigger phrase.
    Trigger,
}

impl fmt::Display for StepType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StepType::Instruction => "instruction",
            StepType::If => "if",
            StepType::Sequence => "sequence",
            StepType::Trigger => "trigger",
        };
        f.write_str(name)
    }
}

/// Editor layout coordinate. Ignored by evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StepPosition {
    pub x: f64,
    pub y: f64,
}

/// A single node of the workflow graph.
///
/// Steps reference each other only by `id`; the workflow owns them all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowStep {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub step_type: StepType,
    #[serde(default)]
    pub order: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instruction: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub if_true_step_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub if_false_step_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub child_step_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_step_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<StepPosition>,
}

impl WorkflowStep {
    /// Creates a bare step of the given type with no payload or links.
    pub fn new(id: impl Into<String>, name: impl Into<String>, step_type: StepType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            step_type,
            order: 0,
            instruction: None,
            tool_name: None,
            condition: None,
            if_true_step_id: None,
            if_false_step_id: None,
            child_step_ids: Vec::new(),
            next_step_id: None,
            position: None,
        }
    }

    pub fn next(&self) -> Option<&str> {
        non_empty(&self.next_step_id)
    }

    pub fn if_true(&self) -> Option<&str> {
        non_empty(&self.if_true_step_id)
    }

    pub fn if_false(&self) -> Option<&str> {
        non_empty(&self.if_false_step_id)
    }

    pub fn first_child(&self) -> Option<&str> {
        self.child_step_ids
            .first()
            .map(String::as_str)
            .filter(|id| !id.is_empty())
    }

    pub fn has_payload(&self) -> bool {
        non_empty(&self.instruction).is_some() || non_empty(&self.tool_name).is_some()
    }

    /// Every outgoing reference of this step, in field order.
    pub fn references(&self) -> impl Iterator<Item = &str> {
        self.next()
            .into_iter()
            .chain(self.if_true())
            .chain(self.if_false())
            .chain(
                self.child_step_ids
                    .iter()
                    .map(String::as_str)
                    .filter(|id| !id.is_empty()),
            )
    }

    /// Drops every link pointing at `target`. Returns whether anything changed.
    pub(crate) fn scrub_reference(&mut self, target: &str) -> bool {
        let mut changed = false;
        for link in [
            &mut self.next_step_id,
            &mut self.if_true_step_id,
            &mut self.if_false_step_id,
        ] {
            if link.as_deref() == Some(target) {
                *link = None;
                changed = true;
            }
        }
        let before = self.child_step_ids.len();
        self.child_step_ids.retain(|id| id != target);
        changed || before != self.child_step_ids.len()
    }

    /// Merges every field set in `patch` into this step.
    pub fn apply(&mut self, patch: StepPatch) {
        let StepPatch {
            name,
            description,
            step_type,
            order,
            instruction,
            tool_name,
            condition,
            if_true_step_id,
            if_false_step_id,
            child_step_ids,
            next_step_id,
            position,
        } = patch;

        if let Some(name) = name {
            self.name = name;
        }
        if let Some(step_type) = step_type {
            self.step_type = step_type;
        }
        if let Some(order) = order {
            self.order = order;
        }
        if let Some(children) = child_step_ids {
            self.child_step_ids = children;
        }
        if let Some(description) = description {
            self.description = description;
        }
        if let Some(instruction) = instruction {
            self.instruction = instruction;
        }
        if let Some(tool_name) = tool_name {
            self.tool_name = tool_name;
        }
        if let Some(condition) = condition {
            self.condition = condition;
        }
        if let Some(target) = if_true_step_id {
            self.if_true_step_id = target;
        }
        if let Some(target) = if_false_step_id {
            self.if_false_step_id = target;
        }
        if let Some(target) = next_step_id {
            self.next_step_id = target;
        }
        if let Some(position) = position {
            self.position = position;
        }
    }
}

/// A partial update for [`WorkflowStep`].
///
/// `None` leaves a field untouched. For optional step fields the inner
/// `Option` is the new value, so `Some(None)` clears the field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepPatch {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub step_type: Option<StepType>,
    pub order: Option<i32>,
    pub instruction: Option<Option<String>>,
    pub tool_name: Option<Option<String>>,
    pub condition: Option<Option<Condition>>,
    pub if_true_step_id: Option<Option<String>>,
    pub if_false_step_id: Option<Option<String>>,
    pub child_step_ids: Option<Vec<String>>,
    pub next_step_id: Option<Option<String>>,
    pub position: Option<Option<StepPosition>>,
}

pub(crate) fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}
