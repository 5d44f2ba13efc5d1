//! Incremental, chainable construction of workflows.
//!
//! Mutators take `&mut self` and hand the builder back so calls can be
//! chained. None of them fail: a call that names an unknown step is ignored
//! and recorded as a [`BuilderWarning`], which callers can inspect through
//! [`WorkflowBuilder::warnings`]. Run [`WorkflowBuilder::validate`] before
//! treating the result as executable.

use crate::document::{CreateWorkflowRequest, UpdateWorkflowRequest, WorkflowDocument};
use crate::error::{BuilderWarning, WorkflowError};
use crate::model::{
    Condition, ConditionalWorkflow, StepPatch, StepType, Variables, WorkflowStatus, WorkflowStep,
};
use crate::validator::{self, ValidationResult};
use ahash::AHashMap;
use chrono::{DateTime, Utc};

mod ids;

pub use ids::generate_id;

/// Prefix of ids generated for workflows that were built without one.
pub const WORKFLOW_ID_PREFIX: &str = "wf_";

/// Optional fields shared by instruction, tool, sequence and trigger steps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepOptions {
    pub description: Option<String>,
    pub next_step_id: Option<String>,
    pub order: Option<i32>,
}

impl StepOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn next(mut self, step_id: impl Into<String>) -> Self {
        self.next_step_id = Some(step_id.into());
        self
    }

    pub fn order(mut self, order: i32) -> Self {
        self.order = Some(order);
        self
    }
}

/// Optional fields of an `if` step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BranchOptions {
    pub description: Option<String>,
    pub if_true_step_id: Option<String>,
    pub if_false_step_id: Option<String>,
    pub order: Option<i32>,
}

impl BranchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn if_true(mut self, step_id: impl Into<String>) -> Self {
        self.if_true_step_id = Some(step_id.into());
        self
    }

    pub fn if_false(mut self, step_id: impl Into<String>) -> Self {
        self.if_false_step_id = Some(step_id.into());
        self
    }

    pub fn order(mut self, order: i32) -> Self {
        self.order = Some(order);
        self
    }
}

/// A mutable workflow under construction.
///
/// Each builder owns its own step map, so `clone()` yields a fully
/// independent copy.
#[derive(Debug, Clone)]
pub struct WorkflowBuilder {
    /// Generated at construction unless replaced through `set_id`.
    id: String,
    agent_id: String,
    name: String,
    description: Option<String>,
    status: WorkflowStatus,
    trigger_phrase: Option<String>,
    is_default: bool,
    root_step_id: Option<String>,
    variables: Variables,
    steps: AHashMap<String, WorkflowStep>,
    /// Insertion order, used as the tie-break between equal `order` values.
    insertion: Vec<String>,
    next_order: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    warnings: Vec<BuilderWarning>,
}

impl WorkflowBuilder {
    pub fn new(name: impl Into<String>, agent_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: generate_id(WORKFLOW_ID_PREFIX),
            agent_id: agent_id.into(),
            name: name.into(),
            description: None,
            status: WorkflowStatus::default(),
            trigger_phrase: None,
            is_default: false,
            root_step_id: None,
            variables: Variables::default(),
            steps: AHashMap::new(),
            insertion: Vec::new(),
            next_order: 0,
            created_at: now,
            updated_at: now,
            warnings: Vec::new(),
        }
    }

    // --- Metadata ---

    pub fn set_id(&mut self, id: impl Into<String>) -> &mut Self {
        self.id = id.into();
        self.touch()
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = name.into();
        self.touch()
    }

    pub fn set_description(&mut self, description: impl Into<String>) -> &mut Self {
        self.description = Some(description.into());
        self.touch()
    }

    pub fn set_trigger_phrase(&mut self, phrase: impl Into<String>) -> &mut Self {
        self.trigger_phrase = Some(phrase.into());
        self.touch()
    }

    pub fn set_default(&mut self, is_default: bool) -> &mut Self {
        self.is_default = is_default;
        self.touch()
    }

    pub fn set_status(&mut self, status: WorkflowStatus) -> &mut Self {
        self.status = status;
        self.touch()
    }

    pub fn set_root_step(&mut self, step_id: impl Into<String>) -> &mut Self {
        self.root_step_id = Some(step_id.into());
        self.touch()
    }

    pub fn set_variables(&mut self, variables: Variables) -> &mut Self {
        self.variables = variables;
        self.touch()
    }

    pub fn set_variable(
        &mut self,
        name: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> &mut Self {
        self.variables.insert(name.into(), value.into());
        self.touch()
    }

    // --- Steps ---

    /// Adds an `instruction` step carrying instruction text.
    pub fn add_instruction_step(
        &mut self,
        id: impl Into<String>,
        name: impl Into<String>,
        instruction: impl Into<String>,
        options: StepOptions,
    ) -> &mut Self {
        let mut step = self.new_step(id, name, StepType::Instruction, &options);
        step.instruction = Some(instruction.into());
        step.next_step_id = options.next_step_id;
        self.add_step(step)
    }

    /// Adds an `instruction` step that calls a tool.
    pub fn add_tool_step(
        &mut self,
        id: impl Into<String>,
        name: impl Into<String>,
        tool_name: impl Into<String>,
        options: StepOptions,
    ) -> &mut Self {
        let mut step = self.new_step(id, name, StepType::Instruction, &options);
        step.tool_name = Some(tool_name.into());
        step.next_step_id = options.next_step_id;
        self.add_step(step)
    }

    pub fn add_if_step(
        &mut self,
        id: impl Into<String>,
        name: impl Into<String>,
        condition: Condition,
        options: BranchOptions,
    ) -> &mut Self {
        let order = self.claim_order(options.order);
        let mut step = WorkflowStep::new(id, name, StepType::If);
        step.order = order;
        step.description = options.description;
        step.condition = Some(condition);
        step.if_true_step_id = options.if_true_step_id;
        step.if_false_step_id = options.if_false_step_id;
        self.add_step(step)
    }

    pub fn add_sequence_step<I, S>(
        &mut self,
        id: impl Into<String>,
        name: impl Into<String>,
        child_step_ids: I,
        options: StepOptions,
    ) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut step = self.new_step(id, name, StepType::Sequence, &options);
        step.child_step_ids = child_step_ids.into_iter().map(Into::into).collect();
        step.next_step_id = options.next_step_id;
        self.add_step(step)
    }

    pub fn add_trigger_step(
        &mut self,
        id: impl Into<String>,
        name: impl Into<String>,
        options: StepOptions,
    ) -> &mut Self {
        let mut step = self.new_step(id, name, StepType::Trigger, &options);
        step.next_step_id = options.next_step_id;
        self.add_step(step)
    }

    /// Inserts a fully formed step, keeping its own `order`.
    ///
    /// A step whose id is already present replaces the earlier one in place.
    pub fn add_step(&mut self, step: WorkflowStep) -> &mut Self {
        self.next_order = self.next_order.max(step.order.saturating_add(1));
        let id = step.id.clone();
        if self.steps.insert(id.clone(), step).is_some() {
            self.warn(BuilderWarning::ReplacedStep { step_id: id });
        } else {
            self.insertion.push(id);
        }
        self.touch()
    }

    /// Merges `patch` into an existing step. Unknown ids are ignored.
    pub fn update_step(&mut self, id: &str, patch: StepPatch) -> &mut Self {
        match self.steps.get_mut(id) {
            Some(step) => {
                step.apply(patch);
                let order = step.order;
                self.next_order = self.next_order.max(order.saturating_add(1));
                self.touch()
            }
            None => self.unknown_step("update_step", id),
        }
    }

    /// Points `from`'s default successor at `to`.
    pub fn connect_steps(&mut self, from: &str, to: impl Into<String>) -> &mut Self {
        match self.steps.get_mut(from) {
            Some(step) => {
                step.next_step_id = Some(to.into());
                self.touch()
            }
            None => self.unknown_step("connect_steps", from),
        }
    }

    /// Sets whichever branch targets are given on an `if` step.
    pub fn connect_if_branch(
        &mut self,
        if_step_id: &str,
        if_true: Option<&str>,
        if_false: Option<&str>,
    ) -> &mut Self {
        match self.steps.get_mut(if_step_id) {
            Some(step) if step.step_type == StepType::If => {
                if let Some(target) = if_true {
                    step.if_true_step_id = Some(target.to_string());
                }
                if let Some(target) = if_false {
                    step.if_false_step_id = Some(target.to_string());
                }
                self.touch()
            }
            Some(_) => {
                self.warn(BuilderWarning::NotAnIfStep {
                    step_id: if_step_id.to_string(),
                });
                self
            }
            None => self.unknown_step("connect_if_branch", if_step_id),
        }
    }

    /// Deletes a step and every reference to it.
    ///
    /// Afterwards no remaining step links to `id` through `next_step_id`,
    /// either branch target or `child_step_ids`, and the root is cleared if
    /// it was `id`.
    pub fn remove_step(&mut self, id: &str) -> &mut Self {
        if self.steps.remove(id).is_none() {
            return self.unknown_step("remove_step", id);
        }
        self.insertion.retain(|existing| existing != id);

        let scrubbed = self
            .steps
            .values_mut()
            .map(|step| step.scrub_reference(id))
            .filter(|changed| *changed)
            .count();
        if self.root_step_id.as_deref() == Some(id) {
            self.root_step_id = None;
        }

        tracing::debug!(step_id = %id, scrubbed, "Removed step");
        self.touch()
    }

    // --- Inspection ---

    pub fn step(&self, id: &str) -> Option<&WorkflowStep> {
        self.steps.get(id)
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    pub fn root_step_id(&self) -> Option<&str> {
        self.root_step_id.as_deref()
    }

    /// Calls that were ignored since the builder was created.
    pub fn warnings(&self) -> &[BuilderWarning] {
        &self.warnings
    }

    pub fn take_warnings(&mut self) -> Vec<BuilderWarning> {
        std::mem::take(&mut self.warnings)
    }

    // --- Output ---

    /// Materializes a snapshot.
    ///
    /// Steps come out sorted by `order`, ties kept in insertion order. A
    /// missing root defaults to the first step.
    pub fn build(&self) -> ConditionalWorkflow {
        let mut steps: Vec<WorkflowStep> = self
            .insertion
            .iter()
            .filter_map(|id| self.steps.get(id).cloned())
            .collect();
        steps.sort_by_key(|step| step.order);

        let root_step_id = self
            .root_step_id
            .clone()
            .filter(|id| !id.is_empty())
            .or_else(|| steps.first().map(|step| step.id.clone()));

        ConditionalWorkflow {
            id: self.id.clone(),
            agent_id: self.agent_id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            status: self.status,
            trigger_phrase: self.trigger_phrase.clone(),
            is_default: self.is_default,
            steps,
            root_step_id,
            variables: self.variables.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    pub fn build_document(&self) -> WorkflowDocument {
        WorkflowDocument::from_workflow(&self.build())
    }

    pub fn build_json(&self) -> Result<String, WorkflowError> {
        self.build_document().to_json_string()
    }

    pub fn build_create_request(&self) -> CreateWorkflowRequest {
        CreateWorkflowRequest::from(&self.build())
    }

    pub fn build_update_request(&self) -> UpdateWorkflowRequest {
        UpdateWorkflowRequest::from(&self.build())
    }

    pub fn validate(&self) -> ValidationResult {
        validator::validate(&self.build())
    }

    pub(crate) fn restore_timestamps(
        &mut self,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> &mut Self {
        self.created_at = created_at;
        self.updated_at = updated_at;
        self
    }

    // --- Internals ---

    fn new_step(
        &mut self,
        id: impl Into<String>,
        name: impl Into<String>,
        step_type: StepType,
        options: &StepOptions,
    ) -> WorkflowStep {
        let mut step = WorkflowStep::new(id, name, step_type);
        step.order = self.claim_order(options.order);
        step.description = options.description.clone();
        step
    }

    /// Explicit orders are kept as given; the counter only ever moves past them.
    fn claim_order(&mut self, explicit: Option<i32>) -> i32 {
        let order = explicit.unwrap_or(self.next_order);
        self.next_order = self.next_order.max(order.saturating_add(1));
        order
    }

    fn touch(&mut self) -> &mut Self {
        self.updated_at = Utc::now();
        self
    }

    fn unknown_step(&mut self, operation: &'static str, step_id: &str) -> &mut Self {
        self.warn(BuilderWarning::UnknownStep {
            operation,
            step_id: step_id.to_string(),
        });
        self
    }

    fn warn(&mut self, warning: BuilderWarning) {
        tracing::warn!(workflow = %self.name, %warning, "Ignored builder call");
        self.warnings.push(warning);
    }
}
