use super::{CreateWorkflowRequest, WorkflowDocument};
use crate::builder::WorkflowBuilder;
use crate::error::ConversionError;
use crate::model::WorkflowStep;
use ahash::AHashSet;

/// A trait for foreign workflow formats that can be turned into a `WorkflowBuilder`.
///
/// This is the extension point for loading workflows stored by other tools.
/// Implement it on your own structs to translate them into bunki's steps.
///
/// # Example
///
/// ```rust,no_run
/// use bunki::prelude::*;
/// use bunki::error::ConversionError;
///
/// // A format that stores a plain list of prompts to run one after another.
/// struct PromptList { agent: String, prompts: Vec<String> }
///
/// impl IntoWorkflow for PromptList {
///     fn into_workflow(self) -> std::result::Result<WorkflowBuilder, ConversionError> {
///         if self.prompts.is_empty() {
///             return Err(ConversionError::ValidationError("no prompts".to_string()));
///         }
///         let mut builder = WorkflowBuilder::new("Prompt list", self.agent);
///         let count = self.prompts.len();
///         for (i, prompt) in self.prompts.into_iter().enumerate() {
///             let mut options = StepOptions::new();
///             if i + 1 < count {
///                 options = options.next(format!("p{}", i + 1));
///             }
///             builder.add_instruction_step(format!("p{}", i), format!("Prompt {}", i), prompt, options);
///         }
///         Ok(builder)
///     }
/// }
/// ```
pub trait IntoWorkflow {
    /// Consumes the object and converts it into a builder.
    fn into_workflow(self) -> Result<WorkflowBuilder, ConversionError>;
}

impl IntoWorkflow for WorkflowDocument {
    fn into_workflow(self) -> Result<WorkflowBuilder, ConversionError> {
        reject_duplicates(&self.flow.steps)?;
        Ok(self.into_builder())
    }
}

impl IntoWorkflow for CreateWorkflowRequest {
    fn into_workflow(self) -> Result<WorkflowBuilder, ConversionError> {
        reject_duplicates(&self.steps)?;

        let mut builder = WorkflowBuilder::new(self.name, self.agent_id);
        builder
            .set_status(self.status)
            .set_default(self.is_default)
            .set_variables(self.variables);
        if let Some(description) = self.description {
            builder.set_description(description);
        }
        if let Some(phrase) = self.trigger_phrase {
            builder.set_trigger_phrase(phrase);
        }
        for step in self.steps {
            builder.add_step(step);
        }
        if let Some(root) = self.root_step_id {
            builder.set_root_step(root);
        }
        Ok(builder)
    }
}

fn reject_duplicates(steps: &[WorkflowStep]) -> Result<(), ConversionError> {
    let mut seen = AHashSet::new();
    match steps.iter().find(|step| !seen.insert(step.id.as_str())) {
        Some(step) => Err(ConversionError::DuplicateStep {
            step_id: step.id.clone(),
        }),
        None => Ok(()),
    }
}
