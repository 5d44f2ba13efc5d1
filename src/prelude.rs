//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and functions from the
//! bunki crate.
//!
//! # Example
//!
//! ```rust,no_run
//! use bunki::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let document = WorkflowDocument::from_file("path/to/workflow.json")?;
//! let workflow = create_workflow_from_json(document).build();
//!
//! let report = validate(&workflow);
//! if !report.is_valid {
//!     for error in &report.errors {
//!         eprintln!("{}", error);
//!     }
//! }
//!
//! let context = ExecutionContext::from_file("path/to/context.json")?;
//! println!("{:?}", build_execution_path(&workflow, &context));
//! # Ok(())
//! # }
//! ```

// Construction
pub use crate::builder::{BranchOptions, StepOptions, WorkflowBuilder, generate_id};

// Data model
pub use crate::model::{
    Condition, ConditionOperation, ConditionalWorkflow, ExecutionContext, StepPatch,
    StepPosition, StepType, Variables, WorkflowStatus, WorkflowStep,
};

// Evaluation and walking
pub use crate::evaluator::{ConditionOutcome, VariableSource, evaluate, evaluate_traced};
pub use crate::path::{ExecutionPathBuilder, ExecutionTrace, Termination, build_execution_path};

// Validation
pub use crate::validator::{
    ValidationIssue, ValidationResult, Validator, ValidatorOptions, validate,
};

// Persistence
pub use crate::document::{
    CreateWorkflowRequest, IntoWorkflow, UpdateWorkflowRequest, WorkflowDocument,
    create_workflow_from_json, workflow_to_json,
};

// Error types
pub use crate::error::{BuilderWarning, ConversionError, WorkflowError};

// Trace formatting
pub use crate::trace::PathFormatter;

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
