use thiserror::Error;

/// Errors raised by the document and file helpers.
///
/// Structural problems inside a workflow are never reported through this type;
/// they are collected by the validator instead.
#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error("Failed to parse workflow JSON: {0}")]
    JsonParseError(#[from] serde_json::Error),

    #[error("Could not access workflow file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Conversion(#[from] ConversionError),
}

/// Errors that can occur when converting a foreign format into a `WorkflowBuilder`.
#[derive(Error, Debug, Clone)]
pub enum ConversionError {
    #[error("Invalid workflow data: {0}")]
    ValidationError(String),

    #[error("Step '{step_id}' appears more than once")]
    DuplicateStep { step_id: String },
}

/// A misuse of the builder API that was ignored instead of raised.
///
/// Builder mutators never fail. Calls that reference an unknown step (or the
/// wrong kind of step) leave the builder untouched and record one of these.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuilderWarning {
    #[error("{operation}: step '{step_id}' does not exist")]
    UnknownStep {
        operation: &'static str,
        step_id: String,
    },

    #[error("connect_if_branch: step '{step_id}' is not an if step")]
    NotAnIfStep { step_id: String },

    #[error("step '{step_id}' was added twice; the earlier definition was replaced")]
    ReplacedStep { step_id: String },
}
