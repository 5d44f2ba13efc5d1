pub mod condition;
pub mod context;
pub mod step;
pub mod workflow;

pub use condition::*;
pub use context::*;
pub use step::{StepPatch, StepPosition, StepType, WorkflowStep};
pub use workflow::*;
