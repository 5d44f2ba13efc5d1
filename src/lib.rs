//! # Bunki - Conditional Workflow Model
//!
//! **Bunki** models an agent's multi-step behavior as a graph of typed steps:
//! instructions and tool calls, `if` branches steered by conditions, sequences
//! and triggers. Steps reference each other by string id only, so a workflow is
//! a flat arena that serializes cleanly and can never hold a dangling pointer.
//!
//! ## Core Workflow
//!
//! 1.  **Build**: Assemble steps with a [`WorkflowBuilder`](builder::WorkflowBuilder).
//!     Every mutator is chainable and never fails; ignored calls are recorded as warnings.
//! 2.  **Validate**: Check the snapshot for missing conditions, empty steps and
//!     dangling references with [`validate`](validator::validate).
//! 3.  **Persist**: Split the snapshot into its JSON document form and load it
//!     back with [`create_workflow_from_json`](document::create_workflow_from_json).
//! 4.  **Walk**: Given an [`ExecutionContext`](model::ExecutionContext), derive the
//!     ordered step ids a run will visit with
//!     [`build_execution_path`](path::build_execution_path).
//!
//! ## Quick Start
//!
//! ```rust
//! use bunki::prelude::*;
//!
//! let mut builder = WorkflowBuilder::new("Refund triage", "agent-42");
//! builder
//!     .add_trigger_step("start", "Refund requested", StepOptions::new().next("ask"))
//!     .add_if_step(
//!         "ask",
//!         "Has order number?",
//!         Condition::is_not_empty("order_number"),
//!         BranchOptions::new().if_true("lookup").if_false("request"),
//!     )
//!     .add_tool_step("lookup", "Look up order", "orders.lookup", StepOptions::new())
//!     .add_instruction_step(
//!         "request",
//!         "Ask for order number",
//!         "Politely ask the customer for their order number.",
//!         StepOptions::new(),
//!     );
//!
//! let result = builder.validate();
//! assert!(result.is_valid, "{:?}", result.errors);
//!
//! let workflow = builder.build();
//! let context = ExecutionContext::for_workflow(&workflow).with_variable("order_number", "A-1001");
//! assert_eq!(build_execution_path(&workflow, &context), ["start", "ask", "lookup"]);
//! ```

pub mod builder;
pub mod document;
pub mod error;
pub mod evaluator;
pub mod model;
pub mod path;
pub mod prelude;
pub mod trace;
pub mod validator;
