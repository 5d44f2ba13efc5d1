//! Integration tests for bunki
//!
//! End-to-end tests that verify the complete functionality works together.
//!
mod common;
use bunki::prelude::*;
use common::*;

/// Plays the part of the agent runtime: walks the graph one step at a time,
/// recording each step's output before the next condition is evaluated.
fn run_incrementally(
    workflow: &ConditionalWorkflow,
    mut context: ExecutionContext,
    outputs: &[(&str, &str)],
) -> Vec<String> {
    for (step_id, output) in outputs {
        context.record_output(*step_id, *output);
    }
    build_execution_path(workflow, &context)
}

#[test]
fn test_build_validate_persist_and_walk() {
    let mut builder = WorkflowBuilder::new("Order status", "agent-3");
    builder
        .set_id("wf-orders")
        .set_status(WorkflowStatus::Active)
        .add_trigger_step("start", "Status asked", StepOptions::new().next("lookup"))
        .add_tool_step("lookup", "Look up order", "orders.lookup", StepOptions::new().next("shipped?"))
        .add_if_step(
            "shipped?",
            "Shipped?",
            Condition::contains("step_lookup", "shipped"),
            BranchOptions::new().if_true("tracking").if_false("eta"),
        )
        .add_instruction_step("tracking", "Send tracking", "Share the tracking link", StepOptions::new())
        .add_instruction_step("eta", "Give ETA", "Explain the expected dispatch date", StepOptions::new());

    let report = builder.validate();
    assert!(report.is_valid, "{:?}", report.errors);

    let text = builder.build_json().expect("serialize");
    let workflow = WorkflowDocument::from_json_str(&text)
        .expect("parse")
        .into_workflow()
        .expect("convert")
        .build();

    let base = ExecutionContext::for_workflow(&workflow);

    // Before the lookup has produced anything the branch falls to `eta`.
    assert_eq!(
        run_incrementally(&workflow, base.clone(), &[]),
        ["start", "lookup", "shipped?", "eta"]
    );
    assert_eq!(
        run_incrementally(&workflow, base.clone(), &[("lookup", "Status: SHIPPED")]),
        ["start", "lookup", "shipped?", "tracking"]
    );
}

#[test]
fn test_editing_session() {
    let mut builder = create_support_builder();

    // Insert a confirmation step between trigger and the plan check.
    builder
        .add_if_step(
            "confirm",
            "Really need help?",
            Condition::not_equals("user_input", "never mind"),
            BranchOptions::new().if_true("check_plan").order(1),
        )
        .connect_steps("trigger", "confirm");

    let workflow = builder.build();
    let ctx = ExecutionContext::for_workflow(&workflow).with_user_input("never mind");
    let trace = ExecutionPathBuilder::new(&workflow).trace(&ctx);
    assert_eq!(trace.step_ids(), ["trigger", "confirm"]);
    assert!(matches!(trace.termination, Termination::DeadEnd { .. }));

    // Removing the step again leaves the trigger without a successor.
    builder.remove_step("confirm");
    let workflow = builder.build();
    assert_eq!(
        build_execution_path(&workflow, &ExecutionContext::new()),
        ["trigger"]
    );
    assert!(builder.warnings().is_empty());
}

#[test]
fn test_context_from_json() {
    let workflow = create_support_builder().build();
    let ctx = ExecutionContext::from_json_str(
        r#"{ "variables": { "plan": "pro" }, "previous_outputs": {}, "user_input": "help" }"#,
    )
    .expect("parse context");

    assert_eq!(
        build_execution_path(&workflow, &ctx).last().map(String::as_str),
        Some("notify")
    );
}
