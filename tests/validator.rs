//! Tests for structural validation.
mod common;
use bunki::prelude::*;
use common::*;

#[test]
fn test_well_formed_workflows_are_valid() {
    for builder in [
        create_linear_builder(),
        create_branch_builder(),
        create_support_builder(),
    ] {
        let result = validate(&builder.build());
        assert!(result.is_valid, "unexpected errors: {:?}", result.errors);
        assert!(result.errors.is_empty());
    }
}

#[test]
fn test_empty_workflow_short_circuits() {
    let result = WorkflowBuilder::new("Empty", "agent").validate();
    assert!(!result.is_valid);
    assert_eq!(result.errors, ["Workflow must have at least one step"]);
}

#[test]
fn test_if_step_without_condition_or_branches() {
    let mut step = WorkflowStep::new("A", "Decide", StepType::If);
    step.condition = None;

    let mut builder = WorkflowBuilder::new("Broken if", "agent");
    builder.add_step(step);
    let result = builder.validate();

    assert!(!result.is_valid);
    assert_eq!(
        result.issues,
        [
            ValidationIssue::MissingCondition {
                step: "Decide".to_string()
            },
            ValidationIssue::MissingBranch {
                step: "Decide".to_string()
            },
        ]
    );
    assert!(result.errors[0].contains("must have a condition"));
    assert!(result.errors[1].contains("at least one branch"));
}

#[test]
fn test_if_step_with_single_branch_is_valid() {
    let mut builder = create_branch_builder();
    builder.update_step(
        "A",
        StepPatch {
            if_false_step_id: Some(None),
            ..StepPatch::default()
        },
    );
    assert!(builder.validate().is_valid);
}

#[test]
fn test_instruction_step_needs_payload() {
    let mut builder = create_linear_builder();
    builder.update_step(
        "B",
        StepPatch {
            instruction: Some(Some(String::new())),
            ..StepPatch::default()
        },
    );

    let result = builder.validate();
    assert!(!result.is_valid);
    assert_eq!(
        result.errors,
        ["Instruction step \"Ask\" must have either instruction text or a tool name"]
    );
}

#[test]
fn test_dangling_references_are_reported_by_name() {
    let mut builder = create_support_builder();
    builder
        .connect_steps("wrap_up", "ghost")
        .connect_if_branch("check_plan", Some("phantom"), None)
        .update_step(
            "priority_seq",
            StepPatch {
                child_step_ids: Some(vec!["priority".to_string(), "spectre".to_string()]),
                ..StepPatch::default()
            },
        );

    let result = builder.validate();
    assert!(!result.is_valid);
    assert_eq!(result.errors.len(), 3);
    assert!(
        result
            .errors
            .contains(&"Step \"Wrap up\" references non-existent next step: ghost".to_string())
    );
    assert!(result.errors.iter().any(|e| e.contains("Pro plan?") && e.contains("phantom")));
    assert!(result.errors.iter().any(|e| e.contains("spectre")));
}

#[test]
fn test_errors_accumulate() {
    let mut builder = create_linear_builder();
    builder
        .connect_steps("A", "nowhere")
        .add_step(WorkflowStep::new("E", "Empty", StepType::Instruction));

    let result = builder.validate();
    assert_eq!(result.issues.len(), 2);
}

#[test]
fn test_default_validation_ignores_cycles() {
    let mut builder = create_linear_builder();
    builder.connect_steps("C", "A");
    assert!(builder.validate().is_valid);
}

#[test]
fn test_strict_validation_reports_cycles_and_unreachable() {
    let mut builder = create_linear_builder();
    builder
        .connect_steps("C", "A")
        .add_instruction_step("orphan", "Orphan", "never reached", StepOptions::new());
    let workflow = builder.build();

    let result = Validator::strict().validate(&workflow);
    assert!(!result.is_valid);
    assert!(result.issues.contains(&ValidationIssue::Cycle {
        step: "Greet".to_string()
    }));
    assert!(result.issues.contains(&ValidationIssue::Unreachable {
        step: "Orphan".to_string()
    }));

    let cycles_only = Validator::new(ValidatorOptions {
        detect_cycles: true,
        detect_unreachable: false,
    });
    assert_eq!(cycles_only.validate(&workflow).issues.len(), 1);
}
