//! Tests for the document form and persistence shapes.
mod common;
use bunki::prelude::*;
use common::*;
use serde_json::json;
use std::fs;
use std::path::PathBuf;

fn setup_test_dir() -> PathBuf {
    let dir = std::env::temp_dir().join("bunki-tests");
    fs::create_dir_all(&dir).expect("Failed to create test directory");
    dir
}

#[test]
fn test_round_trip_law() {
    for builder in [
        create_linear_builder(),
        create_branch_builder(),
        create_support_builder(),
    ] {
        let workflow = builder.build();
        let rebuilt = create_workflow_from_json(workflow_to_json(&workflow)).build();
        assert_eq!(rebuilt, workflow);
    }
}

#[test]
fn test_round_trip_through_json_text() {
    let mut builder = create_support_builder();
    builder
        .set_variable("threshold", 2.5)
        .set_variable("tags", json!(["a", "b"]))
        .update_step(
            "standard",
            StepPatch {
                position: Some(Some(StepPosition { x: 120.5, y: -40.0 })),
                ..StepPatch::default()
            },
        );
    let workflow = builder.build();

    let text = builder_json(&workflow);
    let document = WorkflowDocument::from_json_str(&text).expect("parse document");
    let rebuilt = document
        .into_workflow()
        .expect("convert document")
        .build();
    assert_eq!(rebuilt, workflow);
}

#[test]
fn test_full_precision_floats_survive_json_text() {
    let mut builder = create_linear_builder();
    builder
        .set_variable("score", 9883.853299755387)
        .set_variable("tiny", 1.0715660391465826e-75)
        .update_step(
            "B",
            StepPatch {
                position: Some(Some(StepPosition {
                    x: 9883.853299755387,
                    y: 0.1 + 0.2,
                })),
                ..StepPatch::default()
            },
        );
    let workflow = builder.build();

    let path = setup_test_dir().join("precision_workflow.json");
    let path_str = path.to_str().expect("utf-8 path");
    workflow_to_json(&workflow).save(path_str).expect("save");
    let loaded = WorkflowDocument::from_file(path_str).expect("load");
    let _ = fs::remove_file(&path);

    assert_eq!(create_workflow_from_json(loaded).build(), workflow);
}

fn builder_json(workflow: &ConditionalWorkflow) -> String {
    workflow_to_json(workflow)
        .to_json_string()
        .expect("serialize document")
}

#[test]
fn test_document_shape() {
    let workflow = create_branch_builder().build();
    let value: serde_json::Value =
        serde_json::from_str(&builder_json(&workflow)).expect("valid json");

    assert_eq!(value["workflow"]["id"], "wf-branch");
    assert_eq!(value["workflow"]["status"], "draft");
    assert_eq!(value["flow"]["root_step_id"], "A");

    let first = &value["flow"]["steps"][0];
    assert_eq!(first["type"], "if");
    assert_eq!(first["condition"]["operation"], "equals");
    assert_eq!(first["if_true_step_id"], "B");
    assert!(first.get("next_step_id").is_none());
}

#[test]
fn test_unknown_operation_survives_round_trip() {
    let text = r#"{
        "workflow": {
            "id": "wf-future",
            "agent_id": "agent",
            "name": "Future",
            "created_at": "2026-01-01T00:00:00Z",
            "updated_at": "2026-01-02T00:00:00Z"
        },
        "flow": {
            "steps": [
                {
                    "id": "A",
                    "name": "Regex check",
                    "type": "if",
                    "condition": { "variable": "user_input", "operation": "matches_regex", "value": "^y" },
                    "if_true_step_id": "B"
                },
                { "id": "B", "name": "Done", "type": "instruction", "order": 1, "instruction": "ok" }
            ]
        }
    }"#;

    let workflow = WorkflowDocument::from_json_str(text)
        .expect("parse")
        .into_builder()
        .build();
    let condition = workflow.steps[0].condition.as_ref().expect("condition");
    assert_eq!(condition.operation.as_str(), "matches_regex");
    assert_eq!(workflow.status, WorkflowStatus::Draft);

    let ctx = ExecutionContext::new().with_user_input("yes");
    assert_eq!(build_execution_path(&workflow, &ctx), ["A"]);

    let again = builder_json(&workflow);
    assert!(again.contains("\"matches_regex\""));
}

#[test]
fn test_rejects_unknown_step_type() {
    let text = r#"{
        "workflow": { "id": "x", "agent_id": "a", "name": "n",
                      "created_at": "2026-01-01T00:00:00Z", "updated_at": "2026-01-01T00:00:00Z" },
        "flow": { "steps": [ { "id": "A", "name": "A", "type": "loop" } ] }
    }"#;
    let result = WorkflowDocument::from_json_str(text);
    assert!(matches!(result, Err(WorkflowError::JsonParseError(_))));
}

#[test]
fn test_duplicate_steps_rejected_by_conversion() {
    let mut document = workflow_to_json(&create_linear_builder().build());
    let duplicate = document.flow.steps[0].clone();
    document.flow.steps.push(duplicate);

    match document.into_workflow() {
        Err(ConversionError::DuplicateStep { step_id }) => assert_eq!(step_id, "A"),
        other => panic!("Expected DuplicateStep error, got {:?}", other.map(|b| b.build())),
    }
}

#[test]
fn test_duplicate_steps_in_document_keep_last_definition() {
    let mut document = workflow_to_json(&create_linear_builder().build());
    let mut replacement = document.flow.steps[0].clone();
    replacement.instruction = Some("Say goodbye".to_string());
    document.flow.steps.push(replacement);

    let builder = create_workflow_from_json(document);
    assert_eq!(
        builder.warnings(),
        [BuilderWarning::ReplacedStep {
            step_id: "A".to_string()
        }]
    );

    let workflow = builder.build();
    assert_eq!(workflow.steps.len(), 3);
    assert_eq!(
        workflow.step("A").and_then(|s| s.instruction.as_deref()),
        Some("Say goodbye")
    );
}

#[test]
fn test_create_request_converts_back() {
    let workflow = create_support_builder().build();
    let request = CreateWorkflowRequest::from(&workflow);
    let rebuilt = request.into_workflow().expect("convert").build();

    assert_eq!(rebuilt.steps, workflow.steps);
    assert_eq!(rebuilt.root_step_id, workflow.root_step_id);
    assert_eq!(rebuilt.variables, workflow.variables);
    assert_eq!(rebuilt.trigger_phrase, workflow.trigger_phrase);
}

#[test]
fn test_update_request_is_full_replacement() {
    let builder = create_linear_builder();
    let request = builder.build_update_request();
    assert_eq!(request.name.as_deref(), Some("Linear"));
    assert_eq!(request.steps.map(|s| s.len()), Some(3));

    let empty: UpdateWorkflowRequest = serde_json::from_str("{}").expect("parse");
    assert_eq!(empty, UpdateWorkflowRequest::default());
}

#[test]
fn test_build_json_matches_document() {
    let builder = create_linear_builder();
    let text = builder.build_json().expect("build json");
    let document = WorkflowDocument::from_json_str(&text).expect("parse");
    assert_eq!(document.workflow.id, "wf-linear");
    assert_eq!(document.flow.steps.len(), 3);
}

#[test]
fn test_save_and_load_file() {
    let path = setup_test_dir().join("support_workflow.json");
    let path_str = path.to_str().expect("utf-8 path");

    let workflow = create_support_builder().build();
    workflow_to_json(&workflow).save(path_str).expect("save");
    let loaded = WorkflowDocument::from_file(path_str).expect("load");
    assert_eq!(create_workflow_from_json(loaded).build(), workflow);

    let _ = fs::remove_file(&path);
}

#[test]
fn test_missing_file_reports_path() {
    let err = WorkflowDocument::from_file("/definitely/not/here.json").unwrap_err();
    assert!(err.to_string().contains("/definitely/not/here.json"));
}
