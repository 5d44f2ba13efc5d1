//! Unit tests for core bunki types.
use bunki::prelude::*;

#[test]
fn test_condition_display() {
    assert_eq!(
        Condition::equals("user_input", "yes").to_string(),
        "user_input equals \"yes\""
    );
    assert_eq!(Condition::is_empty("notes").to_string(), "notes is_empty");
}

#[test]
fn test_operation_parsing() {
    assert_eq!(ConditionOperation::from("contains"), ConditionOperation::Contains);
    assert_eq!(ConditionOperation::from("not_equals"), ConditionOperation::NotEquals);
    assert_eq!(ConditionOperation::from("is_not_empty"), ConditionOperation::IsNotEmpty);
    assert_eq!(
        ConditionOperation::from("Equals"),
        ConditionOperation::Unknown("Equals".to_string())
    );
    assert_eq!(String::from(ConditionOperation::IsEmpty), "is_empty");
}

#[test]
fn test_variable_source_parsing() {
    assert_eq!(VariableSource::parse("user_input"), VariableSource::UserInput);
    assert_eq!(
        VariableSource::parse("step_lookup"),
        VariableSource::StepOutput {
            step_id: "lookup".to_string()
        }
    );
    assert_eq!(
        VariableSource::parse("user_name"),
        VariableSource::Variable {
            name: "user_name".to_string()
        }
    );
    assert_eq!(VariableSource::parse("step_lookup").to_string(), "$output[lookup]");
}

#[test]
fn test_step_type_serialization() {
    let json = serde_json::to_string(&StepType::If).expect("serialize");
    assert_eq!(json, "\"if\"");
    assert_eq!(StepType::Sequence.to_string(), "sequence");
    assert_eq!(WorkflowStatus::Archived.to_string(), "archived");
}

#[test]
fn test_step_references_skip_empty_ids() {
    let mut step = WorkflowStep::new("S", "Seq", StepType::Sequence);
    step.next_step_id = Some(String::new());
    step.child_step_ids = vec!["a".to_string(), String::new(), "b".to_string()];

    let refs: Vec<&str> = step.references().collect();
    assert_eq!(refs, ["a", "b"]);
    assert_eq!(step.next(), None);
}

#[test]
fn test_termination_display() {
    let termination = Termination::Cycle {
        step_id: "A".to_string(),
    };
    assert_eq!(termination.to_string(), "cycle back to 'A'");
}

#[test]
fn test_error_display() {
    let warning = BuilderWarning::UnknownStep {
        operation: "connect_steps",
        step_id: "ghost".to_string(),
    };
    assert!(warning.to_string().contains("connect_steps"));
    assert!(warning.to_string().contains("ghost"));

    let conversion = ConversionError::DuplicateStep {
        step_id: "A".to_string(),
    };
    assert!(conversion.to_string().contains("'A'"));

    let wrapped = WorkflowError::from(conversion);
    assert!(wrapped.to_string().contains("more than once"));

    let issue = ValidationIssue::DanglingReference {
        step: "Greet".to_string(),
        link: "next",
        target: "ghost".to_string(),
    };
    assert_eq!(
        issue.to_string(),
        "Step \"Greet\" references non-existent next step: ghost"
    );
}
