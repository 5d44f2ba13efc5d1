//! Common test utilities for building workflows and contexts.
use bunki::prelude::*;

/// A linear workflow: `A -> B -> C`, rooted at `A`.
#[allow(dead_code)]
pub fn create_linear_builder() -> WorkflowBuilder {
    let mut builder = WorkflowBuilder::new("Linear", "agent-1");
    builder
        .set_id("wf-linear")
        .add_instruction_step("A", "Greet", "Say hello", StepOptions::new().next("B"))
        .add_instruction_step("B", "Ask", "Ask how to help", StepOptions::new().next("C"))
        .add_tool_step("C", "Search", "kb.search", StepOptions::new())
        .set_root_step("A");
    builder
}

/// A single branch on user input.
///
/// Logic: `user_input equals "yes"` -> `B`, otherwise -> `C`
#[allow(dead_code)]
pub fn create_branch_builder() -> WorkflowBuilder {
    let mut builder = WorkflowBuilder::new("Branch", "agent-1");
    builder
        .set_id("wf-branch")
        .add_if_step(
            "A",
            "Confirmed?",
            Condition::equals("user_input", "yes"),
            BranchOptions::new().if_true("B").if_false("C"),
        )
        .add_instruction_step("B", "Proceed", "Carry on", StepOptions::new())
        .add_instruction_step("C", "Cancel", "Stop here", StepOptions::new());
    builder
}

/// A richer workflow mixing every step type.
///
/// `trigger -> check_plan -(plan == "pro")-> priority_seq[priority, notify] -> wrap_up`
///                       `-(otherwise)-> standard -> wrap_up`
#[allow(dead_code)]
pub fn create_support_builder() -> WorkflowBuilder {
    let mut builder = WorkflowBuilder::new("Support", "agent-7");
    builder
        .set_id("wf-support")
        .set_description("Routes support requests by plan")
        .set_trigger_phrase("I need help")
        .set_status(WorkflowStatus::Active)
        .set_default(true)
        .set_variable("plan", "free")
        .add_trigger_step("trigger", "Help requested", StepOptions::new().next("check_plan"))
        .add_if_step(
            "check_plan",
            "Pro plan?",
            Condition::equals("plan", "pro").with_description("Pro customers skip the queue"),
            BranchOptions::new().if_true("priority_seq").if_false("standard"),
        )
        .add_sequence_step(
            "priority_seq",
            "Priority handling",
            ["priority", "notify"],
            StepOptions::new().next("wrap_up"),
        )
        .add_instruction_step(
            "priority",
            "Priority answer",
            "Answer immediately",
            StepOptions::new().next("notify"),
        )
        .add_tool_step("notify", "Notify team", "slack.post", StepOptions::new())
        .add_instruction_step(
            "standard",
            "Standard answer",
            "Answer from the FAQ",
            StepOptions::new().next("wrap_up"),
        )
        .add_instruction_step("wrap_up", "Wrap up", "Ask for feedback", StepOptions::new());
    builder
}

/// Every step id referenced anywhere in `workflow`.
#[allow(dead_code)]
pub fn all_references(workflow: &ConditionalWorkflow) -> Vec<String> {
    workflow
        .steps
        .iter()
        .flat_map(|step| {
            step.next_step_id
                .iter()
                .chain(step.if_true_step_id.iter())
                .chain(step.if_false_step_id.iter())
                .chain(step.child_step_ids.iter())
                .cloned()
                .collect::<Vec<_>>()
        })
        .collect()
}
