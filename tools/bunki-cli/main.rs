use bunki::prelude::*;
use clap::{Parser, Subcommand};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// Inspect conditional workflow documents from the command line
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check a workflow document for structural problems
    Validate {
        /// Path to the workflow document JSON file
        workflow_path: String,

        /// Also report cycles and steps unreachable from the entry
        #[arg(short, long)]
        strict: bool,
    },
    /// Print the steps a run would visit
    Path {
        /// Path to the workflow document JSON file
        workflow_path: String,

        /// Optional path to an execution context JSON file
        #[arg(short, long)]
        context: Option<String>,

        /// User input to evaluate conditions against
        #[arg(short, long)]
        input: Option<String>,

        /// Extra variables as key=value pairs
        #[arg(long = "var", value_parser = parse_key_value)]
        vars: Vec<(String, String)>,
    },
    /// Re-emit a workflow document, or the API request built from it
    Export {
        /// Path to the workflow document JSON file
        workflow_path: String,

        /// Emit a create request (no id, no timestamps)
        #[arg(long, conflicts_with = "update_request")]
        create_request: bool,

        /// Emit a full-replacement update request
        #[arg(long)]
        update_request: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Validate {
            workflow_path,
            strict,
        } => run_validate(&workflow_path, strict),
        Command::Path {
            workflow_path,
            context,
            input,
            vars,
        } => run_path(&workflow_path, context.as_deref(), input, vars),
        Command::Export {
            workflow_path,
            create_request,
            update_request,
        } => run_export(&workflow_path, create_request, update_request),
    }
}

fn load_builder(path: &str) -> WorkflowBuilder {
    let document = WorkflowDocument::from_file(path)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to load workflow: {}", e)));
    document
        .into_workflow()
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to convert workflow: {}", e)))
}

fn load_workflow(path: &str) -> ConditionalWorkflow {
    load_builder(path).build()
}

fn run_validate(workflow_path: &str, strict: bool) {
    let workflow = load_workflow(workflow_path);
    let validator = if strict {
        Validator::strict()
    } else {
        Validator::default()
    };

    let start = Instant::now();
    let result = validator.validate(&workflow);
    let duration = start.elapsed();

    println!(
        "Workflow '{}' ({} steps, status {})",
        workflow.name,
        workflow.steps.len(),
        workflow.status
    );
    if result.is_valid {
        println!("  -> Valid ({:?})", duration);
        return;
    }
    for error in &result.errors {
        println!("  -> {}", error);
    }
    std::process::exit(2);
}

fn run_path(
    workflow_path: &str,
    context_path: Option<&str>,
    input: Option<String>,
    vars: Vec<(String, String)>,
) {
    let workflow = load_workflow(workflow_path);

    let mut context = match context_path {
        Some(path) => ExecutionContext::from_file(path)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to load context: {}", e))),
        None => ExecutionContext::for_workflow(&workflow),
    };
    if let Some(input) = input {
        context.user_input = input;
    }
    for (key, value) in vars {
        context.variables.insert(key, value.into());
    }

    let trace = ExecutionPathBuilder::new(&workflow).trace(&context);
    println!("{}", PathFormatter::format_trace(&trace));
    for visit in &trace.visits {
        println!("  {} ({})", visit.step_id, visit.step_type);
    }
}

fn run_export(workflow_path: &str, create_request: bool, update_request: bool) {
    let builder = load_builder(workflow_path);
    let json = if create_request {
        serde_json::to_string_pretty(&builder.build_create_request()).map_err(WorkflowError::from)
    } else if update_request {
        serde_json::to_string_pretty(&builder.build_update_request()).map_err(WorkflowError::from)
    } else {
        builder.build_json()
    };
    match json {
        Ok(json) => println!("{}", json),
        Err(e) => exit_with_error(&format!("Failed to serialize workflow: {}", e)),
    }
}

fn parse_key_value(raw: &str) -> std::result::Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got '{}'", raw))
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
