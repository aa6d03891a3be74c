// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod optimizer;
pub mod types;
pub mod workflow;

use std::sync::Arc;

use anyhow::{Result, bail};
use chrono::Utc;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::{TaskFile, load_task_file};
use crate::engine::{Runtime, RuntimeOptions, WorkflowEvent};
use crate::exec::spawn_command_executor;
use crate::optimizer::OrderingPolicy;
use crate::types::WorkflowState;
use crate::workflow::{InMemoryWorkflowStore, WorkflowManager};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - task file loading
/// - the workflow manager with an in-memory store
/// - the command executor
/// - the runtime loop and Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let task_file = load_task_file(&args.config)?;
    let policy = OrderingPolicy::new(task_file.ordering);

    if args.dry_run {
        print_dry_run(&task_file, &policy)?;
        return Ok(());
    }

    let (rt_tx, rt_rx) = mpsc::channel::<WorkflowEvent>(64);
    let executor = spawn_command_executor(rt_tx.clone());
    let manager = Arc::new(WorkflowManager::with_policy(
        InMemoryWorkflowStore::new(),
        executor,
        policy,
    ));

    let workflow = manager.manage_workflow(task_file.tasks)?;
    info!(workflow = %workflow.id, tasks = workflow.tasks.len(), "workflow submitted");

    // Ctrl-C → graceful shutdown.
    {
        let tx = rt_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            let _ = tx.send(WorkflowEvent::ShutdownRequested).await;
        });
    }

    let runtime = Runtime::new(
        Arc::clone(&manager),
        rt_rx,
        workflow.id,
        RuntimeOptions::default(),
    );
    let state = runtime.run().await?;

    let finished = manager.get_workflow(&workflow.id)?;
    println!("workflow {} {}", finished.id, state);
    for task in &finished.tasks {
        println!("  - {} [{}]", task.name, task.state);
    }

    match state {
        WorkflowState::Completed => Ok(()),
        WorkflowState::Failed => bail!(
            "{}",
            finished
                .error
                .unwrap_or_else(|| "workflow failed".to_string())
        ),
        other => bail!("workflow stopped in state {other}"),
    }
}

/// Print the validated, optimized order without executing anything.
fn print_dry_run(task_file: &TaskFile, policy: &OrderingPolicy) -> Result<()> {
    let ordered = policy.optimize_at(task_file.tasks.clone(), Utc::now())?;

    println!("flowdag dry-run");
    println!(
        "  ordering.default_duration = {}",
        policy.config().default_duration
    );
    println!("  ordering.duration_scale = {}", policy.config().duration_scale);
    println!();

    println!("tasks ({}), in execution order:", ordered.len());
    for task in &ordered {
        println!(
            "  - {} (priority {}, score {:.3})",
            task.name,
            task.priority,
            policy.score(task)
        );
        if let Some(deadline) = task.deadline {
            println!("      deadline: {}", deadline.to_rfc3339());
        }
        if let Some(duration) = task.duration {
            println!("      duration: {duration}");
        }
        if !task.dependencies.is_empty() {
            println!("      dependencies: {:?}", task.dependencies);
        }
        if let Some(ref cmd) = task.cmd {
            println!("      cmd: {cmd}");
        }
    }

    debug!("dry-run complete (no execution)");
    Ok(())
}
