// src/exec/executor_loop.rs

//! Background loop that turns dispatches into task processes.

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::engine::WorkflowEvent;
use crate::exec::backend::ChannelExecutor;
use crate::exec::task_runner::run_task;
use crate::optimizer::DispatchedTask;

/// Spawn the background command executor loop.
///
/// Returns the [`ChannelExecutor`] the workflow manager should dispatch
/// through. Each dispatched task runs in its own Tokio task and reports
/// back on `events_tx`. Running processes are never interrupted: cancelling
/// a workflow only stops further dispatch.
pub fn spawn_command_executor(events_tx: mpsc::Sender<WorkflowEvent>) -> ChannelExecutor {
    let (tx, mut rx) = mpsc::unbounded_channel::<DispatchedTask>();

    tokio::spawn(async move {
        info!("executor loop started");

        while let Some(task) = rx.recv().await {
            debug!(workflow = %task.workflow_id, task = %task.name, "received dispatch");
            let events_tx = events_tx.clone();
            tokio::spawn(run_task(task, events_tx));
        }

        info!("executor loop finished (channel closed)");
    });

    ChannelExecutor::new(tx)
}
