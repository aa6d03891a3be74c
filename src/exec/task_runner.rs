// src/exec/task_runner.rs

//! Individual task process runner.

use std::process::Stdio;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::engine::WorkflowEvent;
use crate::optimizer::DispatchedTask;

/// How a task process ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessOutcome {
    Success,
    Failed(String),
}

/// Run a single dispatched task and report its outcome as a
/// [`WorkflowEvent`].
///
/// A task without a command has nothing to execute and completes at once.
/// Errors spawning or waiting on the process are reported as task failures.
pub async fn run_task(task: DispatchedTask, events_tx: mpsc::Sender<WorkflowEvent>) {
    let outcome = match run_task_inner(&task).await {
        Ok(outcome) => outcome,
        Err(err) => {
            error!(
                workflow = %task.workflow_id,
                task = %task.name,
                error = %err,
                "task execution error"
            );
            ProcessOutcome::Failed(format!("{err:#}"))
        }
    };

    let event = match outcome {
        ProcessOutcome::Success => WorkflowEvent::TaskCompleted {
            workflow: task.workflow_id,
            task: task.name.clone(),
        },
        ProcessOutcome::Failed(reason) => WorkflowEvent::TaskFailed {
            workflow: task.workflow_id,
            task: task.name.clone(),
            reason,
        },
    };

    if events_tx.send(event).await.is_err() {
        debug!(
            task = %task.name,
            "runtime event channel closed before task outcome could be reported"
        );
    }
}

async fn run_task_inner(task: &DispatchedTask) -> Result<ProcessOutcome> {
    let Some(cmd_line) = task.cmd.as_deref() else {
        debug!(workflow = %task.workflow_id, task = %task.name, "no command; completing immediately");
        return Ok(ProcessOutcome::Success);
    };

    info!(
        workflow = %task.workflow_id,
        task = %task.name,
        cmd = %cmd_line,
        "starting task process"
    );

    let mut cmd = if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(cmd_line);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(cmd_line);
        c
    };

    cmd.stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = cmd
        .spawn()
        .with_context(|| format!("spawning process for task '{}'", task.name))?;

    // Always consume both pipes so buffers don't fill.
    if let Some(stdout) = child.stdout.take() {
        let task_name = task.name.clone();
        tokio::spawn(async move {
            let mut lines = BufReader::new(stdout).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                info!(task = %task_name, "stdout: {}", line);
            }
        });
    }
    if let Some(stderr) = child.stderr.take() {
        let task_name = task.name.clone();
        tokio::spawn(async move {
            let mut lines = BufReader::new(stderr).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                debug!(task = %task_name, "stderr: {}", line);
            }
        });
    }

    let status = child
        .wait()
        .await
        .with_context(|| format!("waiting for process of task '{}'", task.name))?;

    let code = status.code().unwrap_or(-1);
    info!(
        workflow = %task.workflow_id,
        task = %task.name,
        exit_code = code,
        success = status.success(),
        "task process exited"
    );

    if status.success() {
        Ok(ProcessOutcome::Success)
    } else {
        Ok(ProcessOutcome::Failed(format!("exit code {code}")))
    }
}
