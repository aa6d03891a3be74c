// src/optimizer/task_info.rs

//! Task input shape, validated task records and dispatch descriptors.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::TaskState;
use crate::workflow::WorkflowId;

/// Canonical task name type used throughout the crate.
pub type TaskName = String;

/// Raw task description as submitted by a caller or read from a task file.
///
/// Every field is optional here so that a missing `name` or `priority` can be
/// reported as [`FlowError::InvalidTask`](crate::errors::FlowError::InvalidTask)
/// instead of failing deserialization of the whole document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TaskSpec {
    #[serde(default)]
    pub name: Option<String>,

    /// Lower value means higher scheduling priority.
    #[serde(default)]
    pub priority: Option<i64>,

    /// Absolute deadline (RFC 3339 in task files).
    #[serde(default)]
    pub deadline: Option<DateTime<Utc>>,

    /// Estimated run length.
    #[serde(default)]
    pub duration: Option<f64>,

    /// Names of tasks that must complete before this one is eligible.
    #[serde(default, alias = "after")]
    pub dependencies: Vec<String>,

    /// Opaque payload forwarded to the executor (a shell command for the CLI).
    #[serde(default)]
    pub cmd: Option<String>,
}

impl TaskSpec {
    pub fn new(name: impl Into<String>, priority: i64) -> Self {
        Self {
            name: Some(name.into()),
            priority: Some(priority),
            ..Self::default()
        }
    }

    pub fn with_deadline(mut self, deadline: DateTime<Utc>) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_duration(mut self, duration: f64) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn after(mut self, dep: impl Into<String>) -> Self {
        self.dependencies.push(dep.into());
        self
    }

    pub fn with_cmd(mut self, cmd: impl Into<String>) -> Self {
        self.cmd = Some(cmd.into());
        self
    }
}

/// A validated task owned by a workflow.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Task {
    pub name: TaskName,
    pub priority: i64,
    pub deadline: Option<DateTime<Utc>>,
    pub duration: Option<f64>,
    pub dependencies: BTreeSet<TaskName>,
    pub cmd: Option<String>,
    /// Mutated only by the workflow state machine.
    pub state: TaskState,
}

impl Task {
    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }
}

/// Description of a task that the manager wants the executor to run now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchedTask {
    pub workflow_id: WorkflowId,
    pub name: TaskName,
    pub priority: i64,
    pub cmd: Option<String>,
}

impl DispatchedTask {
    pub fn from_task(task: &Task, workflow_id: WorkflowId) -> Self {
        Self {
            workflow_id,
            name: task.name.clone(),
            priority: task.priority,
            cmd: task.cmd.clone(),
        }
    }
}
