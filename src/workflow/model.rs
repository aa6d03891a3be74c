// src/workflow/model.rs

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::optimizer::{Task, available_tasks};
use crate::types::{TaskState, WorkflowState};

/// Randomly generated workflow identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct WorkflowId(Uuid);

impl WorkflowId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for WorkflowId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for WorkflowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A workflow record: the optimized task list plus lifecycle bookkeeping.
///
/// Timestamps are stamped once on the matching transition and never reset.
/// State changes go through the transition methods in
/// [`state_machine`](super::state_machine).
#[derive(Debug, Clone, Serialize)]
pub struct Workflow {
    pub id: WorkflowId,
    /// Tasks in execution order.
    pub tasks: Vec<Task>,
    pub state: WorkflowState,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
    /// Set only when the workflow fails.
    pub error: Option<String>,
}

impl Workflow {
    /// New `Pending` workflow owning `tasks` in the given order.
    pub fn new(tasks: Vec<Task>) -> Self {
        Self {
            id: WorkflowId::new(),
            tasks,
            state: WorkflowState::Pending,
            created_at: Utc::now(),
            started_at: None,
            completed_at: None,
            cancelled_at: None,
            error: None,
        }
    }

    pub fn task(&self, name: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.name == name)
    }

    pub fn task_state(&self, name: &str) -> Option<TaskState> {
        self.task(name).map(|t| t.state)
    }

    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    /// The current eligible frontier.
    pub fn available_tasks(&self) -> Vec<&Task> {
        available_tasks(&self.tasks)
    }

    pub fn all_tasks_completed(&self) -> bool {
        self.tasks.iter().all(|t| t.state == TaskState::Completed)
    }
}
