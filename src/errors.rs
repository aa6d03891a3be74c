// src/errors.rs

//! Crate-wide error type and result alias.

use thiserror::Error;

use crate::types::{TaskState, WorkflowState};

#[derive(Error, Debug)]
pub enum FlowError {
    /// The top-level argument is not a task sequence.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A task is missing a required field or carries a malformed one.
    #[error("Invalid task: {0}")]
    InvalidTask(String),

    #[error("Dependency cycle: {0}")]
    DependencyCycle(String),

    /// The ordering stage rejected the task set; wraps the optimizer's reason.
    #[error("Optimization failed: {0}")]
    OptimizationFailed(String),

    #[error("Workflow initialization failed: {0}")]
    InitializationFailed(String),

    #[error("Workflow not found: {0}")]
    NotFound(String),

    #[error("Task not found in workflow {workflow}: {task}")]
    TaskNotFound { workflow: String, task: String },

    #[error("task {task} failed: {reason}")]
    TaskFailed { task: String, reason: String },

    #[error("Workflow {id} is already terminal ({state})")]
    AlreadyTerminal { id: String, state: WorkflowState },

    #[error("Workflow {id} is not running ({state})")]
    NotRunning { id: String, state: WorkflowState },

    #[error("Task {task} cannot be {event} from state {from}")]
    InvalidTransition {
        task: String,
        from: TaskState,
        event: &'static str,
    },

    #[error("Workflow already stored: {0}")]
    DuplicateWorkflow(String),

    #[error("Workflow lock poisoned")]
    LockPoisoned,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, FlowError>;
