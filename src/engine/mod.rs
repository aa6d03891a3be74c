// src/engine/mod.rs

//! Async driver around the workflow manager.
//!
//! Executors report task outcomes as [`WorkflowEvent`]s on a channel. The
//! pure event handling lives in [`event_handlers`]; [`runtime`] is the
//! async loop that reads the channel and feeds events in.

use crate::optimizer::TaskName;
use crate::workflow::WorkflowId;

/// Runtime options.
#[derive(Debug, Clone, Copy)]
pub struct RuntimeOptions {
    /// Stop the loop once the watched workflow reaches a terminal state.
    pub exit_when_finished: bool,
}

impl Default for RuntimeOptions {
    fn default() -> Self {
        Self {
            exit_when_finished: true,
        }
    }
}

/// Events flowing into the runtime from executors and signal handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowEvent {
    TaskCompleted {
        workflow: WorkflowId,
        task: TaskName,
    },
    TaskFailed {
        workflow: WorkflowId,
        task: TaskName,
        reason: String,
    },
    CancelRequested {
        workflow: WorkflowId,
    },
    /// Graceful shutdown requested (e.g. Ctrl-C).
    ShutdownRequested,
}

pub mod event_handlers;
pub mod runtime;

pub use event_handlers::{EngineStep, handle_event};
pub use runtime::Runtime;
