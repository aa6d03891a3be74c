// src/engine/event_handlers.rs

//! Applying a single [`WorkflowEvent`] to the manager.

use tracing::{debug, warn};

use crate::engine::WorkflowEvent;
use crate::errors::Result;
use crate::exec::Executor;
use crate::types::WorkflowState;
use crate::workflow::{WorkflowId, WorkflowManager, WorkflowStore};

/// What the runtime loop should know after one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineStep {
    /// Workflow the event referred to, if any.
    pub workflow: Option<WorkflowId>,
    /// Its state after the event, or `None` if the event was rejected.
    pub state: Option<WorkflowState>,
    /// Whether the loop should keep reading events.
    pub keep_running: bool,
}

/// Apply one event. Rejected events are logged, never fatal.
pub fn handle_event<S, E>(manager: &WorkflowManager<S, E>, event: WorkflowEvent) -> EngineStep
where
    S: WorkflowStore,
    E: Executor,
{
    match event {
        WorkflowEvent::TaskCompleted { workflow, task } => {
            let result = manager
                .on_task_completed(&workflow, &task)
                .map(|step| step.state);
            settle(workflow, result)
        }
        WorkflowEvent::TaskFailed {
            workflow,
            task,
            reason,
        } => {
            let result = manager
                .on_task_failed(&workflow, &task, &reason)
                .map(|step| step.state);
            settle(workflow, result)
        }
        WorkflowEvent::CancelRequested { workflow } => {
            let result = manager
                .cancel_workflow(&workflow)
                .and_then(|()| manager.get_workflow_state(&workflow));
            settle(workflow, result)
        }
        WorkflowEvent::ShutdownRequested => EngineStep {
            workflow: None,
            state: None,
            keep_running: false,
        },
    }
}

fn settle(workflow: WorkflowId, result: Result<WorkflowState>) -> EngineStep {
    let state = match result {
        Ok(state) => {
            debug!(workflow = %workflow, state = %state, "event applied");
            Some(state)
        }
        Err(err) => {
            warn!(workflow = %workflow, error = %err, "event rejected");
            None
        }
    };

    EngineStep {
        workflow: Some(workflow),
        state,
        keep_running: true,
    }
}
