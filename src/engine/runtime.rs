// src/engine/runtime.rs

use std::fmt;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::errors::Result;
use crate::exec::Executor;
use crate::types::WorkflowState;
use crate::workflow::{WorkflowId, WorkflowManager, WorkflowStore};

use super::event_handlers::handle_event;
use super::{RuntimeOptions, WorkflowEvent};

/// Drives a workflow to completion by feeding executor events into the
/// [`WorkflowManager`].
///
/// This is only an IO shell: every semantic decision is made by the manager.
pub struct Runtime<S: WorkflowStore, E: Executor> {
    manager: Arc<WorkflowManager<S, E>>,
    event_rx: mpsc::Receiver<WorkflowEvent>,
    workflow: WorkflowId,
    options: RuntimeOptions,
}

impl<S: WorkflowStore, E: Executor> fmt::Debug for Runtime<S, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("workflow", &self.workflow)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl<S: WorkflowStore, E: Executor> Runtime<S, E> {
    pub fn new(
        manager: Arc<WorkflowManager<S, E>>,
        event_rx: mpsc::Receiver<WorkflowEvent>,
        workflow: WorkflowId,
        options: RuntimeOptions,
    ) -> Self {
        Self {
            manager,
            event_rx,
            workflow,
            options,
        }
    }

    /// Main event loop.
    ///
    /// Returns the watched workflow's state when the loop stops: after it
    /// turns terminal (with `exit_when_finished`), on shutdown, or when the
    /// event channel closes.
    pub async fn run(mut self) -> Result<WorkflowState> {
        info!(workflow = %self.workflow, "runtime started");

        if self.finished()? {
            info!(workflow = %self.workflow, "workflow already terminal; nothing to drive");
            return self.manager.get_workflow_state(&self.workflow);
        }

        loop {
            let event = match self.event_rx.recv().await {
                Some(e) => e,
                None => {
                    info!("runtime event channel closed; exiting");
                    break;
                }
            };

            debug!(?event, "runtime received event");

            let step = handle_event(&self.manager, event);

            if !step.keep_running {
                info!("shutdown requested; stopping runtime");
                break;
            }

            if step.workflow == Some(self.workflow) && self.finished()? {
                info!(workflow = %self.workflow, "watched workflow finished");
                break;
            }
        }

        let state = self.manager.get_workflow_state(&self.workflow)?;
        info!(workflow = %self.workflow, state = %state, "runtime exiting");
        Ok(state)
    }

    fn finished(&self) -> Result<bool> {
        if !self.options.exit_when_finished {
            return Ok(false);
        }
        Ok(self.manager.get_workflow_state(&self.workflow)?.is_terminal())
    }
}
