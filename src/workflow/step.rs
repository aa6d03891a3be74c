// src/workflow/step.rs

//! Result type for a single workflow transition.

use crate::optimizer::{DispatchedTask, TaskName};
use crate::types::WorkflowState;

/// Structured result of applying one event to a workflow.
///
/// Tests use it to step a workflow by hand and assert on what changed.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowStep {
    /// Tasks that became eligible and were marked `Running` by this step.
    pub newly_dispatched: Vec<DispatchedTask>,
    /// Tasks newly marked `Failed` by this step.
    pub newly_failed: Vec<TaskName>,
    /// Workflow state after the step.
    pub state: WorkflowState,
    /// Whether this step moved the workflow into a terminal state.
    pub just_finished: bool,
}

impl WorkflowStep {
    /// A step that changed nothing.
    pub fn unchanged(state: WorkflowState) -> Self {
        Self {
            newly_dispatched: Vec::new(),
            newly_failed: Vec::new(),
            state,
            just_finished: false,
        }
    }
}
