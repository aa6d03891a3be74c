// src/workflow/state_machine.rs

//! Workflow lifecycle transitions.
//!
//! `Pending -> Running -> {Completed | Failed | Cancelled}`. Terminal
//! workflows never transition again; events that arrive afterwards are
//! logged and ignored.
//!
//! Everything here is synchronous and does no IO. The caller holds the
//! workflow's lock and dispatches the returned tasks after releasing it.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::errors::{FlowError, Result};
use crate::optimizer::eligibility::Eligibility;
use crate::optimizer::{DispatchedTask, Task, TaskName};
use crate::types::{TaskState, WorkflowState};
use crate::workflow::model::Workflow;
use crate::workflow::step::WorkflowStep;

impl Workflow {
    /// `Pending -> Running`. Returns the initial dispatch set.
    ///
    /// A workflow without tasks completes immediately.
    pub fn start(&mut self, now: DateTime<Utc>) -> Result<WorkflowStep> {
        if self.state != WorkflowState::Pending {
            return Err(FlowError::NotRunning {
                id: self.id.to_string(),
                state: self.state,
            });
        }

        self.state = WorkflowState::Running;
        self.started_at = Some(now);
        info!(workflow = %self.id, tasks = self.tasks.len(), "workflow started");

        if self.tasks.is_empty() {
            self.finish_completed(now);
            return Ok(WorkflowStep {
                newly_dispatched: Vec::new(),
                newly_failed: Vec::new(),
                state: self.state,
                just_finished: true,
            });
        }

        let newly_dispatched = self.collect_new_ready_tasks();
        Ok(WorkflowStep {
            newly_dispatched,
            newly_failed: Vec::new(),
            state: self.state,
            just_finished: false,
        })
    }

    /// Mark a running task `Completed` and dispatch whatever it unblocked.
    pub fn complete_task(&mut self, task: &str, now: DateTime<Utc>) -> Result<WorkflowStep> {
        if self.is_terminal() {
            debug!(
                workflow = %self.id,
                task = %task,
                state = %self.state,
                "completion for terminal workflow; ignoring"
            );
            return Ok(WorkflowStep::unchanged(self.state));
        }

        let id = self.id;
        let info = self.task_mut(task)?;
        if info.state != TaskState::Running {
            return Err(FlowError::InvalidTransition {
                task: task.to_string(),
                from: info.state,
                event: "completed",
            });
        }
        info.state = TaskState::Completed;
        debug!(workflow = %id, task = %task, "task completed");

        if self.all_tasks_completed() {
            self.finish_completed(now);
            return Ok(WorkflowStep {
                newly_dispatched: Vec::new(),
                newly_failed: Vec::new(),
                state: self.state,
                just_finished: true,
            });
        }

        let newly_dispatched = self.collect_new_ready_tasks();
        Ok(WorkflowStep {
            newly_dispatched,
            newly_failed: Vec::new(),
            state: self.state,
            just_finished: false,
        })
    }

    /// Mark a task `Failed` and fail the whole workflow with it.
    pub fn fail_task(&mut self, task: &str, reason: &str) -> Result<WorkflowStep> {
        if self.is_terminal() {
            debug!(
                workflow = %self.id,
                task = %task,
                state = %self.state,
                "failure for terminal workflow; ignoring"
            );
            return Ok(WorkflowStep::unchanged(self.state));
        }

        let id = self.id;
        let info = self.task_mut(task)?;
        if info.state.is_terminal() {
            return Err(FlowError::InvalidTransition {
                task: task.to_string(),
                from: info.state,
                event: "failed",
            });
        }
        info.state = TaskState::Failed;

        let error = FlowError::TaskFailed {
            task: task.to_string(),
            reason: reason.to_string(),
        };
        warn!(workflow = %id, task = %task, reason = %reason, "task failed; failing workflow");

        self.state = WorkflowState::Failed;
        self.error = Some(error.to_string());

        Ok(WorkflowStep {
            newly_dispatched: Vec::new(),
            newly_failed: vec![task.to_string()],
            state: self.state,
            just_finished: true,
        })
    }

    /// `Running -> Cancelled`. Stops future dispatch only.
    pub fn cancel(&mut self, now: DateTime<Utc>) -> Result<()> {
        match self.state {
            WorkflowState::Running => {
                self.state = WorkflowState::Cancelled;
                self.cancelled_at = Some(now);
                info!(workflow = %self.id, "workflow cancelled");
                Ok(())
            }
            WorkflowState::Pending => Err(FlowError::NotRunning {
                id: self.id.to_string(),
                state: self.state,
            }),
            state => Err(FlowError::AlreadyTerminal {
                id: self.id.to_string(),
                state,
            }),
        }
    }

    /// Return tasks that were marked `Running` for dispatch but never reached
    /// the executor to `Pending`.
    pub fn withdraw_dispatch(&mut self, tasks: &[DispatchedTask]) {
        for dispatched in tasks {
            if let Some(info) = self
                .tasks
                .iter_mut()
                .find(|t| t.name == dispatched.name && t.state == TaskState::Running)
            {
                info.state = TaskState::Pending;
            }
        }
    }

    fn task_mut(&mut self, task: &str) -> Result<&mut Task> {
        let workflow = self.id;
        self.tasks
            .iter_mut()
            .find(|t| t.name == task)
            .ok_or_else(|| FlowError::TaskNotFound {
                workflow: workflow.to_string(),
                task: task.to_string(),
            })
    }

    fn finish_completed(&mut self, now: DateTime<Utc>) {
        self.state = WorkflowState::Completed;
        self.completed_at = Some(now);
        info!(workflow = %self.id, "all tasks completed; workflow completed");
    }

    /// Collect `Pending` tasks whose dependencies are satisfied, mark them
    /// `Running`, and return them in execution order.
    fn collect_new_ready_tasks(&mut self) -> Vec<DispatchedTask> {
        // Decide first, then mutate.
        let candidates: Vec<TaskName> = {
            let eligibility = Eligibility::new(&self.tasks);
            self.tasks
                .iter()
                .filter(|t| t.state == TaskState::Pending && eligibility.deps_satisfied(t))
                .map(|t| t.name.clone())
                .collect()
        };

        let id = self.id;
        let mut ready = Vec::with_capacity(candidates.len());
        for name in candidates {
            if let Some(info) = self.tasks.iter_mut().find(|t| t.name == name) {
                debug!(workflow = %id, task = %info.name, "dependencies satisfied; marking Running");
                info.state = TaskState::Running;
                ready.push(DispatchedTask::from_task(info, id));
            }
        }
        ready
    }
}
