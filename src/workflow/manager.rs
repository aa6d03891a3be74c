// src/workflow/manager.rs

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::errors::{FlowError, Result};
use crate::exec::Executor;
use crate::optimizer::{DispatchedTask, OrderingPolicy, TaskName, TaskSpec};
use crate::types::WorkflowState;
use crate::workflow::model::{Workflow, WorkflowId};
use crate::workflow::step::WorkflowStep;
use crate::workflow::store::{WorkflowHandle, WorkflowStore, lock_workflow};

/// Owns workflow lifecycles.
///
/// The store and executor are injected collaborators. All mutation happens
/// under the target workflow's own lock; dispatch to the executor happens
/// after that lock is released.
#[derive(Debug)]
pub struct WorkflowManager<S: WorkflowStore, E: Executor> {
    store: S,
    executor: E,
    policy: OrderingPolicy,
}

impl<S: WorkflowStore, E: Executor> WorkflowManager<S, E> {
    pub fn new(store: S, executor: E) -> Self {
        Self::with_policy(store, executor, OrderingPolicy::default())
    }

    pub fn with_policy(store: S, executor: E, policy: OrderingPolicy) -> Self {
        Self {
            store,
            executor,
            policy,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Create, optimize, start and store a workflow, then dispatch its
    /// initially eligible tasks.
    ///
    /// Returns a snapshot of the workflow taken after the initial dispatch.
    /// An empty task list yields a workflow that is already `Completed`.
    pub fn manage_workflow(&self, tasks: Vec<TaskSpec>) -> Result<Workflow> {
        let mut workflow = Workflow::new(Vec::new());
        let id = workflow.id;
        debug!(workflow = %id, tasks = tasks.len(), "creating workflow");

        workflow.tasks = self.policy.optimize(tasks).map_err(|err| {
            warn!(workflow = %id, error = %err, "task optimization failed");
            FlowError::OptimizationFailed(err.to_string())
        })?;

        let step = workflow
            .start(Utc::now())
            .map_err(|err| FlowError::InitializationFailed(err.to_string()))?;

        let handle = self
            .store
            .insert(workflow)
            .map_err(|err| FlowError::InitializationFailed(err.to_string()))?;

        if let DispatchOutcome::Failed(failure) = self.dispatch(&handle, &step.newly_dispatched)? {
            return Err(FlowError::InitializationFailed(format!(
                "workflow {id}: {}",
                failure.error.unwrap_or_else(|| "initial dispatch failed".to_string())
            )));
        }

        let snapshot = lock_workflow(&handle)?.clone();
        info!(
            workflow = %id,
            state = %snapshot.state,
            dispatched = step.newly_dispatched.len(),
            "workflow initialised"
        );
        Ok(snapshot)
    }

    /// Current state of a stored workflow.
    pub fn get_workflow_state(&self, id: &WorkflowId) -> Result<WorkflowState> {
        let handle = self.store.get(id)?;
        let state = lock_workflow(&handle)?.state;
        Ok(state)
    }

    /// Full snapshot of a stored workflow.
    pub fn get_workflow(&self, id: &WorkflowId) -> Result<Workflow> {
        let handle = self.store.get(id)?;
        let workflow = lock_workflow(&handle)?.clone();
        Ok(workflow)
    }

    /// Names of the tasks currently in the eligible frontier.
    pub fn available_tasks(&self, id: &WorkflowId) -> Result<Vec<TaskName>> {
        let handle = self.store.get(id)?;
        let workflow = lock_workflow(&handle)?;
        Ok(workflow
            .available_tasks()
            .into_iter()
            .map(|t| t.name.clone())
            .collect())
    }

    /// Cancel a running workflow.
    ///
    /// Terminal workflows yield [`FlowError::AlreadyTerminal`]. Tasks that
    /// were already handed to the executor keep running and their outcomes
    /// are ignored; tasks selected but not yet handed over are withheld.
    pub fn cancel_workflow(&self, id: &WorkflowId) -> Result<()> {
        let handle = self.store.get(id)?;
        let mut workflow = lock_workflow(&handle)?;
        workflow.cancel(Utc::now())
    }

    /// Record a successful task and dispatch whatever it unblocked.
    pub fn on_task_completed(&self, id: &WorkflowId, task: &str) -> Result<WorkflowStep> {
        let handle = self.store.get(id)?;
        let step = {
            let mut workflow = lock_workflow(&handle)?;
            workflow.complete_task(task, Utc::now())?
        };

        match self.dispatch(&handle, &step.newly_dispatched)? {
            DispatchOutcome::Sent => Ok(step),
            DispatchOutcome::Halted { sent, state } => {
                let mut step = step;
                step.newly_dispatched.truncate(sent);
                step.state = state;
                Ok(step)
            }
            DispatchOutcome::Failed(failure) => Ok(merge_steps(step, failure)),
        }
    }

    /// Record a failed task; the workflow fails with it.
    pub fn on_task_failed(&self, id: &WorkflowId, task: &str, reason: &str) -> Result<WorkflowStep> {
        let handle = self.store.get(id)?;
        let mut workflow = lock_workflow(&handle)?;
        workflow.fail_task(task, reason)
    }

    /// Hand `tasks` to the executor.
    ///
    /// The workflow is re-checked under its lock before every handoff: once it
    /// is terminal (e.g. cancelled while the lock was released) the remaining
    /// tasks are withdrawn back to `Pending` and never sent. A cancel that
    /// lands during a single `Executor::dispatch` call cannot recall that one
    /// task. The first dispatch error fails that task, and with it the
    /// workflow; remaining tasks are withdrawn.
    fn dispatch(&self, handle: &WorkflowHandle, tasks: &[DispatchedTask]) -> Result<DispatchOutcome> {
        for (sent, task) in tasks.iter().enumerate() {
            {
                let mut workflow = lock_workflow(handle)?;
                if workflow.is_terminal() {
                    debug!(
                        workflow = %task.workflow_id,
                        state = %workflow.state,
                        withheld = tasks.len() - sent,
                        "workflow finished before dispatch; withholding tasks"
                    );
                    workflow.withdraw_dispatch(&tasks[sent..]);
                    return Ok(DispatchOutcome::Halted {
                        sent,
                        state: workflow.state,
                    });
                }
            }

            debug!(workflow = %task.workflow_id, task = %task.name, "dispatching task");
            if let Err(err) = self.executor.dispatch(task.clone()) {
                warn!(
                    workflow = %task.workflow_id,
                    task = %task.name,
                    error = %err,
                    "dispatch failed"
                );
                let reason = format!("dispatch failed: {err}");
                let mut workflow = lock_workflow(handle)?;
                let step = workflow.fail_task(&task.name, &reason)?;
                workflow.withdraw_dispatch(&tasks[sent + 1..]);
                return Ok(DispatchOutcome::Failed(FailedDispatch {
                    step,
                    sent,
                    error: workflow.error.clone(),
                }));
            }
        }
        Ok(DispatchOutcome::Sent)
    }
}

enum DispatchOutcome {
    Sent,
    /// The workflow turned terminal after `sent` tasks had been handed over.
    Halted { sent: usize, state: WorkflowState },
    Failed(FailedDispatch),
}

struct FailedDispatch {
    step: WorkflowStep,
    /// How many tasks reached the executor before the failure.
    sent: usize,
    error: Option<String>,
}

fn merge_steps(mut step: WorkflowStep, failure: FailedDispatch) -> WorkflowStep {
    step.newly_dispatched.truncate(failure.sent);
    step.newly_failed.extend(failure.step.newly_failed);
    step.state = failure.step.state;
    step.just_finished = step.just_finished || failure.step.just_finished;
    step
}
