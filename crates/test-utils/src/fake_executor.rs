use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use anyhow::anyhow;
use tokio::sync::mpsc;
use flowdag::engine::WorkflowEvent;
use flowdag::errors::Result;
use flowdag::exec::Executor;
use flowdag::optimizer::DispatchedTask;

/// A fake executor that only records which tasks were dispatched.
///
/// Tasks listed via [`reject`](Self::reject) make `dispatch` return an
/// error, simulating an unreachable executor.
#[derive(Debug, Default)]
pub struct RecordingExecutor {
    dispatched: Mutex<Vec<DispatchedTask>>,
    rejected: Mutex<HashSet<String>>,
}

impl RecordingExecutor {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reject(&self, task: &str) {
        self.rejected.lock().unwrap().insert(task.to_string());
    }

    pub fn dispatched(&self) -> Vec<DispatchedTask> {
        self.dispatched.lock().unwrap().clone()
    }

    pub fn names(&self) -> Vec<String> {
        self.dispatched
            .lock()
            .unwrap()
            .iter()
            .map(|t| t.name.clone())
            .collect()
    }
}

impl Executor for RecordingExecutor {
    fn dispatch(&self, task: DispatchedTask) -> Result<()> {
        if self.rejected.lock().unwrap().contains(&task.name) {
            return Err(anyhow!("executor refused task '{}'", task.name).into());
        }
        self.dispatched.lock().unwrap().push(task);
        Ok(())
    }
}

/// A fake executor that:
/// - records which tasks were "run"
/// - immediately reports an outcome on the runtime channel: `TaskFailed`
///   for names in `failing`, `TaskCompleted` otherwise.
pub struct FakeExecutor {
    runtime_tx: mpsc::Sender<WorkflowEvent>,
    executed: Arc<Mutex<Vec<String>>>,
    failing: HashSet<String>,
}

impl FakeExecutor {
    pub fn new(runtime_tx: mpsc::Sender<WorkflowEvent>, executed: Arc<Mutex<Vec<String>>>) -> Self {
        Self {
            runtime_tx,
            executed,
            failing: HashSet::new(),
        }
    }

    pub fn failing(mut self, task: &str) -> Self {
        self.failing.insert(task.to_string());
        self
    }
}

impl Executor for FakeExecutor {
    fn dispatch(&self, task: DispatchedTask) -> Result<()> {
        {
            let mut guard = self.executed.lock().unwrap();
            guard.push(task.name.clone());
        }

        let event = if self.failing.contains(&task.name) {
            WorkflowEvent::TaskFailed {
                workflow: task.workflow_id,
                task: task.name.clone(),
                reason: "simulated failure".to_string(),
            }
        } else {
            WorkflowEvent::TaskCompleted {
                workflow: task.workflow_id,
                task: task.name.clone(),
            }
        };

        self.runtime_tx
            .try_send(event)
            .map_err(|e| anyhow!("runtime channel unavailable: {e}"))?;
        Ok(())
    }
}
