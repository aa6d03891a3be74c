// src/exec/backend.rs

//! Pluggable executor abstraction.
//!
//! The workflow manager hands eligible tasks to an `Executor` instead of
//! running anything itself. Dispatch is fire-and-forget: the executor
//! reports outcomes later through the manager's event callbacks (or, in the
//! CLI, through [`WorkflowEvent`](crate::engine::WorkflowEvent)s on the
//! engine channel).
//!
//! - `ChannelExecutor` forwards dispatches over an mpsc channel; the command
//!   executor loop in [`executor_loop`](super::executor_loop) consumes them.
//! - Tests provide their own `Executor` that records dispatches.

use std::sync::Arc;

use anyhow::anyhow;
use tokio::sync::mpsc;

use crate::errors::Result;
use crate::optimizer::DispatchedTask;

/// Trait abstracting how dispatched tasks are executed.
///
/// Implementations must not block waiting for the task to finish. The
/// manager never holds a workflow lock while calling `dispatch`, so an
/// implementation may report outcomes synchronously.
pub trait Executor: Send + Sync {
    fn dispatch(&self, task: DispatchedTask) -> Result<()>;
}

impl<E: Executor + ?Sized> Executor for Arc<E> {
    fn dispatch(&self, task: DispatchedTask) -> Result<()> {
        (**self).dispatch(task)
    }
}

/// Executor that forwards every dispatch over an unbounded channel.
#[derive(Debug, Clone)]
pub struct ChannelExecutor {
    tx: mpsc::UnboundedSender<DispatchedTask>,
}

impl ChannelExecutor {
    pub fn new(tx: mpsc::UnboundedSender<DispatchedTask>) -> Self {
        Self { tx }
    }
}

impl Executor for ChannelExecutor {
    fn dispatch(&self, task: DispatchedTask) -> Result<()> {
        self.tx
            .send(task)
            .map_err(|err| anyhow!("executor channel closed; dropped task '{}'", err.0.name))?;
        Ok(())
    }
}
