// src/optimizer/mod.rs

//! Task ordering and dependency-gated availability.
//!
//! - [`task_info`] holds the raw [`TaskSpec`] input, the validated [`Task`]
//!   and the [`DispatchedTask`] handed to executors.
//! - [`validate`] turns specs into tasks and checks the dependency graph.
//! - [`policy`] composes the staged ordering.
//! - [`eligibility`] answers which tasks may run given current states.
//!
//! Everything here is pure and safe to call from any thread.

pub mod eligibility;
pub mod policy;
pub mod task_info;
pub mod validate;

pub use eligibility::available_tasks;
pub use policy::{OrderingConfig, OrderingPolicy};
pub use task_info::{DispatchedTask, Task, TaskName, TaskSpec};
pub use validate::validate_tasks;

use crate::errors::Result;

/// Order `tasks` with the default policy.
pub fn optimize(tasks: Vec<TaskSpec>) -> Result<Vec<Task>> {
    OrderingPolicy::default().optimize(tasks)
}
