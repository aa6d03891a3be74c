// src/exec/mod.rs

//! Task execution layer.
//!
//! The core never runs tasks; it dispatches them through an [`Executor`].
//!
//! - [`backend`] provides the `Executor` trait and a channel-backed
//!   `ChannelExecutor`.
//! - [`executor_loop`] consumes that channel and spawns one runner per task.
//! - [`task_runner`] runs a task's command with `tokio::process::Command`
//!   and reports the outcome as a `WorkflowEvent`.

pub mod backend;
pub mod executor_loop;
pub mod task_runner;

pub use backend::{ChannelExecutor, Executor};
pub use executor_loop::spawn_command_executor;
