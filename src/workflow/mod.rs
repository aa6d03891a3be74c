// src/workflow/mod.rs

//! Workflow lifecycle management.
//!
//! - [`model`] defines the [`Workflow`] record and its id.
//! - [`state_machine`] implements the lifecycle transitions on a workflow.
//! - [`step`] is the per-event result type.
//! - [`store`] is the store capability plus an in-memory implementation.
//! - [`manager`] ties optimizer, store and executor together.

pub mod manager;
pub mod model;
pub mod state_machine;
pub mod step;
pub mod store;

pub use manager::WorkflowManager;
pub use model::{Workflow, WorkflowId};
pub use step::WorkflowStep;
pub use store::{InMemoryWorkflowStore, WorkflowHandle, WorkflowStore};
