// src/workflow/store.rs

//! Workflow store capability.
//!
//! The manager talks to a `WorkflowStore` instead of owning a table
//! directly, so tests and embedders can substitute their own backend. Each
//! stored workflow sits behind its own mutex: events for one workflow are
//! serialized while different workflows proceed independently.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, RwLock};

use crate::errors::{FlowError, Result};
use crate::workflow::model::{Workflow, WorkflowId};

/// Exclusive-access cell for one workflow.
pub type WorkflowHandle = Arc<Mutex<Workflow>>;

pub trait WorkflowStore: Send + Sync {
    /// Store a new workflow and return its handle.
    ///
    /// Fails with [`FlowError::DuplicateWorkflow`] if the id is taken.
    fn insert(&self, workflow: Workflow) -> Result<WorkflowHandle>;

    /// Look up a workflow by id; [`FlowError::NotFound`] if unknown.
    fn get(&self, id: &WorkflowId) -> Result<WorkflowHandle>;

    fn ids(&self) -> Result<Vec<WorkflowId>>;
}

/// Lock a workflow handle, mapping poisoning to [`FlowError::LockPoisoned`].
pub fn lock_workflow(handle: &WorkflowHandle) -> Result<MutexGuard<'_, Workflow>> {
    handle.lock().map_err(|_| FlowError::LockPoisoned)
}

/// Thread-safe in-memory store. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct InMemoryWorkflowStore {
    workflows: RwLock<HashMap<WorkflowId, WorkflowHandle>>,
}

impl InMemoryWorkflowStore {
    pub fn new() -> Self {
        Self {
            workflows: RwLock::new(HashMap::new()),
        }
    }
}

impl WorkflowStore for InMemoryWorkflowStore {
    fn insert(&self, workflow: Workflow) -> Result<WorkflowHandle> {
        let mut workflows = self
            .workflows
            .write()
            .map_err(|_| FlowError::LockPoisoned)?;
        if workflows.contains_key(&workflow.id) {
            return Err(FlowError::DuplicateWorkflow(workflow.id.to_string()));
        }
        let id = workflow.id;
        let handle = Arc::new(Mutex::new(workflow));
        workflows.insert(id, Arc::clone(&handle));
        Ok(handle)
    }

    fn get(&self, id: &WorkflowId) -> Result<WorkflowHandle> {
        let workflows = self.workflows.read().map_err(|_| FlowError::LockPoisoned)?;
        workflows
            .get(id)
            .cloned()
            .ok_or_else(|| FlowError::NotFound(id.to_string()))
    }

    fn ids(&self) -> Result<Vec<WorkflowId>> {
        let workflows = self.workflows.read().map_err(|_| FlowError::LockPoisoned)?;
        let mut ids: Vec<_> = workflows.keys().copied().collect();
        ids.sort();
        Ok(ids)
    }
}

impl<S: WorkflowStore + ?Sized> WorkflowStore for Arc<S> {
    fn insert(&self, workflow: Workflow) -> Result<WorkflowHandle> {
        (**self).insert(workflow)
    }

    fn get(&self, id: &WorkflowId) -> Result<WorkflowHandle> {
        (**self).get(id)
    }

    fn ids(&self) -> Result<Vec<WorkflowId>> {
        (**self).ids()
    }
}
