// src/optimizer/validate.rs

use std::collections::{BTreeSet, HashSet};

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;

use crate::errors::{FlowError, Result};
use crate::optimizer::task_info::{Task, TaskSpec};
use crate::types::TaskState;

impl TryFrom<TaskSpec> for Task {
    type Error = FlowError;

    fn try_from(spec: TaskSpec) -> std::result::Result<Self, Self::Error> {
        let name = match spec.name {
            Some(name) if !name.trim().is_empty() => name,
            Some(_) => {
                return Err(FlowError::InvalidTask(
                    "task name must not be empty".to_string(),
                ));
            }
            None => {
                return Err(FlowError::InvalidTask(
                    "task is missing required field `name`".to_string(),
                ));
            }
        };

        let priority = spec.priority.ok_or_else(|| {
            FlowError::InvalidTask(format!(
                "task '{}' is missing required field `priority`",
                name
            ))
        })?;

        if let Some(duration) = spec.duration {
            if !duration.is_finite() || duration < 0.0 {
                return Err(FlowError::InvalidTask(format!(
                    "task '{}' has invalid duration {} (expected a finite value >= 0)",
                    name, duration
                )));
            }
        }

        Ok(Task {
            name,
            priority,
            deadline: spec.deadline,
            duration: spec.duration,
            dependencies: spec.dependencies.into_iter().collect::<BTreeSet<_>>(),
            cmd: spec.cmd,
            state: TaskState::Pending,
        })
    }
}

/// Validate raw task specs into tasks, preserving input order.
///
/// Rejects missing or malformed fields, duplicate names, dependencies on
/// tasks outside the set, self-dependencies and dependency cycles.
pub fn validate_tasks(specs: Vec<TaskSpec>) -> Result<Vec<Task>> {
    let tasks = specs
        .into_iter()
        .map(Task::try_from)
        .collect::<Result<Vec<_>>>()?;

    ensure_unique_names(&tasks)?;
    validate_task_dependencies(&tasks)?;
    validate_dag(&tasks)?;
    Ok(tasks)
}

fn ensure_unique_names(tasks: &[Task]) -> Result<()> {
    let mut seen: HashSet<&str> = HashSet::new();
    for task in tasks {
        if !seen.insert(task.name.as_str()) {
            return Err(FlowError::InvalidTask(format!(
                "duplicate task name '{}'",
                task.name
            )));
        }
    }
    Ok(())
}

fn validate_task_dependencies(tasks: &[Task]) -> Result<()> {
    let names: HashSet<&str> = tasks.iter().map(|t| t.name.as_str()).collect();

    for task in tasks {
        for dep in task.dependencies.iter() {
            if dep == &task.name {
                return Err(FlowError::InvalidTask(format!(
                    "task '{}' cannot depend on itself",
                    task.name
                )));
            }
            if !names.contains(dep.as_str()) {
                return Err(FlowError::InvalidTask(format!(
                    "task '{}' has unknown dependency '{}'",
                    task.name, dep
                )));
            }
        }
    }
    Ok(())
}

fn validate_dag(tasks: &[Task]) -> Result<()> {
    // Edge direction: dep -> task.
    let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();

    for task in tasks {
        graph.add_node(task.name.as_str());
    }

    for task in tasks {
        for dep in task.dependencies.iter() {
            graph.add_edge(dep.as_str(), task.name.as_str(), ());
        }
    }

    match toposort(&graph, None) {
        Ok(_order) => Ok(()),
        Err(cycle) => Err(FlowError::DependencyCycle(format!(
            "cycle detected in task dependencies involving task '{}'",
            cycle.node_id()
        ))),
    }
}
