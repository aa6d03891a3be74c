// src/optimizer/eligibility.rs

//! Dependency satisfaction over a task set's current states.

use std::collections::HashMap;

use tracing::warn;

use crate::optimizer::task_info::Task;
use crate::types::TaskState;

/// Read-only view over a task set, indexed by name.
pub struct Eligibility<'a> {
    by_name: HashMap<&'a str, &'a Task>,
}

impl<'a> Eligibility<'a> {
    pub fn new(tasks: &'a [Task]) -> Self {
        let by_name = tasks.iter().map(|t| (t.name.as_str(), t)).collect();
        Self { by_name }
    }

    /// Whether every dependency of `task` has reached `Completed`.
    ///
    /// A dependency that is not part of the set can never be satisfied.
    pub fn deps_satisfied(&self, task: &Task) -> bool {
        for dep_name in &task.dependencies {
            match self.by_name.get(dep_name.as_str()) {
                Some(dep) if dep.state == TaskState::Completed => {}
                Some(_) => return false,
                None => {
                    warn!(
                        task = %task.name,
                        dep = %dep_name,
                        "dependency missing from task set; treating as unsatisfied"
                    );
                    return false;
                }
            }
        }
        true
    }
}

/// Tasks that are not yet terminal and whose dependencies have all completed.
///
/// This is the runnable frontier: a freshly started workflow yields its
/// dependency-free tasks, and each completion can widen it. Input order is
/// preserved.
pub fn available_tasks(tasks: &[Task]) -> Vec<&Task> {
    let eligibility = Eligibility::new(tasks);
    tasks
        .iter()
        .filter(|t| !t.is_terminal() && eligibility.deps_satisfied(t))
        .collect()
}
