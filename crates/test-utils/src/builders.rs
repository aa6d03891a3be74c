#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use flowdag::optimizer::TaskSpec;

/// Builder for a task list to simplify test setup.
pub struct TaskSetBuilder {
    tasks: Vec<TaskSpec>,
}

impl TaskSetBuilder {
    pub fn new() -> Self {
        Self { tasks: Vec::new() }
    }

    /// Add a task with only the required fields.
    pub fn with_task(mut self, name: &str, priority: i64) -> Self {
        self.tasks.push(TaskSpec::new(name, priority));
        self
    }

    /// Add a fully specified task.
    pub fn with(mut self, task: TaskSpec) -> Self {
        self.tasks.push(task);
        self
    }

    pub fn build(self) -> Vec<TaskSpec> {
        self.tasks
    }
}

impl Default for TaskSetBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for a single `TaskSpec`.
pub struct TaskSpecBuilder {
    task: TaskSpec,
}

impl TaskSpecBuilder {
    pub fn new(name: &str, priority: i64) -> Self {
        Self {
            task: TaskSpec::new(name, priority),
        }
    }

    /// A spec with no name or priority, for validation tests.
    pub fn empty() -> Self {
        Self {
            task: TaskSpec::default(),
        }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.task.name = Some(name.to_string());
        self
    }

    pub fn priority(mut self, priority: i64) -> Self {
        self.task.priority = Some(priority);
        self
    }

    pub fn after(mut self, dep: &str) -> Self {
        self.task.dependencies.push(dep.to_string());
        self
    }

    pub fn deadline(mut self, deadline: DateTime<Utc>) -> Self {
        self.task.deadline = Some(deadline);
        self
    }

    pub fn duration(mut self, duration: f64) -> Self {
        self.task.duration = Some(duration);
        self
    }

    pub fn cmd(mut self, cmd: &str) -> Self {
        self.task.cmd = Some(cmd.to_string());
        self
    }

    pub fn build(self) -> TaskSpec {
        self.task
    }
}

/// Linear chain `names[0] -> names[1] -> ...`, all with priority 1.
pub fn chain(names: &[&str]) -> Vec<TaskSpec> {
    let mut builder = TaskSetBuilder::new();
    for (i, name) in names.iter().enumerate() {
        let mut task = TaskSpecBuilder::new(name, 1);
        if i > 0 {
            task = task.after(names[i - 1]);
        }
        builder = builder.with(task.build());
    }
    builder.build()
}

/// Fixed reference time so deadline tests are reproducible.
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0)
        .single()
        .expect("valid fixed timestamp")
}
