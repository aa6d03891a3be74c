// src/optimizer/policy.rs

//! The composed ordering policy.
//!
//! Each stage is a stable sort (or partition) that refines the order left by
//! the previous one:
//!
//! 1. priority, ascending
//! 2. `(priority, deadline urgency)`, tasks without a deadline last
//! 3. eligible tasks before tasks blocked on an incomplete dependency
//! 4. `(priority, effective duration)` within each partition, shortest first

use std::cmp::Ordering;

use chrono::{DateTime, TimeDelta, Utc};
use serde::Deserialize;
use tracing::debug;

use crate::errors::{FlowError, Result};
use crate::optimizer::eligibility::Eligibility;
use crate::optimizer::task_info::{Task, TaskSpec};
use crate::optimizer::validate::validate_tasks;

/// Tunables for the duration tie-break, read from `[ordering]`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OrderingConfig {
    /// Duration assumed for tasks that do not declare one.
    #[serde(default = "default_duration")]
    pub default_duration: f64,

    /// Divisor applied to the duration in the composite score.
    #[serde(default = "default_duration_scale")]
    pub duration_scale: f64,
}

fn default_duration() -> f64 {
    100.0
}

fn default_duration_scale() -> f64 {
    1000.0
}

impl Default for OrderingConfig {
    fn default() -> Self {
        Self {
            default_duration: default_duration(),
            duration_scale: default_duration_scale(),
        }
    }
}

impl OrderingConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.default_duration.is_finite() || self.default_duration < 0.0 {
            return Err(FlowError::InvalidInput(format!(
                "[ordering].default_duration must be a finite value >= 0 (got {})",
                self.default_duration
            )));
        }
        if !self.duration_scale.is_finite() || self.duration_scale <= 0.0 {
            return Err(FlowError::InvalidInput(format!(
                "[ordering].duration_scale must be a finite value > 0 (got {})",
                self.duration_scale
            )));
        }
        Ok(())
    }
}

/// Produces a deterministic execution order for a task set.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrderingPolicy {
    config: OrderingConfig,
}

impl OrderingPolicy {
    pub fn new(config: OrderingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &OrderingConfig {
        &self.config
    }

    /// Validate `specs` and order them, measuring deadline urgency from now.
    pub fn optimize(&self, specs: Vec<TaskSpec>) -> Result<Vec<Task>> {
        self.optimize_at(specs, Utc::now())
    }

    /// Same as [`optimize`](Self::optimize) with an explicit reference time.
    pub fn optimize_at(&self, specs: Vec<TaskSpec>, now: DateTime<Utc>) -> Result<Vec<Task>> {
        let tasks = validate_tasks(specs)?;
        Ok(self.order(tasks, now))
    }

    /// Reorder already-validated tasks. Never adds or drops a task.
    pub fn order(&self, mut tasks: Vec<Task>, now: DateTime<Utc>) -> Vec<Task> {
        sort_by_priority(&mut tasks);
        adjust_for_deadlines(&mut tasks, now);

        let (mut eligible, mut blocked) = partition_by_dependencies(tasks);
        self.break_duration_ties(&mut eligible);
        self.break_duration_ties(&mut blocked);

        debug!(
            eligible = eligible.len(),
            blocked = blocked.len(),
            "ordered task set"
        );

        eligible.append(&mut blocked);
        eligible
    }

    /// Composite score `priority * (1 + duration / scale)`, as reported in
    /// logs and the dry-run listing.
    pub fn score(&self, task: &Task) -> f64 {
        task.priority as f64 * (1.0 + self.effective_duration(task) / self.config.duration_scale)
    }

    /// Declared duration, or `default_duration` when the task has none.
    pub fn effective_duration(&self, task: &Task) -> f64 {
        task.duration.unwrap_or(self.config.default_duration)
    }

    // Shorter effective duration first within equal priority, whatever the
    // priority's sign.
    fn break_duration_ties(&self, tasks: &mut [Task]) {
        tasks.sort_by(|a, b| {
            a.priority.cmp(&b.priority).then_with(|| {
                self.effective_duration(a)
                    .total_cmp(&self.effective_duration(b))
            })
        });
    }
}

fn sort_by_priority(tasks: &mut [Task]) {
    tasks.sort_by_key(|t| t.priority);
}

/// Signed distance from `now` to the task's deadline; negative once overdue.
fn urgency(task: &Task, now: DateTime<Utc>) -> Option<TimeDelta> {
    task.deadline.map(|deadline| deadline.signed_duration_since(now))
}

fn compare_urgency(a: Option<TimeDelta>, b: Option<TimeDelta>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn adjust_for_deadlines(tasks: &mut [Task], now: DateTime<Utc>) {
    tasks.sort_by(|a, b| {
        a.priority
            .cmp(&b.priority)
            .then_with(|| compare_urgency(urgency(a, now), urgency(b, now)))
    });
}

fn partition_by_dependencies(tasks: Vec<Task>) -> (Vec<Task>, Vec<Task>) {
    let ready: Vec<bool> = {
        let eligibility = Eligibility::new(&tasks);
        tasks.iter().map(|t| eligibility.deps_satisfied(t)).collect()
    };

    let mut eligible = Vec::new();
    let mut blocked = Vec::new();
    for (task, is_ready) in tasks.into_iter().zip(ready) {
        if is_ready {
            eligible.push(task);
        } else {
            blocked.push(task);
        }
    }
    (eligible, blocked)
}
