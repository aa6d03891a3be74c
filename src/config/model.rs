// src/config/model.rs

use crate::optimizer::{OrderingConfig, TaskSpec};

/// A task file as read from TOML.
///
/// ```toml
/// [ordering]
/// default_duration = 100
/// duration_scale = 1000
///
/// [[task]]
/// name = "build"
/// priority = 1
/// cmd = "cargo build"
///
/// [[task]]
/// name = "test"
/// priority = 2
/// duration = 30
/// deadline = "2026-10-20T12:00:00Z"
/// dependencies = ["build"]
/// cmd = "cargo test"
/// ```
///
/// `[ordering]` is optional and falls back to the policy defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskFile {
    pub ordering: OrderingConfig,
    /// Tasks in file order; validation happens when they are optimized.
    pub tasks: Vec<TaskSpec>,
}
