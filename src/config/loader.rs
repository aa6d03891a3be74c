// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::model::TaskFile;
use crate::errors::{FlowError, Result};
use crate::optimizer::{OrderingConfig, TaskSpec};

/// Read and parse a task file from disk.
pub fn load_task_file(path: impl AsRef<Path>) -> Result<TaskFile> {
    let contents = fs::read_to_string(path.as_ref())?;
    parse_task_file(&contents)
}

/// Parse a task file document.
///
/// - Malformed TOML, an unknown top-level key, a bad `[ordering]` table, or
///   a `task` key that is not an array fail with [`FlowError::InvalidInput`].
/// - A `[[task]]` entry with a wrong-typed or unknown field fails with
///   [`FlowError::InvalidTask`].
///
/// Missing `name` / `priority` are not checked here; the optimizer reports
/// them when the tasks are submitted.
pub fn parse_task_file(contents: &str) -> Result<TaskFile> {
    let mut table: toml::Table =
        toml::from_str(contents).map_err(|e| FlowError::InvalidInput(e.to_string()))?;

    let ordering = match table.remove("ordering") {
        Some(value) => value
            .try_into::<OrderingConfig>()
            .map_err(|e| FlowError::InvalidInput(format!("[ordering]: {e}")))?,
        None => OrderingConfig::default(),
    };
    ordering.validate()?;

    let tasks = match table.remove("task") {
        None => Vec::new(),
        Some(toml::Value::Array(items)) => items
            .into_iter()
            .enumerate()
            .map(|(index, item)| task_from_value(index, item))
            .collect::<Result<Vec<_>>>()?,
        Some(other) => {
            return Err(FlowError::InvalidInput(format!(
                "`task` must be an array of tables (got {})",
                other.type_str()
            )));
        }
    };

    if let Some(key) = table.keys().next() {
        return Err(FlowError::InvalidInput(format!(
            "unknown top-level key `{key}` (expected `ordering` or `task`)"
        )));
    }

    Ok(TaskFile { ordering, tasks })
}

/// Default task file location: `Flowdag.toml` in the working directory.
pub fn default_task_file_path() -> PathBuf {
    PathBuf::from("Flowdag.toml")
}

fn task_from_value(index: usize, value: toml::Value) -> Result<TaskSpec> {
    let mut table = match value {
        toml::Value::Table(table) => table,
        other => {
            return Err(FlowError::InvalidTask(format!(
                "task #{} must be a table (got {})",
                index + 1,
                other.type_str()
            )));
        }
    };

    // Accept native TOML datetimes as well as RFC 3339 strings.
    let native_deadline = match table.get("deadline") {
        Some(toml::Value::Datetime(dt)) => Some(dt.to_string()),
        _ => None,
    };
    if let Some(text) = native_deadline {
        table.insert("deadline".to_string(), toml::Value::String(text));
    }

    toml::Value::Table(table)
        .try_into::<TaskSpec>()
        .map_err(|e| FlowError::InvalidTask(format!("task #{}: {e}", index + 1)))
}
