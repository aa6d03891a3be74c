// src/config/mod.rs

//! Task file loading for the `flowdag` binary.
//!
//! - [`model`] defines the parsed [`TaskFile`].
//! - [`loader`] reads and parses TOML, mapping document-level problems to
//!   `InvalidInput` and per-task problems to `InvalidTask`.

pub mod loader;
pub mod model;

pub use loader::{default_task_file_path, load_task_file, parse_task_file};
pub use model::TaskFile;
