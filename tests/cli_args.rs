// tests/cli_args.rs

use std::path::PathBuf;

use clap::Parser;
use flowdag::cli::{CliArgs, LogLevel};
use flowdag::config::default_task_file_path;

#[test]
fn config_defaults_to_task_file_in_working_directory() {
    let args = CliArgs::try_parse_from(["flowdag"]).expect("parse");
    assert_eq!(args.config, default_task_file_path());
    assert!(!args.dry_run);
    assert!(args.log_level.is_none());
}

#[test]
fn flags_override_defaults() {
    let args = CliArgs::try_parse_from([
        "flowdag",
        "--config",
        "ci/tasks.toml",
        "--log-level",
        "debug",
        "--dry-run",
    ])
    .expect("parse");

    assert_eq!(args.config, PathBuf::from("ci/tasks.toml"));
    assert!(matches!(args.log_level, Some(LogLevel::Debug)));
    assert!(args.dry_run);
}
