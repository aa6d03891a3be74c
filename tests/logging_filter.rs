// tests/logging_filter.rs

use flowdag::cli::LogLevel;
use flowdag::logging::filter_directive;
use tracing_subscriber::EnvFilter;

#[test]
fn cli_flag_wins_over_environment() {
    let directive = filter_directive(Some(LogLevel::Warn), Some("flowdag=trace"));
    assert_eq!(directive, "warn");
}

#[test]
fn environment_filter_is_used_verbatim() {
    let directive = filter_directive(None, Some(" flowdag=debug,warn "));
    assert_eq!(directive, "flowdag=debug,warn");
    assert!(EnvFilter::try_new(&directive).is_ok());
}

#[test]
fn blank_or_missing_environment_falls_back_to_info() {
    assert_eq!(filter_directive(None, None), "info");
    assert_eq!(filter_directive(None, Some("   ")), "info");
}

#[test]
fn every_cli_level_is_a_valid_filter() {
    for level in [
        LogLevel::Error,
        LogLevel::Warn,
        LogLevel::Info,
        LogLevel::Debug,
        LogLevel::Trace,
    ] {
        let directive = filter_directive(Some(level), None);
        assert!(
            EnvFilter::try_new(&directive).is_ok(),
            "{directive} rejected"
        );
    }
}
