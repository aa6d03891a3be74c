// tests/optimizer_ordering.rs

mod common;
use crate::common::builders::{TaskSetBuilder, TaskSpecBuilder, fixed_now};
use crate::common::init_tracing;

use std::error::Error;

use chrono::Duration;
use flowdag::errors::FlowError;
use flowdag::optimizer::{OrderingConfig, OrderingPolicy, Task, TaskSpec, optimize};

type TestResult = Result<(), Box<dyn Error>>;

fn names(tasks: &[Task]) -> Vec<&str> {
    tasks.iter().map(|t| t.name.as_str()).collect()
}

#[test]
fn sorts_by_ascending_priority() -> TestResult {
    init_tracing();

    let tasks = TaskSetBuilder::new()
        .with_task("C", 3)
        .with_task("A", 1)
        .with_task("B", 2)
        .build();

    let ordered = optimize(tasks)?;
    assert_eq!(names(&ordered), vec!["A", "B", "C"]);
    Ok(())
}

#[test]
fn earlier_deadline_wins_within_equal_priority() -> TestResult {
    init_tracing();
    let now = fixed_now();

    let tasks = TaskSetBuilder::new()
        .with(TaskSpecBuilder::new("later", 1).deadline(now + Duration::hours(2)).build())
        .with(TaskSpecBuilder::new("none", 1).build())
        .with(TaskSpecBuilder::new("sooner", 1).deadline(now + Duration::hours(1)).build())
        .with(TaskSpecBuilder::new("overdue", 1).deadline(now - Duration::hours(1)).build())
        .build();

    let ordered = OrderingPolicy::default().optimize_at(tasks, now)?;
    assert_eq!(names(&ordered), vec!["overdue", "sooner", "later", "none"]);
    Ok(())
}

#[test]
fn deadline_does_not_override_priority() -> TestResult {
    let now = fixed_now();

    let tasks = TaskSetBuilder::new()
        .with(TaskSpecBuilder::new("urgent_low", 5).deadline(now).build())
        .with(TaskSpecBuilder::new("relaxed_high", 1).build())
        .build();

    let ordered = OrderingPolicy::default().optimize_at(tasks, now)?;
    assert_eq!(names(&ordered), vec!["relaxed_high", "urgent_low"]);
    Ok(())
}

#[test]
fn blocked_tasks_follow_eligible_ones() -> TestResult {
    init_tracing();

    // B has the best priority but waits on A.
    let tasks = TaskSetBuilder::new()
        .with(TaskSpecBuilder::new("A", 5).build())
        .with(TaskSpecBuilder::new("B", 1).after("A").build())
        .with(TaskSpecBuilder::new("C", 2).build())
        .build();

    let ordered = optimize(tasks)?;
    assert_eq!(names(&ordered), vec!["C", "A", "B"]);
    Ok(())
}

#[test]
fn shorter_duration_breaks_priority_ties() -> TestResult {
    let tasks = TaskSetBuilder::new()
        .with(TaskSpecBuilder::new("long", 2).duration(900.0).build())
        .with(TaskSpecBuilder::new("default", 2).build())
        .with(TaskSpecBuilder::new("short", 2).duration(10.0).build())
        .build();

    let ordered = optimize(tasks)?;
    assert_eq!(names(&ordered), vec!["short", "default", "long"]);
    Ok(())
}

#[test]
fn shorter_duration_wins_for_negative_priority() -> TestResult {
    let tasks = TaskSetBuilder::new()
        .with(TaskSpecBuilder::new("long", -2).duration(900.0).build())
        .with(TaskSpecBuilder::new("short", -2).duration(10.0).build())
        .build();

    let ordered = optimize(tasks)?;
    assert_eq!(names(&ordered), vec!["short", "long"]);
    Ok(())
}

#[test]
fn shorter_duration_wins_for_zero_priority() -> TestResult {
    let tasks = TaskSetBuilder::new()
        .with(TaskSpecBuilder::new("long", 0).duration(900.0).build())
        .with(TaskSpecBuilder::new("default", 0).build())
        .with(TaskSpecBuilder::new("short", 0).duration(10.0).build())
        .build();

    let ordered = optimize(tasks)?;
    assert_eq!(names(&ordered), vec!["short", "default", "long"]);
    Ok(())
}

#[test]
fn duration_never_outranks_priority() -> TestResult {
    let tasks = TaskSetBuilder::new()
        .with(TaskSpecBuilder::new("quick_p2", 2).duration(0.0).build())
        .with(TaskSpecBuilder::new("slow_p1", 1).duration(5000.0).build())
        .build();

    let ordered = optimize(tasks)?;
    assert_eq!(names(&ordered), vec!["slow_p1", "quick_p2"]);
    Ok(())
}

#[test]
fn composite_score_uses_defaults_and_config() -> TestResult {
    let ordered = optimize(vec![
        TaskSpecBuilder::new("a", 2).duration(500.0).build(),
        TaskSpecBuilder::new("b", 1).build(),
    ])?;

    let policy = OrderingPolicy::default();
    let b = ordered.iter().find(|t| t.name == "b").expect("b present");
    let a = ordered.iter().find(|t| t.name == "a").expect("a present");
    assert!((policy.score(a) - 3.0).abs() < 1e-9);
    assert!((policy.score(b) - 1.1).abs() < 1e-9);

    let custom = OrderingPolicy::new(OrderingConfig {
        default_duration: 0.0,
        duration_scale: 10.0,
    });
    assert!((custom.score(b) - 1.0).abs() < 1e-9);
    assert!((custom.score(a) - 102.0).abs() < 1e-9);
    Ok(())
}

#[test]
fn optimize_is_deterministic() -> TestResult {
    let now = fixed_now();
    let tasks = TaskSetBuilder::new()
        .with(TaskSpecBuilder::new("a", 1).deadline(now + Duration::days(3)).build())
        .with(TaskSpecBuilder::new("b", 1).deadline(now + Duration::days(1)).build())
        .with(TaskSpecBuilder::new("c", 0).after("a").build())
        .with(TaskSpecBuilder::new("d", 2).duration(7.0).build())
        .with(TaskSpecBuilder::new("e", 2).build())
        .build();

    let first = optimize(tasks.clone())?;
    let second = optimize(tasks)?;
    assert_eq!(first, second);
    Ok(())
}

#[test]
fn output_is_a_permutation_of_input() -> TestResult {
    let tasks = TaskSetBuilder::new()
        .with_task("x", 3)
        .with(TaskSpecBuilder::new("y", 1).after("x").build())
        .with_task("z", 3)
        .build();

    let ordered = optimize(tasks)?;
    let mut got: Vec<_> = names(&ordered);
    got.sort();
    assert_eq!(got, vec!["x", "y", "z"]);
    Ok(())
}

#[test]
fn missing_name_is_invalid_task() {
    let result = optimize(vec![TaskSpecBuilder::empty().priority(1).build()]);
    match result {
        Err(FlowError::InvalidTask(msg)) => assert!(msg.contains("name")),
        other => panic!("Expected InvalidTask, got: {:?}", other),
    }
}

#[test]
fn missing_priority_is_invalid_task() {
    let result = optimize(vec![TaskSpecBuilder::empty().name("A").build()]);
    match result {
        Err(FlowError::InvalidTask(msg)) => {
            assert!(msg.contains("priority"));
            assert!(msg.contains("A"));
        }
        other => panic!("Expected InvalidTask, got: {:?}", other),
    }
}

#[test]
fn duplicate_names_are_rejected() {
    let result = optimize(vec![TaskSpec::new("A", 1), TaskSpec::new("A", 2)]);
    match result {
        Err(FlowError::InvalidTask(msg)) => assert!(msg.contains("duplicate")),
        other => panic!("Expected InvalidTask, got: {:?}", other),
    }
}

#[test]
fn unknown_dependency_is_rejected() {
    let result = optimize(vec![TaskSpec::new("A", 1).after("NonExistent")]);
    match result {
        Err(FlowError::InvalidTask(msg)) => {
            assert!(msg.contains("unknown dependency"));
            assert!(msg.contains("NonExistent"));
        }
        other => panic!("Expected InvalidTask, got: {:?}", other),
    }
}

#[test]
fn self_dependency_is_rejected() {
    let result = optimize(vec![TaskSpec::new("A", 1).after("A")]);
    assert!(matches!(result, Err(FlowError::InvalidTask(_))));
}

#[test]
fn dependency_cycle_is_rejected() {
    let result = optimize(vec![
        TaskSpec::new("A", 1).after("B"),
        TaskSpec::new("B", 1).after("A"),
    ]);
    match result {
        Err(FlowError::DependencyCycle(msg)) => {
            assert!(msg.contains("cycle detected"));
            assert!(msg.contains("A") || msg.contains("B"));
        }
        other => panic!("Expected DependencyCycle, got: {:?}", other),
    }
}

#[test]
fn negative_duration_is_rejected() {
    let result = optimize(vec![TaskSpec::new("A", 1).with_duration(-1.0)]);
    assert!(matches!(result, Err(FlowError::InvalidTask(_))));
}

#[test]
fn empty_input_orders_to_empty_output() -> TestResult {
    assert!(optimize(Vec::new())?.is_empty());
    Ok(())
}
