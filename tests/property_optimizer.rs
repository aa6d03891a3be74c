// tests/property_optimizer.rs

mod common;
use crate::common::builders::TaskSpecBuilder;
use crate::common::fake_executor::RecordingExecutor;

use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use proptest::prelude::*;

use flowdag::optimizer::{OrderingPolicy, TaskSpec, optimize};
use flowdag::types::WorkflowState;
use flowdag::workflow::{InMemoryWorkflowStore, WorkflowManager};

// Acyclic task sets: task N may only depend on tasks 0..N-1. The result is
// shuffled so input order says nothing about the dependency structure.
fn task_set_strategy(max_tasks: usize) -> impl Strategy<Value = Vec<TaskSpec>> {
    (1..=max_tasks)
        .prop_flat_map(|n| {
            proptest::collection::vec(
                (
                    -5i64..5,
                    proptest::option::of(0.0f64..2000.0),
                    proptest::collection::vec(any::<usize>(), 0..3),
                ),
                n,
            )
        })
        .prop_map(|raw| {
            raw.into_iter()
                .enumerate()
                .map(|(i, (priority, duration, deps))| {
                    let mut task = TaskSpecBuilder::new(&format!("task_{i}"), priority);
                    if let Some(d) = duration {
                        task = task.duration(d);
                    }
                    if i > 0 {
                        let unique: BTreeSet<usize> = deps.into_iter().map(|d| d % i).collect();
                        for dep in unique {
                            task = task.after(&format!("task_{dep}"));
                        }
                    }
                    task.build()
                })
                .collect::<Vec<_>>()
        })
        .prop_shuffle()
}

proptest! {
    #[test]
    fn optimize_returns_a_permutation(tasks in task_set_strategy(12)) {
        let input: BTreeSet<String> = tasks.iter().filter_map(|t| t.name.clone()).collect();
        let ordered = optimize(tasks).unwrap();
        let output: BTreeSet<String> = ordered.iter().map(|t| t.name.clone()).collect();

        prop_assert_eq!(ordered.len(), input.len());
        prop_assert_eq!(input, output);
    }

    #[test]
    fn eligible_tasks_precede_blocked_ones(tasks in task_set_strategy(12)) {
        let ordered = optimize(tasks).unwrap();
        let first_blocked = ordered
            .iter()
            .position(|t| !t.dependencies.is_empty())
            .unwrap_or(ordered.len());

        prop_assert!(ordered[first_blocked..].iter().all(|t| !t.dependencies.is_empty()));

        for partition in [&ordered[..first_blocked], &ordered[first_blocked..]] {
            for pair in partition.windows(2) {
                prop_assert!(pair[0].priority <= pair[1].priority);
            }
        }
    }

    #[test]
    fn equal_priority_peers_run_shortest_first(tasks in task_set_strategy(12)) {
        let policy = OrderingPolicy::default();
        let ordered = policy.optimize(tasks).unwrap();
        let first_blocked = ordered
            .iter()
            .position(|t| !t.dependencies.is_empty())
            .unwrap_or(ordered.len());

        for partition in [&ordered[..first_blocked], &ordered[first_blocked..]] {
            for pair in partition.windows(2) {
                if pair[0].priority == pair[1].priority {
                    prop_assert!(
                        policy.effective_duration(&pair[0]) <= policy.effective_duration(&pair[1]),
                        "{} ran before shorter {} at priority {}",
                        pair[0].name,
                        pair[1].name,
                        pair[0].priority
                    );
                }
            }
        }
    }

    #[test]
    fn optimize_is_deterministic(tasks in task_set_strategy(12)) {
        let first = optimize(tasks.clone()).unwrap();
        let second = optimize(tasks).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn completing_every_dispatch_finishes_the_workflow(tasks in task_set_strategy(12)) {
        let total = tasks.len();
        let executor = RecordingExecutor::new();
        let manager = WorkflowManager::new(InMemoryWorkflowStore::new(), Arc::clone(&executor));
        let workflow = manager.manage_workflow(tasks).unwrap();

        let mut completed: HashSet<String> = HashSet::new();
        let mut cursor = 0;

        // Each step completes one dispatched task, so `total` steps suffice.
        for _ in 0..total {
            let dispatched = executor.dispatched();
            prop_assert!(cursor < dispatched.len(), "stalled with nothing dispatched");
            let next = &dispatched[cursor];
            cursor += 1;

            let task = workflow.task(&next.name).unwrap();
            prop_assert!(task.dependencies.iter().all(|d| completed.contains(d)));

            manager.on_task_completed(&workflow.id, &next.name).unwrap();
            completed.insert(next.name.clone());
        }

        prop_assert_eq!(executor.dispatched().len(), total);
        prop_assert_eq!(
            manager.get_workflow_state(&workflow.id).unwrap(),
            WorkflowState::Completed
        );
    }
}
