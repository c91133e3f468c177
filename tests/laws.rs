//! Property tests for the history laws and the graph invariants that every
//! sequence of commands must preserve.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use gantt_engine::{Command, CommandStack, Result, TaskDraft, TaskGraph, TaskId};
use proptest::prelude::*;

/// An edit expressed with indices into the current id list, so every
/// generated sequence can be replayed against whatever graph it produced.
#[derive(Debug, Clone)]
enum Op {
    Add {
        parent: Option<usize>,
        day: u32,
        days: i64,
    },
    Delete(usize),
    Update {
        task: usize,
        days: i64,
        progress: u8,
    },
    Reparent {
        task: usize,
        parent: Option<usize>,
    },
    Link {
        successor: usize,
        predecessor: usize,
    },
    Unlink {
        successor: usize,
        predecessor: usize,
    },
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (proptest::option::of(0..16usize), 1..28u32, 0..10i64)
            .prop_map(|(parent, day, days)| Op::Add { parent, day, days }),
        1 => (0..16usize).prop_map(Op::Delete),
        1 => (0..16usize, 0..10i64, 0..=100u8)
            .prop_map(|(task, days, progress)| Op::Update { task, days, progress }),
        1 => (0..16usize, proptest::option::of(0..16usize))
            .prop_map(|(task, parent)| Op::Reparent { task, parent }),
        2 => (0..16usize, 0..16usize)
            .prop_map(|(successor, predecessor)| Op::Link { successor, predecessor }),
        1 => (0..16usize, 0..16usize)
            .prop_map(|(successor, predecessor)| Op::Unlink { successor, predecessor }),
    ]
}

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 4, day).unwrap()
}

fn pick(graph: &TaskGraph, index: usize) -> TaskId {
    let ids: Vec<TaskId> = graph.flatten().iter().map(|t| t.id).collect();
    if ids.is_empty() {
        // Nothing to point at; commands on an unknown id simply fail.
        return 999;
    }
    ids[index % ids.len()]
}

fn to_command(graph: &TaskGraph, op: &Op) -> Result<Command> {
    match *op {
        Op::Add { parent, day, days } => Command::add(
            TaskDraft::new(format!("T{}", graph.next_id()), date(day), days),
            parent.map(|p| pick(graph, p)),
        ),
        Op::Delete(task) => Ok(Command::delete(pick(graph, task))),
        Op::Update { task, days, progress } => {
            let id = pick(graph, task);
            let mut fields = graph
                .find(id)
                .map(|t| t.fields())
                .unwrap_or_else(|| gantt_engine::TaskFields::new("missing", date(1), 1));
            fields.duration_days = days;
            fields.percent_complete = progress;
            Command::update(id, fields)
        }
        Op::Reparent { task, parent } => {
            Command::reparent(pick(graph, task), parent.map(|p| pick(graph, p)))
        }
        Op::Link {
            successor,
            predecessor,
        } => Command::link(pick(graph, successor), pick(graph, predecessor)),
        Op::Unlink {
            successor,
            predecessor,
        } => Ok(Command::unlink(pick(graph, successor), pick(graph, predecessor))),
    }
}

/// Ids are unique, every dependency points at a live task, and summaries
/// span exactly their children.
fn assert_invariants(graph: &TaskGraph) {
    let tasks = graph.flatten();
    let ids: BTreeSet<TaskId> = tasks.iter().map(|t| t.id).collect();
    assert_eq!(ids.len(), tasks.len(), "every task reachable exactly once");
    assert_eq!(ids.len(), graph.len());

    for task in &tasks {
        for dep in &task.dependencies {
            assert!(ids.contains(dep), "task {} depends on missing {}", task.id, dep);
            assert_ne!(*dep, task.id);
            assert!(!graph.is_ancestor(*dep, task.id));
            assert!(!graph.is_ancestor(task.id, *dep));
        }
        if !task.is_leaf() {
            let schedule = graph.schedule(task.id).unwrap();
            let children: Vec<_> = task
                .children
                .iter()
                .map(|c| graph.schedule(*c).unwrap())
                .collect();
            let start = children.iter().map(|s| s.start).min().unwrap();
            let end = children.iter().map(|s| s.end()).max().unwrap();
            assert_eq!(schedule.start, start);
            assert_eq!(schedule.end(), end);
        }
    }
}

/// Same tasks, same structure, same derived values.
fn assert_same(left: &TaskGraph, right: &TaskGraph) {
    assert_eq!(left, right);
    for task in right.flatten() {
        assert_eq!(left.schedule(task.id), right.schedule(task.id));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn every_command_is_undone_exactly(ops in proptest::collection::vec(op(), 1..40)) {
        let mut graph = TaskGraph::new();
        let mut stack = CommandStack::new();

        for op in &ops {
            let before = graph.clone();
            let Ok(command) = to_command(&graph, op) else {
                continue;
            };
            if stack.execute(command, &mut graph).is_err() {
                assert_same(&graph, &before);
                continue;
            }
            assert_invariants(&graph);
            let after = graph.clone();

            prop_assert!(stack.undo(&mut graph));
            assert_same(&graph, &before);
            prop_assert!(stack.redo(&mut graph));
            assert_same(&graph, &after);
        }
    }

    #[test]
    fn undoing_everything_restores_the_start(ops in proptest::collection::vec(op(), 1..40)) {
        let mut graph = TaskGraph::new();
        let mut stack = CommandStack::new();
        let mut states = vec![graph.clone()];

        for op in &ops {
            if let Ok(command) = to_command(&graph, op) {
                if stack.execute(command, &mut graph).is_ok() {
                    states.push(graph.clone());
                }
            }
        }

        while let Some(expected) = states.pop() {
            assert_same(&graph, &expected);
            if states.is_empty() {
                prop_assert!(!stack.undo(&mut graph));
            } else {
                prop_assert!(stack.undo(&mut graph));
            }
        }
        prop_assert!(graph.is_empty());
    }

    #[test]
    fn new_action_clears_redo(ops in proptest::collection::vec(op(), 1..20), day in 1..28u32) {
        let mut graph = TaskGraph::new();
        let mut stack = CommandStack::new();
        for op in &ops {
            if let Ok(command) = to_command(&graph, op) {
                let _ = stack.execute(command, &mut graph);
            }
        }
        stack.undo(&mut graph);

        let add = Command::add(TaskDraft::new("fresh", date(day), 1), None).unwrap();
        stack.execute(add, &mut graph).unwrap();
        prop_assert!(!stack.can_redo());
        prop_assert!(!stack.redo(&mut graph));
    }

    #[test]
    fn ids_are_unique_and_never_reused_while_live(ops in proptest::collection::vec(op(), 1..40)) {
        let mut graph = TaskGraph::new();
        let mut stack = CommandStack::new();
        for op in &ops {
            if let Ok(command) = to_command(&graph, op) {
                let expected = graph.next_id();
                let is_add = matches!(op, Op::Add { .. });
                if stack.execute(command, &mut graph).is_ok() && is_add {
                    prop_assert!(graph.contains(expected));
                    prop_assert_eq!(graph.next_id(), expected + 1);
                }
            }
            assert_invariants(&graph);
        }
    }
}

#[test]
fn deleting_a_subtree_removes_dependencies_on_it() {
    let mut graph = TaskGraph::new();
    let mut stack = CommandStack::new();
    let run = |stack: &mut CommandStack, graph: &mut TaskGraph, command: Result<Command>| {
        stack.execute(command.unwrap(), graph).unwrap();
    };

    run(&mut stack, &mut graph, Command::add(TaskDraft::new("Phase", date(1), 1), None));
    run(&mut stack, &mut graph, Command::add(TaskDraft::new("Inner", date(2), 3), Some(1)));
    run(&mut stack, &mut graph, Command::add(TaskDraft::new("After", date(8), 2), None));
    run(&mut stack, &mut graph, Command::link(3, 2));
    run(&mut stack, &mut graph, Command::link(3, 1));
    let before = graph.clone();

    stack.execute(Command::delete(1), &mut graph).unwrap();
    assert_eq!(graph.len(), 1);
    assert!(graph.find(3).unwrap().dependencies.is_empty());

    assert!(stack.undo(&mut graph));
    assert_eq!(graph, before);
    assert_eq!(graph.find(3).unwrap().dependencies, BTreeSet::from([1, 2]));
}
