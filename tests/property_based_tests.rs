mod common;

use common::strategies::*;
use proptest::prelude::*;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;
use waypoint::navigation::{Direction, NavigationGraph, NodeType};
use waypoint::orchestration::{
    FatalFailurePolicy, Lifecycle, SchedulerPolicy, TaskResult, TaskState,
};

fn build_field(count: usize, connections: &[ConnectionSpec]) -> NavigationGraph {
    let mut graph = NavigationGraph::new();
    for index in 0..count {
        graph.add_node(node_id(index), NodeType::Primary).unwrap();
    }
    for connection in connections {
        graph
            .add_edge(
                &node_id(connection.from),
                &node_id(connection.to),
                connection.weight,
                connection.direction,
            )
            .unwrap();
    }
    graph
}

/// Bellman-Ford style relaxation over the undirected connection list
fn reference_distances(
    count: usize,
    connections: &[ConnectionSpec],
    start: usize,
    blocked: &HashSet<usize>,
) -> Vec<Option<f32>> {
    let mut dist: Vec<Option<f32>> = vec![None; count];
    if blocked.contains(&start) {
        return dist;
    }
    dist[start] = Some(0.0);
    for _ in 0..count {
        for connection in connections {
            for (a, b) in [(connection.from, connection.to), (connection.to, connection.from)] {
                if blocked.contains(&b) {
                    continue;
                }
                if let Some(base) = dist[a] {
                    let candidate = base + connection.weight;
                    if dist[b].map_or(true, |known| candidate < known) {
                        dist[b] = Some(candidate);
                    }
                }
            }
        }
    }
    dist
}

fn run_pattern(
    pattern: &WorkflowPattern,
    policy: SchedulerPolicy,
    fatal: &HashSet<usize>,
) -> (Vec<usize>, Lifecycle) {
    let order = Rc::new(RefCell::new(Vec::new()));
    let mut lifecycle = Lifecycle::new().with_policy(policy);

    for index in 0..pattern.task_count() {
        let order = Rc::clone(&order);
        let result = if fatal.contains(&index) {
            TaskResult::FatalFailure
        } else {
            TaskResult::Success
        };
        lifecycle.register_fn(WorkflowPattern::task_id(index), move |_| {
            order.borrow_mut().push(index);
            result
        });
    }
    for (from, to) in pattern.edges() {
        lifecycle
            .add_dependency(&WorkflowPattern::task_id(from), &WorkflowPattern::task_id(to))
            .unwrap();
    }

    lifecycle.run().unwrap();
    let order = order.borrow().clone();
    (order, lifecycle)
}

proptest! {
    /// Property: every task of an acyclic plan runs exactly once, after all its prerequisites
    #[test]
    fn every_task_runs_once_after_its_prerequisites(pattern in workflow_pattern_strategy()) {
        let (order, lifecycle) = run_pattern(&pattern, SchedulerPolicy::default(), &HashSet::new());

        prop_assert_eq!(order.len(), pattern.task_count());
        let position: HashMap<usize, usize> =
            order.iter().enumerate().map(|(at, task)| (*task, at)).collect();
        prop_assert_eq!(position.len(), pattern.task_count());

        for (from, to) in pattern.edges() {
            prop_assert!(position[&from] < position[&to], "{} ran before {}", to, from);
        }
        for index in 0..pattern.task_count() {
            prop_assert!(lifecycle.is_task_succeeded(&WorkflowPattern::task_id(index)));
        }
    }

    /// Property: under block_dependents no descendant of a failed task is ever dispatched
    #[test]
    fn failed_tasks_never_release_descendants(
        pattern in workflow_pattern_strategy(),
        failing in prop::collection::hash_set(0usize..12, 0..3),
    ) {
        let failing: HashSet<usize> =
            failing.into_iter().filter(|index| *index < pattern.task_count()).collect();
        let policy =
            SchedulerPolicy::default().with_fatal_policy(FatalFailurePolicy::BlockDependents);
        let (order, lifecycle) = run_pattern(&pattern, policy, &failing);

        let ran: HashSet<usize> = order.iter().copied().collect();
        prop_assert_eq!(ran.len(), order.len());

        for index in &failing {
            if !ran.contains(index) {
                continue;
            }
            prop_assert_eq!(
                lifecycle.task_state(&WorkflowPattern::task_id(*index)),
                Some(TaskState::Failed)
            );
            for descendant in pattern.descendants(*index) {
                prop_assert!(!ran.contains(&descendant));
                prop_assert_eq!(
                    lifecycle.task_state(&WorkflowPattern::task_id(descendant)),
                    Some(TaskState::Skipped)
                );
            }
        }
    }

    /// Property: under the default policy a fatal failure still lets every task run
    #[test]
    fn unblock_policy_runs_every_task(
        pattern in workflow_pattern_strategy(),
        failing in prop::collection::hash_set(0usize..12, 0..3),
    ) {
        let (order, lifecycle) = run_pattern(&pattern, SchedulerPolicy::default(), &failing);
        prop_assert_eq!(order.len(), pattern.task_count());
        for index in 0..pattern.task_count() {
            prop_assert!(lifecycle.is_task_completed(&WorkflowPattern::task_id(index)));
        }
    }

    /// Property: every connection is stored as a mirrored pair of directed edges
    #[test]
    fn connections_are_mirrored((count, connections) in field_strategy()) {
        let graph = build_field(count, &connections);
        prop_assert_eq!(graph.edge_count(), connections.len() * 2);

        for connection in &connections {
            let from = node_id(connection.from);
            let to = node_id(connection.to);
            let forward = graph.edges_from(&from).iter().any(|edge| {
                edge.to == to
                    && edge.weight == connection.weight
                    && edge.direction == connection.direction
            });
            let backward = graph.edges_from(&to).iter().any(|edge| {
                edge.to == from
                    && edge.weight == connection.weight
                    && edge.direction == connection.direction.reverse()
            });
            prop_assert!(forward, "missing edge {} -> {}", from, to);
            prop_assert!(backward, "missing mirrored edge {} -> {}", to, from);
        }
    }

    /// Property: an edge X -> Y advertises exactly the perpendicular headings leaving Y,
    /// whatever order the connections were inserted in
    #[test]
    fn intersection_flags_follow_the_far_end((count, connections) in field_strategy()) {
        let mut reversed = connections.clone();
        reversed.reverse();

        for graph in [build_field(count, &connections), build_field(count, &reversed)] {
            for node in graph.nodes() {
                for edge in graph.edges_from(node) {
                    let leaving: HashSet<Direction> =
                        graph.edges_from(&edge.to).iter().map(|out| out.direction).collect();
                    for turn in Direction::ALL {
                        let expected =
                            turn.orientation() != edge.orientation() && leaving.contains(&turn);
                        prop_assert_eq!(edge.has_intersection(turn), expected);
                    }
                }
            }
        }
    }

    /// Property: routes are optimal, contiguous, and never enter a blacklisted node
    #[test]
    fn routes_are_shortest_and_respect_blacklist(
        (count, connections) in field_strategy(),
        blocked in prop::collection::hash_set(0usize..9, 0..3),
    ) {
        let blocked: HashSet<usize> = blocked.into_iter().filter(|index| *index < count).collect();
        let blacklist: HashSet<String> = blocked.iter().map(|index| node_id(*index)).collect();

        let mut graph = build_field(count, &connections);
        graph.set_node(Some(&node_id(0)));
        let expected = reference_distances(count, &connections, 0, &blocked);

        for target in 1..count {
            let target_id = node_id(target);
            let route = graph.find_path_avoiding(&target_id, &blacklist);
            match (route, expected[target]) {
                (Some(route), Some(distance)) => {
                    let summed: f32 = route.edges.iter().map(|edge| edge.weight).sum();
                    prop_assert_eq!(route.distance, distance);
                    prop_assert_eq!(summed, distance);
                    prop_assert_eq!(route.destination(), target_id.as_str());

                    let nodes = route.nodes();
                    for pair in nodes.windows(2) {
                        prop_assert!(graph.get_edge(pair[0], pair[1]).unwrap().is_some());
                    }
                    for node in nodes {
                        prop_assert!(!blacklist.contains(node));
                    }
                }
                (None, None) => {}
                (route, distance) => {
                    prop_assert!(
                        false,
                        "route {:?} disagrees with reference {:?}",
                        route,
                        distance
                    );
                }
            }
        }
    }
}
