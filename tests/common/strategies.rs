use proptest::prelude::*;
use proptest::strategy::Just;
use waypoint::navigation::Direction;

/// Strategy for generating realistic task dependency patterns
#[derive(Debug, Clone)]
pub enum WorkflowPattern {
    Linear(usize),                // Linear chain of N tasks
    Diamond,                      // Diamond: 0->1,2->3 pattern
    FanOut(usize),                // 0 -> N pattern
    FanIn(usize),                 // N -> 1 pattern
    Layered(usize, Vec<(usize, usize)>), // N tasks, edges always from lower to higher index
}

pub fn workflow_pattern_strategy() -> impl Strategy<Value = WorkflowPattern> {
    prop_oneof![
        (2usize..=10).prop_map(WorkflowPattern::Linear),
        Just(WorkflowPattern::Diamond),
        (2usize..=8).prop_map(WorkflowPattern::FanOut),
        (2usize..=8).prop_map(WorkflowPattern::FanIn),
        layered_dag_strategy(),
    ]
}

/// Random DAG: edges only go from a lower to a higher task index
pub fn layered_dag_strategy() -> impl Strategy<Value = WorkflowPattern> {
    (2usize..=12).prop_flat_map(|count| {
        prop::collection::vec((0..count, 0..count), 0..count * 2).prop_map(move |pairs| {
            let edges = pairs
                .into_iter()
                .filter(|(a, b)| a != b)
                .map(|(a, b)| (a.min(b), a.max(b)))
                .collect();
            WorkflowPattern::Layered(count, edges)
        })
    })
}

impl WorkflowPattern {
    pub fn task_count(&self) -> usize {
        match self {
            WorkflowPattern::Linear(n) => *n,
            WorkflowPattern::Diamond => 4,
            WorkflowPattern::FanOut(n) => n + 1,
            WorkflowPattern::FanIn(n) => n + 1,
            WorkflowPattern::Layered(n, _) => *n,
        }
    }

    /// `(prerequisite, dependent)` pairs
    pub fn edges(&self) -> Vec<(usize, usize)> {
        match self {
            WorkflowPattern::Linear(n) => (0..(*n - 1)).map(|i| (i, i + 1)).collect(),
            WorkflowPattern::Diamond => vec![(0, 1), (0, 2), (1, 3), (2, 3)],
            WorkflowPattern::FanOut(n) => (1..=*n).map(|i| (0, i)).collect(),
            WorkflowPattern::FanIn(n) => (0..*n).map(|i| (i, *n)).collect(),
            WorkflowPattern::Layered(_, edges) => edges.clone(),
        }
    }

    pub fn task_id(index: usize) -> String {
        format!("task_{index}")
    }

    /// Every task reachable from `index`, excluding itself
    pub fn descendants(&self, index: usize) -> Vec<usize> {
        let edges = self.edges();
        let mut found = Vec::new();
        let mut stack = vec![index];
        while let Some(current) = stack.pop() {
            for &(from, to) in &edges {
                if from == current && !found.contains(&to) {
                    found.push(to);
                    stack.push(to);
                }
            }
        }
        found
    }
}

pub fn direction_strategy() -> impl Strategy<Value = Direction> {
    prop_oneof![
        Just(Direction::East),
        Just(Direction::North),
        Just(Direction::West),
        Just(Direction::South),
    ]
}

/// A connection between two distinct primary nodes, with an integral weight so sums are exact
#[derive(Debug, Clone)]
pub struct ConnectionSpec {
    pub from: usize,
    pub to: usize,
    pub weight: f32,
    pub direction: Direction,
}

/// Node count plus a list of connections between those nodes
pub fn field_strategy() -> impl Strategy<Value = (usize, Vec<ConnectionSpec>)> {
    (2usize..=9).prop_flat_map(|count| {
        let connection = (0..count, 0..count, 0u8..=9, direction_strategy())
            .prop_filter("No self-loops", |(from, to, _, _)| from != to)
            .prop_map(|(from, to, weight, direction)| ConnectionSpec {
                from,
                to,
                weight: f32::from(weight),
                direction,
            });
        (Just(count), prop::collection::vec(connection, 0..count * 3))
    })
}

pub fn node_id(index: usize) -> String {
    format!("n{index}")
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn test_workflow_patterns_only_point_forward(pattern in workflow_pattern_strategy()) {
            for (from, to) in pattern.edges() {
                prop_assert!(from < to);
                prop_assert!(to < pattern.task_count());
            }
        }
    }

    #[test]
    fn test_diamond_descendants() {
        let diamond = WorkflowPattern::Diamond;
        let mut descendants = diamond.descendants(0);
        descendants.sort_unstable();
        assert_eq!(descendants, vec![1, 2, 3]);
        assert!(diamond.descendants(3).is_empty());
    }
}
