//! A* search over a lazily-expanded graph.
//!
//! The graph itself is never materialized: callers implement [`Problem`] to
//! describe neighbors and edge costs on demand, which is what lets this run
//! over graphs too large (or too dynamic) to enumerate up front — a grid
//! with millions of cells, a navmesh, a procedurally generated dungeon.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};
use std::hash::Hash;

use tracing::trace;

/// Everything A* needs to know about the search space, queried lazily as
/// nodes are expanded.
pub trait Problem {
    type Node: Clone + Eq + Hash;

    /// Nodes reachable from `node` in one step, paired with the cost of that
    /// step. Only ever called on nodes A* actually expands.
    fn neighbors(&self, node: &Self::Node) -> Vec<(Self::Node, f64)>;

    /// Admissible estimate of the remaining cost from `node` to the goal.
    /// Must never overestimate the true cost, or the result may not be
    /// shortest.
    fn heuristic(&self, node: &Self::Node) -> f64;
}

/// A found path: the node sequence from start to goal, and its total cost.
#[derive(Debug, Clone, PartialEq)]
pub struct Path<N> {
    pub nodes: Vec<N>,
    pub cost: f64,
}

struct Frontier<N> {
    f_cost: f64,
    node: N,
}

impl<N> PartialEq for Frontier<N> {
    fn eq(&self, other: &Self) -> bool {
        self.f_cost == other.f_cost
    }
}
impl<N> Eq for Frontier<N> {}

impl<N> PartialOrd for Frontier<N> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<N> Ord for Frontier<N> {
    // Reversed so `BinaryHeap` (a max-heap) pops the lowest f-cost first.
    fn cmp(&self, other: &Self) -> Ordering {
        other.f_cost.total_cmp(&self.f_cost)
    }
}

/// Runs A* from `start` to `goal`. Returns `None` if `goal` is unreachable.
pub fn search<P: Problem>(problem: &P, start: P::Node, goal: &P::Node) -> Option<Path<P::Node>> {
    let mut open = BinaryHeap::new();
    let mut g_cost: HashMap<P::Node, f64> = HashMap::new();
    let mut came_from: HashMap<P::Node, P::Node> = HashMap::new();

    g_cost.insert(start.clone(), 0.0);
    open.push(Frontier { f_cost: problem.heuristic(&start), node: start.clone() });

    let mut expansions = 0usize;

    while let Some(Frontier { node: current, .. }) = open.pop() {
        if &current == goal {
            trace!(expansions, "A* reached goal");
            let cost = *g_cost.get(&current).unwrap_or(&0.0);
            return Some(Path { nodes: reconstruct_path(&came_from, current), cost });
        }

        let current_g = *g_cost.get(&current).unwrap_or(&f64::INFINITY);
        expansions += 1;
        trace!(expansions, "expanding node");

        for (neighbor, edge_cost) in problem.neighbors(&current) {
            let tentative_g = current_g + edge_cost;
            let best_known = g_cost.get(&neighbor).copied().unwrap_or(f64::INFINITY);
            if tentative_g < best_known {
                came_from.insert(neighbor.clone(), current.clone());
                g_cost.insert(neighbor.clone(), tentative_g);
                let f_cost = tentative_g + problem.heuristic(&neighbor);
                open.push(Frontier { f_cost, node: neighbor });
            }
        }
    }

    None
}

fn reconstruct_path<N: Clone + Eq + Hash>(came_from: &HashMap<N, N>, goal: N) -> Vec<N> {
    let mut nodes = vec![goal.clone()];
    let mut current = goal;
    while let Some(prev) = came_from.get(&current) {
        nodes.push(prev.clone());
        current = prev.clone();
    }
    nodes.reverse();
    nodes
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A 2D grid with a few blocked cells, 4-connected, unit edge costs.
    struct GridProblem {
        width: i32,
        height: i32,
        blocked: Vec<(i32, i32)>,
    }

    impl Problem for GridProblem {
        type Node = (i32, i32);

        fn neighbors(&self, &(x, y): &Self::Node) -> Vec<(Self::Node, f64)> {
            [(x + 1, y), (x - 1, y), (x, y + 1), (x, y - 1)]
                .into_iter()
                .filter(|&(nx, ny)| {
                    nx >= 0 && ny >= 0 && nx < self.width && ny < self.height && !self.blocked.contains(&(nx, ny))
                })
                .map(|n| (n, 1.0))
                .collect()
        }

        fn heuristic(&self, &(x, y): &Self::Node) -> f64 {
            ((self.width - 1 - x).abs() + (self.height - 1 - y).abs()) as f64
        }
    }

    #[test]
    fn finds_shortest_path_on_open_grid() {
        let problem = GridProblem { width: 5, height: 5, blocked: vec![] };
        let path = search(&problem, (0, 0), &(4, 4)).expect("path should exist");
        assert_eq!(path.cost, 8.0);
        assert_eq!(path.nodes.first(), Some(&(0, 0)));
        assert_eq!(path.nodes.last(), Some(&(4, 4)));
    }

    #[test]
    fn routes_around_a_wall() {
        let blocked: Vec<(i32, i32)> = (0..4).map(|y| (2, y)).collect();
        let problem = GridProblem { width: 5, height: 5, blocked };
        let path = search(&problem, (0, 0), &(4, 0)).expect("path should exist");
        assert!(path.cost > 4.0);
        assert!(path.nodes.iter().all(|&(x, y)| x != 2 || y == 4));
    }

    #[test]
    fn unreachable_goal_returns_none() {
        let blocked: Vec<(i32, i32)> = (0..5).map(|y| (2, y)).collect();
        let problem = GridProblem { width: 5, height: 5, blocked };
        assert!(search(&problem, (0, 0), &(4, 0)).is_none());
    }
}
