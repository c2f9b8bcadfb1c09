#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Navigation graph construction and the path searches that run on it.

mod astar;
mod bfs;
mod frontier;
mod graph;

use std::collections::HashMap;

use campus_runner_core::{CellCoord, PathAlgorithm, PathResult};
use tracing::debug;

pub use self::{astar::search_astar, bfs::search_bfs, graph::NavigationGraph};

/// Runs the requested search algorithm.
#[must_use]
pub fn find_path(
    graph: &NavigationGraph,
    algorithm: PathAlgorithm,
    start: CellCoord,
    goal: CellCoord,
) -> PathResult {
    let result = match algorithm {
        PathAlgorithm::Bfs => search_bfs(graph, start, goal),
        PathAlgorithm::AStar => search_astar(graph, start, goal),
    };
    debug!(
        %algorithm,
        %start,
        %goal,
        cells = result.len(),
        nodes_explored = result.nodes_explored,
        "path search finished"
    );
    result
}

/// Walks parent links back from `goal` and returns the path in travel order.
fn reconstruct(
    parents: &HashMap<CellCoord, CellCoord>,
    start: CellCoord,
    goal: CellCoord,
) -> Vec<CellCoord> {
    let mut cells = vec![goal];
    let mut current = goal;
    while current != start {
        let Some(&parent) = parents.get(&current) else {
            break;
        };
        cells.push(parent);
        current = parent;
    }
    cells.reverse();
    cells
}
