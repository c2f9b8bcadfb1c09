//! Breadth-first search over the navigation graph.

use std::collections::{HashMap, HashSet, VecDeque};

use campus_runner_core::{CellCoord, PathResult};

use crate::{reconstruct, NavigationGraph};

/// Finds the path with the fewest steps from `start` to `goal`.
///
/// Edge weights are ignored: the result minimises hop count, which is what the
/// comparison against [`crate::search_astar`] is meant to show. `nodes_explored`
/// counts dequeued cells, so an unreachable goal reports the size of the
/// component containing `start`, also when the goal itself is blocked. A start
/// outside the graph yields an empty result without exploring anything.
#[must_use]
pub fn search_bfs(graph: &NavigationGraph, start: CellCoord, goal: CellCoord) -> PathResult {
    if !graph.contains(start) {
        return PathResult::unreachable(0);
    }

    let mut queue = VecDeque::from([start]);
    let mut visited = HashSet::from([start]);
    let mut parents = HashMap::new();
    let mut nodes_explored = 0;

    while let Some(cell) = queue.pop_front() {
        nodes_explored += 1;
        if cell == goal {
            return PathResult {
                cells: reconstruct(&parents, start, goal),
                nodes_explored,
            };
        }

        for neighbor in graph.neighbors(cell) {
            if visited.insert(neighbor) {
                let _ = parents.insert(neighbor, cell);
                queue.push_back(neighbor);
            }
        }
    }

    PathResult::unreachable(nodes_explored)
}
