//! Heuristic best-first search over the navigation graph.

use std::collections::{HashMap, HashSet};

use campus_runner_core::{CellCoord, PathResult};

use crate::{frontier::Frontier, reconstruct, NavigationGraph};

/// Finds the cheapest path from `start` to `goal` using entry weights.
///
/// The Manhattan heuristic is scaled by the graph's smallest edge weight
/// (capped at one) so it never overestimates on ice or booster tiles. On
/// unit-weight graphs this is the plain Manhattan distance. Cells are expanded
/// at most once; `nodes_explored` counts those expansions. A blocked goal
/// exhausts the start's component.
#[must_use]
pub fn search_astar(graph: &NavigationGraph, start: CellCoord, goal: CellCoord) -> PathResult {
    if !graph.contains(start) {
        return PathResult::unreachable(0);
    }

    let scale = graph.min_weight().map_or(1.0, |weight| weight.min(1.0));
    let heuristic = |cell: CellCoord| cell.manhattan_distance(goal) as f32 * scale;

    let mut frontier = Frontier::default();
    frontier.push(start, heuristic(start));
    let mut cost_so_far = HashMap::from([(start, 0.0_f32)]);
    let mut came_from = HashMap::new();
    let mut expanded = HashSet::new();
    let mut nodes_explored = 0;

    while let Some(cell) = frontier.pop() {
        if !expanded.insert(cell) {
            continue;
        }
        nodes_explored += 1;

        if cell == goal {
            return PathResult {
                cells: reconstruct(&came_from, start, goal),
                nodes_explored,
            };
        }

        let current = cost_so_far.get(&cell).copied().unwrap_or(f32::INFINITY);
        for (neighbor, weight) in graph.edges(cell) {
            if expanded.contains(&neighbor) {
                continue;
            }
            let tentative = current + weight;
            let known = cost_so_far.get(&neighbor).copied().unwrap_or(f32::INFINITY);
            if tentative < known {
                let _ = cost_so_far.insert(neighbor, tentative);
                let _ = came_from.insert(neighbor, cell);
                frontier.push(neighbor, tentative + heuristic(neighbor));
            }
        }
    }

    PathResult::unreachable(nodes_explored)
}
