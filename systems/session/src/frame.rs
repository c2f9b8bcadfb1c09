//! Presentation snapshot handed to renderers after every update.

use std::time::Duration;

use campus_runner_core::{
    CellCoord, MapEventKind, NpcSnapshot, PathAlgorithm, PathResult, PlayState,
};
use campus_runner_system_tasks::Task;
use campus_runner_system_tile_effects::EffectMessage;

/// Path currently drawn on top of the campus.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathOverlay {
    /// Algorithm that produced the path.
    pub algorithm: PathAlgorithm,
    /// Cells and exploration count.
    pub result: PathResult,
}

/// Nodes explored by the most recent search of each algorithm.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AlgorithmStats {
    bfs: Option<usize>,
    astar: Option<usize>,
}

impl AlgorithmStats {
    pub(crate) fn record(&mut self, algorithm: PathAlgorithm, nodes_explored: usize) {
        match algorithm {
            PathAlgorithm::Bfs => self.bfs = Some(nodes_explored),
            PathAlgorithm::AStar => self.astar = Some(nodes_explored),
        }
    }

    /// Nodes explored by the last search using `algorithm`.
    #[must_use]
    pub const fn nodes_explored(&self, algorithm: PathAlgorithm) -> Option<usize> {
        match algorithm {
            PathAlgorithm::Bfs => self.bfs,
            PathAlgorithm::AStar => self.astar,
        }
    }
}

/// Everything a renderer needs to draw one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    /// Cell occupied by the player.
    pub player: CellCoord,
    /// Current score.
    pub score: u32,
    /// Time left on the clock.
    pub time_remaining: Duration,
    /// Current play state.
    pub play_state: PlayState,
    /// Task the player is working on.
    pub current_task: Option<Task>,
    /// Cell of the current task's building.
    pub target: Option<CellCoord>,
    /// Tasks completed so far.
    pub completed_tasks: usize,
    /// Tasks registered in the session.
    pub total_tasks: usize,
    /// Path overlay, if one was requested.
    pub path: Option<PathOverlay>,
    /// Latest tile effect message.
    pub message: Option<EffectMessage>,
    /// Every NPC on campus.
    pub npcs: Vec<NpcSnapshot>,
    /// Per-algorithm exploration statistics.
    pub stats: AlgorithmStats,
    /// Map events currently in progress.
    pub map_events: Vec<MapEventKind>,
    /// Whether the player holds the gate key.
    pub holds_key: bool,
    /// Combined movement cost multiplier from weather and boosters.
    pub movement_cost_multiplier: f32,
}
