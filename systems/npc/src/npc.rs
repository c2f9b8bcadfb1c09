//! Behaviour state machine driving a single NPC.

use std::time::Duration;

use campus_runner_core::{CellCoord, Direction, NpcId, NpcKind, NpcSnapshot, NpcState};
use campus_runner_system_pathfinding::{search_bfs, NavigationGraph};
use tracing::debug;

/// Minimum time between two steps at normal speed.
pub const MOVE_DELAY: Duration = Duration::from_millis(300);

/// Time an idle NPC waits before starting its patrol.
pub const IDLE_DWELL: Duration = Duration::from_secs(3);

/// Time an NPC spends talking before it resumes patrolling.
pub const INTERACT_DURATION: Duration = Duration::from_secs(2);

/// Distance at which a chasing NPC has caught up with the player.
pub const CATCH_DISTANCE: f32 = 1.5;

const SECURITY_DETECTION_RANGE: f32 = 4.0;
const DEFAULT_DETECTION_RANGE: f32 = 3.0;
const SECURITY_CHASE_SPEED: f32 = 1.5;
const DEFAULT_CHASE_SPEED: f32 = 1.0;

/// Non-player character walking the campus.
#[derive(Clone, Debug)]
pub struct Npc {
    id: NpcId,
    kind: NpcKind,
    position: CellCoord,
    start: CellCoord,
    waypoints: Vec<CellCoord>,
    waypoint_index: usize,
    state: NpcState,
    path: Vec<CellCoord>,
    path_index: usize,
    move_timer: Duration,
    state_timer: Duration,
    has_interacted: bool,
    dialogue: &'static str,
    facing: Direction,
}

impl Npc {
    /// Creates an NPC standing on `start`.
    ///
    /// NPCs with waypoints begin patrolling immediately; without waypoints
    /// they idle first and then guard their start cell.
    #[must_use]
    pub fn new(
        id: NpcId,
        kind: NpcKind,
        start: CellCoord,
        waypoints: Vec<CellCoord>,
        dialogue: &'static str,
    ) -> Self {
        let (state, waypoints) = if waypoints.is_empty() {
            (NpcState::Idle, vec![start])
        } else {
            (NpcState::Patrol, waypoints)
        };

        Self {
            id,
            kind,
            position: start,
            start,
            waypoints,
            waypoint_index: 0,
            state,
            path: Vec::new(),
            path_index: 0,
            move_timer: Duration::ZERO,
            state_timer: Duration::ZERO,
            has_interacted: false,
            dialogue,
            facing: Direction::South,
        }
    }

    /// Advances timers, evaluates transitions and takes at most one step.
    ///
    /// Transitions are checked on every call; steps only happen once the
    /// movement cooldown has elapsed. Unreachable targets leave the NPC where
    /// it is.
    pub fn update(&mut self, dt: Duration, player: CellCoord, graph: &NavigationGraph) {
        self.state_timer = self.state_timer.saturating_add(dt);
        self.move_timer = self.move_timer.saturating_add(dt);
        let distance = self.position.euclidean_distance(player);

        match self.state {
            NpcState::Idle => {
                if self.state_timer >= IDLE_DWELL {
                    self.transition(NpcState::Patrol);
                }
            }
            NpcState::Patrol => {
                if self.kind == NpcKind::Security && distance < self.detection_range() {
                    self.transition(NpcState::Chase);
                } else if self.move_timer >= MOVE_DELAY {
                    self.patrol_step(graph);
                    self.move_timer = Duration::ZERO;
                }
            }
            NpcState::Chase => {
                if distance > self.detection_range() * 2.0 {
                    self.transition(NpcState::Return);
                } else if distance < CATCH_DISTANCE {
                    self.transition(NpcState::Interact);
                } else if self.move_timer >= MOVE_DELAY.div_f32(self.chase_speed()) {
                    self.step_towards(player, graph);
                    self.move_timer = Duration::ZERO;
                }
            }
            NpcState::Return => {
                if self.position == self.start {
                    self.transition(NpcState::Patrol);
                } else if self.move_timer >= MOVE_DELAY {
                    self.step_towards(self.start, graph);
                    self.move_timer = Duration::ZERO;
                }
            }
            NpcState::Interact => {
                if self.state_timer >= INTERACT_DURATION {
                    self.has_interacted = true;
                    self.transition(NpcState::Patrol);
                }
            }
        }
    }

    fn transition(&mut self, next: NpcState) {
        debug!(
            npc = self.id.get(),
            kind = self.kind.label(),
            from = ?self.state,
            to = ?next,
            "npc state changed"
        );
        self.state = next;
        self.state_timer = Duration::ZERO;
        self.path.clear();
        self.path_index = 0;
    }

    fn patrol_step(&mut self, graph: &NavigationGraph) {
        let Some(mut target) = self.waypoints.get(self.waypoint_index).copied() else {
            return;
        };
        if self.position == target {
            self.waypoint_index = (self.waypoint_index + 1) % self.waypoints.len();
            target = self.waypoints[self.waypoint_index];
        }
        if self.position == target {
            return;
        }

        let stale = self.path.last() != Some(&target) || self.path_index >= self.path.len();
        if stale {
            self.path = search_bfs(graph, self.position, target).cells;
            self.path_index = 1;
        }

        let Some(next) = self.path.get(self.path_index).copied() else {
            return;
        };
        if self.try_step(next, graph) {
            self.path_index += 1;
        } else {
            self.path.clear();
        }
    }

    fn step_towards(&mut self, target: CellCoord, graph: &NavigationGraph) {
        self.path = search_bfs(graph, self.position, target).cells;
        self.path_index = 1;
        if let Some(next) = self.path.get(self.path_index).copied() {
            if self.try_step(next, graph) {
                self.path_index += 1;
            }
        }
    }

    fn try_step(&mut self, next: CellCoord, graph: &NavigationGraph) -> bool {
        let Some(direction) = Direction::between(self.position, next) else {
            return false;
        };
        if !graph.contains(next) {
            return false;
        }
        self.facing = direction;
        self.position = next;
        true
    }

    /// Identifier of the NPC.
    #[must_use]
    pub const fn id(&self) -> NpcId {
        self.id
    }

    /// Role of the NPC.
    #[must_use]
    pub const fn kind(&self) -> NpcKind {
        self.kind
    }

    /// Cell the NPC currently occupies.
    #[must_use]
    pub const fn position(&self) -> CellCoord {
        self.position
    }

    /// Cell the NPC returns to after losing the player.
    #[must_use]
    pub const fn start(&self) -> CellCoord {
        self.start
    }

    /// Current behaviour state.
    #[must_use]
    pub const fn state(&self) -> NpcState {
        self.state
    }

    /// Whether the NPC has finished talking to the player at least once.
    #[must_use]
    pub const fn has_interacted(&self) -> bool {
        self.has_interacted
    }

    /// Line the NPC says when the player stops by.
    #[must_use]
    pub const fn dialogue(&self) -> &'static str {
        self.dialogue
    }

    /// Direction of the NPC's last step.
    #[must_use]
    pub const fn facing(&self) -> Direction {
        self.facing
    }

    /// Distance at which the NPC notices the player.
    #[must_use]
    pub fn detection_range(&self) -> f32 {
        match self.kind {
            NpcKind::Security => SECURITY_DETECTION_RANGE,
            NpcKind::Student | NpcKind::Professor => DEFAULT_DETECTION_RANGE,
        }
    }

    /// Speed multiplier applied to the movement cooldown while chasing.
    #[must_use]
    pub fn chase_speed(&self) -> f32 {
        match self.kind {
            NpcKind::Security => SECURITY_CHASE_SPEED,
            NpcKind::Student | NpcKind::Professor => DEFAULT_CHASE_SPEED,
        }
    }

    /// Presentation snapshot of the NPC.
    #[must_use]
    pub fn snapshot(&self) -> NpcSnapshot {
        NpcSnapshot {
            id: self.id,
            kind: self.kind,
            cell: self.position,
            state: self.state,
            has_interacted: self.has_interacted,
        }
    }
}
