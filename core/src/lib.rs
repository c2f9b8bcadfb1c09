#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Campus Runner engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and the pure systems. Adapters and the session submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! that systems react to. Systems read the world through the immutable
//! [`GridView`] and [`TileLayerView`] snapshots defined here.

use std::{fmt, time::Duration};

use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Campus Runner.";

/// Number of cells an ice tile keeps the player sliding for.
pub const ICE_SLIDE_DISTANCE: u32 = 2;

/// Time deducted the first time a trap cell is stepped on.
pub const TRAP_TIME_PENALTY: Duration = Duration::from_secs(5);

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }

    /// Straight-line distance between the centres of two cells.
    #[must_use]
    pub fn euclidean_distance(self, other: CellCoord) -> f32 {
        let dx = self.column.abs_diff(other.column) as f32;
        let dy = self.row.abs_diff(other.row) as f32;
        (dx * dx + dy * dy).sqrt()
    }

    /// Cell reached by a single step in `direction`.
    ///
    /// Returns `None` when the step would leave the non-negative quadrant.
    /// Upper bounds are the grid's concern.
    #[must_use]
    pub fn step(self, direction: Direction) -> Option<CellCoord> {
        match direction {
            Direction::North => self
                .row
                .checked_sub(1)
                .map(|row| CellCoord::new(self.column, row)),
            Direction::East => self
                .column
                .checked_add(1)
                .map(|column| CellCoord::new(column, self.row)),
            Direction::South => self
                .row
                .checked_add(1)
                .map(|row| CellCoord::new(self.column, row)),
            Direction::West => self
                .column
                .checked_sub(1)
                .map(|column| CellCoord::new(column, self.row)),
        }
    }

    /// Row-major index of the cell in a `columns` by `rows` layer.
    ///
    /// Returns `None` when the cell lies outside the layer.
    #[must_use]
    pub fn index_in(self, columns: u32, rows: u32) -> Option<usize> {
        if self.column >= columns || self.row >= rows {
            return None;
        }
        let row = usize::try_from(self.row).ok()?;
        let column = usize::try_from(self.column).ok()?;
        let width = usize::try_from(columns).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.column, self.row)
    }
}

/// Cardinal movement directions available to the player and NPCs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
}

impl Direction {
    /// Every direction in clockwise order starting at north.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Direction of a single orthogonal step between two cells.
    ///
    /// Returns `None` unless `to` is exactly one orthogonal step from `from`.
    #[must_use]
    pub fn between(from: CellCoord, to: CellCoord) -> Option<Direction> {
        let column_diff = from.column().abs_diff(to.column());
        let row_diff = from.row().abs_diff(to.row());
        if column_diff + row_diff != 1 {
            return None;
        }

        if column_diff == 1 {
            if to.column() > from.column() {
                Some(Direction::East)
            } else {
                Some(Direction::West)
            }
        } else if to.row() > from.row() {
            Some(Direction::South)
        } else {
            Some(Direction::North)
        }
    }
}

/// Visual colour associated with a tile kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TileColor {
    red: u8,
    green: u8,
    blue: u8,
}

impl TileColor {
    /// Creates a new tile color from byte RGB components.
    #[must_use]
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Red component of the color.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green component of the color.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue component of the color.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }
}

/// Abilities held by the agent whose walkability is being evaluated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Capability {
    holds_key: bool,
}

impl Capability {
    /// Context without any special abilities.
    pub const NONE: Capability = Capability { holds_key: false };

    /// Context of an agent carrying the gate key.
    #[must_use]
    pub const fn with_key() -> Self {
        Self { holds_key: true }
    }

    /// Builds a context from a raw key flag.
    #[must_use]
    pub const fn from_key_flag(holds_key: bool) -> Self {
        Self { holds_key }
    }

    /// Reports whether locked gates open for this agent.
    #[must_use]
    pub const fn holds_key(&self) -> bool {
        self.holds_key
    }
}

/// Semantic category of a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TileKind {
    /// Regular walkable path.
    Normal,
    /// Permanent obstacle.
    Wall,
    /// Slippery tile that keeps the player sliding.
    Ice,
    /// Slow, soft ground.
    Grass,
    /// Very slow tile that usually warrants a detour.
    Water,
    /// Costs time the first time it is stepped on.
    Trap,
    /// Grants a temporary speed burst.
    Booster,
    /// Teleports to the paired portal B.
    PortalA,
    /// Teleports to the paired portal A.
    PortalB,
    /// Blocks movement until the key has been collected.
    LockedGate,
    /// Pickup that unlocks every locked gate.
    Key,
    /// Temporarily blocked by a construction event.
    Construction,
}

impl TileKind {
    /// Every tile kind in declaration order.
    pub const ALL: [TileKind; 12] = [
        TileKind::Normal,
        TileKind::Wall,
        TileKind::Ice,
        TileKind::Grass,
        TileKind::Water,
        TileKind::Trap,
        TileKind::Booster,
        TileKind::PortalA,
        TileKind::PortalB,
        TileKind::LockedGate,
        TileKind::Key,
        TileKind::Construction,
    ];

    /// Reports whether an agent with `capability` may stand on the tile.
    #[must_use]
    pub const fn is_walkable(self, capability: Capability) -> bool {
        match self {
            Self::Wall | Self::Construction => false,
            Self::LockedGate => capability.holds_key(),
            Self::Normal
            | Self::Ice
            | Self::Grass
            | Self::Water
            | Self::Trap
            | Self::Booster
            | Self::PortalA
            | Self::PortalB
            | Self::Key => true,
        }
    }

    /// Reports whether the tile clears the base occupancy bit of its cell.
    ///
    /// Locked gates keep their cell open in the grid map so that the tile
    /// layer and the capability context decide walkability.
    #[must_use]
    pub const fn blocks_occupancy(self) -> bool {
        matches!(self, Self::Wall | Self::Construction)
    }

    /// Cost of entering the tile; infinite when the tile cannot be entered.
    #[must_use]
    pub fn traversal_weight(self, capability: Capability) -> f32 {
        if !self.is_walkable(capability) {
            return f32::INFINITY;
        }

        match self {
            Self::Ice => 0.5,
            Self::Grass => 2.0,
            Self::Water => 4.0,
            Self::Booster => 0.3,
            Self::Normal
            | Self::Trap
            | Self::PortalA
            | Self::PortalB
            | Self::LockedGate
            | Self::Key => 1.0,
            Self::Wall | Self::Construction => f32::INFINITY,
        }
    }

    /// Number of extra cells an ice slide carries the player.
    #[must_use]
    pub const fn slide_distance(self) -> Option<u32> {
        match self {
            Self::Ice => Some(ICE_SLIDE_DISTANCE),
            _ => None,
        }
    }

    /// Time lost when the tile is triggered.
    #[must_use]
    pub const fn time_penalty(self) -> Option<Duration> {
        match self {
            Self::Trap => Some(TRAP_TIME_PENALTY),
            _ => None,
        }
    }

    /// Short lowercase tag renderers use to pick a texture.
    #[must_use]
    pub const fn visual_tag(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Wall => "wall",
            Self::Ice => "ice",
            Self::Grass => "grass",
            Self::Water => "water",
            Self::Trap => "trap",
            Self::Booster => "booster",
            Self::PortalA => "portal_a",
            Self::PortalB => "portal_b",
            Self::LockedGate => "locked_gate",
            Self::Key => "key",
            Self::Construction => "construction",
        }
    }

    /// Flat colour used when no texture is available.
    #[must_use]
    pub const fn color(self) -> TileColor {
        match self {
            Self::Normal => TileColor::from_rgb(60, 65, 80),
            Self::Wall => TileColor::from_rgb(120, 80, 100),
            Self::Ice => TileColor::from_rgb(150, 220, 255),
            Self::Grass => TileColor::from_rgb(80, 150, 80),
            Self::Water => TileColor::from_rgb(50, 100, 200),
            Self::Trap => TileColor::from_rgb(255, 80, 80),
            Self::Booster => TileColor::from_rgb(255, 220, 50),
            Self::PortalA => TileColor::from_rgb(200, 100, 255),
            Self::PortalB => TileColor::from_rgb(255, 100, 200),
            Self::LockedGate => TileColor::from_rgb(150, 100, 50),
            Self::Key => TileColor::from_rgb(255, 215, 0),
            Self::Construction => TileColor::from_rgb(255, 150, 50),
        }
    }
}

/// Read-only view into the base occupancy grid.
#[derive(Clone, Copy, Debug)]
pub struct GridView<'a> {
    blocked: &'a [bool],
    columns: u32,
    rows: u32,
}

impl<'a> GridView<'a> {
    /// Captures a new grid view backed by the provided row-major slice.
    #[must_use]
    pub fn new(blocked: &'a [bool], columns: u32, rows: u32) -> Self {
        Self {
            blocked,
            columns,
            rows,
        }
    }

    /// Reports whether the base occupancy of `cell` is open.
    ///
    /// Cells outside the grid are never walkable.
    #[must_use]
    pub fn is_walkable(&self, cell: CellCoord) -> bool {
        cell.index_in(self.columns, self.rows)
            .and_then(|index| self.blocked.get(index).copied())
            .map_or(false, |blocked| !blocked)
    }

    /// Provides the dimensions of the underlying grid.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }
}

/// Read-only view into the semantic tile layer.
#[derive(Clone, Copy, Debug)]
pub struct TileLayerView<'a> {
    kinds: &'a [TileKind],
    columns: u32,
    rows: u32,
}

impl<'a> TileLayerView<'a> {
    /// Captures a new tile layer view backed by the provided row-major slice.
    #[must_use]
    pub fn new(kinds: &'a [TileKind], columns: u32, rows: u32) -> Self {
        Self {
            kinds,
            columns,
            rows,
        }
    }

    /// Tile kind stored at `cell`, or `None` outside the layer.
    #[must_use]
    pub fn kind(&self, cell: CellCoord) -> Option<TileKind> {
        cell.index_in(self.columns, self.rows)
            .and_then(|index| self.kinds.get(index).copied())
    }

    /// Iterates the cells holding `kind` in row-major order.
    pub fn cells_of_kind(&self, kind: TileKind) -> impl Iterator<Item = CellCoord> + 'a {
        let columns = self.columns.max(1);
        self.kinds
            .iter()
            .enumerate()
            .filter(move |(_, candidate)| **candidate == kind)
            .filter_map(move |(index, _)| {
                let index = u32::try_from(index).ok()?;
                Some(CellCoord::new(index % columns, index / columns))
            })
    }

    /// Provides the dimensions of the underlying layer.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }
}

/// Search algorithms offered for path visualisation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PathAlgorithm {
    /// Uninformed breadth-first search minimising hop count.
    Bfs,
    /// Heuristic best-first search minimising traversal weight.
    AStar,
}

impl PathAlgorithm {
    /// Label shown next to the path overlay.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Bfs => "BFS",
            Self::AStar => "A*",
        }
    }
}

impl fmt::Display for PathAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Outcome of a path search.
///
/// An empty `cells` list means the goal was unreachable; this is an expected
/// result rather than an error.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PathResult {
    /// Cells from start to goal inclusive.
    pub cells: Vec<CellCoord>,
    /// Number of cells the search expanded.
    pub nodes_explored: usize,
}

impl PathResult {
    /// Result describing an unreachable goal.
    #[must_use]
    pub const fn unreachable(nodes_explored: usize) -> Self {
        Self {
            cells: Vec::new(),
            nodes_explored,
        }
    }

    /// Reports whether no path was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of cells in the path, start and goal included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Number of steps needed to walk the path.
    #[must_use]
    pub fn hops(&self) -> usize {
        self.cells.len().saturating_sub(1)
    }

    /// First cell after the start, if the path leaves the start at all.
    #[must_use]
    pub fn first_step(&self) -> Option<CellCoord> {
        self.cells.get(1).copied()
    }
}

/// Unique identifier assigned to an NPC.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NpcId(u32);

impl NpcId {
    /// Creates a new NPC identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Roles an NPC can play on campus.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NpcKind {
    /// Friendly student wandering between buildings.
    Student,
    /// Guard that chases the player on sight.
    Security,
    /// Lecturer who mostly stays put.
    Professor,
}

impl NpcKind {
    /// Short label shown above the sprite.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Student => "Student",
            Self::Security => "Guard",
            Self::Professor => "Prof",
        }
    }
}

/// States of the NPC behaviour machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NpcState {
    /// Waiting without a route.
    Idle,
    /// Walking the waypoint loop.
    Patrol,
    /// Following the player.
    Chase,
    /// Walking back to the start position.
    Return,
    /// Talking to the player.
    Interact,
}

/// Immutable representation of a single NPC used for presentation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NpcSnapshot {
    /// Identifier assigned to the NPC.
    pub id: NpcId,
    /// Role of the NPC.
    pub kind: NpcKind,
    /// Cell currently occupied by the NPC.
    pub cell: CellCoord,
    /// Current behaviour state.
    pub state: NpcState,
    /// Whether the NPC already talked to the player this session.
    pub has_interacted: bool,
}

/// Lifecycle of a play session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlayState {
    /// The clock runs and the player may move.
    Playing,
    /// Simulation is frozen until resumed.
    Paused,
    /// Every task was completed.
    Victory,
    /// The clock ran out.
    GameOver,
}

/// Dynamic map events that temporarily reshape the campus.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MapEvent {
    /// Blocks the listed cells with construction tiles.
    Construction {
        /// Cells turned into construction sites.
        cells: Vec<CellCoord>,
        /// How long the construction lasts.
        duration: Duration,
    },
    /// Doubles the advisory movement cost everywhere.
    Rain {
        /// How long the rain lasts.
        duration: Duration,
    },
    /// Closes the listed cells to force evacuation routes.
    FireDrill {
        /// Cells closed during the drill.
        cells: Vec<CellCoord>,
        /// How long the drill lasts.
        duration: Duration,
    },
}

impl MapEvent {
    /// Discriminant of the event.
    #[must_use]
    pub const fn kind(&self) -> MapEventKind {
        match self {
            Self::Construction { .. } => MapEventKind::Construction,
            Self::Rain { .. } => MapEventKind::Rain,
            Self::FireDrill { .. } => MapEventKind::FireDrill,
        }
    }

    /// How long the event stays active.
    #[must_use]
    pub const fn duration(&self) -> Duration {
        match self {
            Self::Construction { duration, .. }
            | Self::Rain { duration }
            | Self::FireDrill { duration, .. } => *duration,
        }
    }

    /// Cells whose tiles the event replaces.
    #[must_use]
    pub fn cells(&self) -> &[CellCoord] {
        match self {
            Self::Construction { cells, .. } | Self::FireDrill { cells, .. } => cells,
            Self::Rain { .. } => &[],
        }
    }
}

/// Discriminant of a [`MapEvent`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MapEventKind {
    /// See [`MapEvent::Construction`].
    Construction,
    /// See [`MapEvent::Rain`].
    Rain,
    /// See [`MapEvent::FireDrill`].
    FireDrill,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Requests a single player step.
    MovePlayer {
        /// Direction of travel for the attempted step.
        direction: Direction,
        /// Abilities the player currently holds.
        capability: Capability,
    },
    /// Places the player on a cell without recording an undo entry.
    RelocatePlayer {
        /// Destination cell.
        cell: CellCoord,
    },
    /// Deducts time from the session clock.
    ApplyTimePenalty {
        /// Amount of time to remove.
        penalty: Duration,
    },
    /// Adds points to the score.
    AwardPoints {
        /// Points earned.
        points: u32,
    },
    /// Restores the position and score recorded before the last move.
    UndoMove,
    /// Activates a dynamic map event.
    StartMapEvent {
        /// Event to activate.
        event: MapEvent,
    },
    /// Overwrites the tile kind of a single cell.
    SetTile {
        /// Cell to rewrite.
        cell: CellCoord,
        /// New tile kind.
        kind: TileKind,
    },
    /// Switches the session's play state.
    SetPlayState {
        /// State to enter.
        state: PlayState,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that the player took a step.
    PlayerMoved {
        /// Cell the player occupied before moving.
        from: CellCoord,
        /// Cell the player occupies after moving.
        to: CellCoord,
        /// Direction of the step.
        direction: Direction,
    },
    /// Confirms that the player was relocated by an effect.
    PlayerRelocated {
        /// Cell the player occupied before the relocation.
        from: CellCoord,
        /// Cell the player occupies afterwards.
        to: CellCoord,
    },
    /// Reports that a move request was refused.
    MoveRejected {
        /// Direction that was requested.
        direction: Direction,
        /// Specific reason the move failed.
        reason: MoveError,
    },
    /// Confirms that the last move was undone.
    MoveUndone {
        /// Cell the player occupied before the undo.
        from: CellCoord,
        /// Cell restored from the undo stack.
        to: CellCoord,
    },
    /// Announces that the tile layer changed and derived graphs are stale.
    TileLayerChanged {
        /// Generation of the tile layer after the change.
        generation: u64,
    },
    /// Announces that a map event became active.
    MapEventStarted {
        /// Kind of event that started.
        kind: MapEventKind,
    },
    /// Announces that a map event expired and its tiles were restored.
    MapEventEnded {
        /// Kind of event that ended.
        kind: MapEventKind,
    },
    /// Reports that time was deducted from the clock.
    TimePenaltyApplied {
        /// Amount of time removed.
        penalty: Duration,
        /// Time left afterwards.
        remaining: Duration,
    },
    /// Reports the new score.
    ScoreChanged {
        /// Score after the change.
        score: u32,
    },
    /// Announces a play state transition.
    PlayStateChanged {
        /// State that became active.
        state: PlayState,
    },
}

/// Reasons a move request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveError {
    /// The step would leave the campus grid.
    OutOfBounds,
    /// The destination cell cannot be entered.
    Blocked,
    /// The session is not in the playing state.
    NotPlaying,
    /// An NPC is standing on the destination cell.
    OccupiedByNpc,
}
