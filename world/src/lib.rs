#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Campus Runner.

mod grid;
mod layout;
mod map_events;
mod tiles;
mod undo;

use std::{collections::BTreeMap, time::Duration};

use campus_runner_core::{
    Capability, CellCoord, Command, Event, MoveError, PlayState, WELCOME_BANNER,
};
use tracing::{debug, warn};

use self::{
    grid::GridMap,
    map_events::ActiveMapEvent,
    tiles::TileLayer,
    undo::{UndoStack, DEFAULT_UNDO_CAPACITY},
};

pub use self::layout::{CampusLayout, LayoutError};

/// Default length of a play session.
pub const DEFAULT_TIME_LIMIT: Duration = Duration::from_secs(300);

/// Movement cost multiplier reported while it rains.
const RAIN_INTENSITY: f32 = 2.0;

/// Represents the authoritative Campus Runner world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    grid: GridMap,
    tiles: TileLayer,
    buildings: BTreeMap<String, CellCoord>,
    player: CellCoord,
    score: u32,
    time_remaining: Duration,
    play_state: PlayState,
    undo: UndoStack<MoveRecord>,
    map_events: Vec<ActiveMapEvent>,
    tick_index: u64,
}

impl World {
    /// Creates a world ready for play from a validated layout.
    #[must_use]
    pub fn new(layout: &CampusLayout, time_limit: Duration) -> Self {
        let columns = layout.columns();
        let rows = layout.rows();
        let kinds = layout.kinds().to_vec();
        let blocked = kinds.iter().map(|kind| kind.blocks_occupancy()).collect();

        Self {
            banner: WELCOME_BANNER,
            grid: GridMap::from_blocked(columns, rows, blocked),
            tiles: TileLayer::from_kinds(columns, rows, kinds),
            buildings: layout.buildings().clone(),
            player: layout.start(),
            score: 0,
            time_remaining: time_limit,
            play_state: PlayState::Playing,
            undo: UndoStack::with_capacity(DEFAULT_UNDO_CAPACITY),
            map_events: Vec::new(),
            tick_index: 0,
        }
    }

    fn can_enter(&self, cell: CellCoord, capability: Capability) -> bool {
        self.grid.is_walkable(cell)
            && self
                .tiles
                .kind(cell)
                .map_or(false, |kind| kind.is_walkable(capability))
    }

    fn set_play_state(&mut self, state: PlayState, out_events: &mut Vec<Event>) {
        if self.play_state == state {
            return;
        }
        debug!(from = ?self.play_state, to = ?state, "play state changed");
        self.play_state = state;
        out_events.push(Event::PlayStateChanged { state });
    }

    fn advance_map_events(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        if self.map_events.is_empty() {
            return;
        }

        let mut tiles_changed = false;
        let mut still_active = Vec::with_capacity(self.map_events.len());
        for mut event in self.map_events.drain(..) {
            if event.advance(dt) {
                still_active.push(event);
                continue;
            }

            let kind = event.kind();
            tiles_changed |= event.revert(&mut self.grid, &mut self.tiles);
            debug!(?kind, "map event ended");
            out_events.push(Event::MapEventEnded { kind });
        }
        self.map_events = still_active;

        if tiles_changed {
            out_events.push(Event::TileLayerChanged {
                generation: self.tiles.generation(),
            });
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt } => {
            world.tick_index = world.tick_index.saturating_add(1);
            if world.play_state != PlayState::Playing {
                return;
            }

            out_events.push(Event::TimeAdvanced { dt });
            world.time_remaining = world.time_remaining.saturating_sub(dt);
            world.advance_map_events(dt, out_events);

            if world.time_remaining.is_zero() {
                world.set_play_state(PlayState::GameOver, out_events);
            }
        }
        Command::MovePlayer {
            direction,
            capability,
        } => {
            if world.play_state != PlayState::Playing {
                out_events.push(Event::MoveRejected {
                    direction,
                    reason: MoveError::NotPlaying,
                });
                return;
            }

            let from = world.player;
            let Some(to) = from.step(direction).filter(|cell| world.grid.contains(*cell)) else {
                out_events.push(Event::MoveRejected {
                    direction,
                    reason: MoveError::OutOfBounds,
                });
                return;
            };

            if !world.can_enter(to, capability) {
                out_events.push(Event::MoveRejected {
                    direction,
                    reason: MoveError::Blocked,
                });
                return;
            }

            world.undo.push(MoveRecord {
                position: from,
                score: world.score,
            });
            world.player = to;
            out_events.push(Event::PlayerMoved {
                from,
                to,
                direction,
            });
        }
        Command::RelocatePlayer { cell } => {
            if !world.grid.contains(cell) {
                warn!(%cell, "ignoring relocation outside the campus");
                return;
            }
            let from = world.player;
            if from == cell {
                return;
            }
            world.player = cell;
            out_events.push(Event::PlayerRelocated { from, to: cell });
        }
        Command::ApplyTimePenalty { penalty } => {
            world.time_remaining = world.time_remaining.saturating_sub(penalty);
            out_events.push(Event::TimePenaltyApplied {
                penalty,
                remaining: world.time_remaining,
            });
            if world.time_remaining.is_zero() && world.play_state == PlayState::Playing {
                world.set_play_state(PlayState::GameOver, out_events);
            }
        }
        Command::AwardPoints { points } => {
            world.score = world.score.saturating_add(points);
            out_events.push(Event::ScoreChanged { score: world.score });
        }
        Command::UndoMove => {
            if world.play_state != PlayState::Playing {
                return;
            }
            let Some(record) = world.undo.pop() else {
                return;
            };
            let from = world.player;
            world.player = record.position;
            out_events.push(Event::MoveUndone {
                from,
                to: record.position,
            });
            if world.score != record.score {
                world.score = record.score;
                out_events.push(Event::ScoreChanged { score: world.score });
            }
        }
        Command::StartMapEvent { event } => {
            let active = {
                let running = &world.map_events;
                ActiveMapEvent::activate(&event, &mut world.grid, &mut world.tiles, |cell| {
                    running.iter().any(|other| other.claims(cell))
                })
            };
            let kind = active.kind();
            let touches_tiles = active.touches_tiles();
            world.map_events.push(active);
            debug!(?kind, cells = event.cells().len(), "map event started");
            out_events.push(Event::MapEventStarted { kind });
            if touches_tiles {
                out_events.push(Event::TileLayerChanged {
                    generation: world.tiles.generation(),
                });
            }
        }
        Command::SetTile { cell, kind } => {
            if world.tiles.set(cell, kind).is_none() {
                warn!(%cell, ?kind, "ignoring tile write outside the campus");
                return;
            }
            world.grid.set_blocked(cell, kind.blocks_occupancy());
            out_events.push(Event::TileLayerChanged {
                generation: world.tiles.generation(),
            });
        }
        Command::SetPlayState { state } => {
            world.set_play_state(state, out_events);
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::{collections::BTreeMap, time::Duration};

    use campus_runner_core::{
        Capability, CellCoord, GridView, MapEventKind, PlayState, TileKind, TileLayerView,
    };

    use super::{World, RAIN_INTENSITY};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Dimensions of the campus as `(columns, rows)`.
    #[must_use]
    pub fn dimensions(world: &World) -> (u32, u32) {
        world.grid.dimensions()
    }

    /// Exposes a read-only view of the base occupancy grid.
    #[must_use]
    pub fn grid_view(world: &World) -> GridView<'_> {
        world.grid.view()
    }

    /// Exposes a read-only view of the tile layer.
    #[must_use]
    pub fn tile_view(world: &World) -> TileLayerView<'_> {
        world.tiles.view()
    }

    /// Tile kind at `cell`, or `None` outside the campus.
    #[must_use]
    pub fn tile_at(world: &World, cell: CellCoord) -> Option<TileKind> {
        world.tiles.kind(cell)
    }

    /// Generation of the tile layer; increments on every tile write.
    #[must_use]
    pub fn tile_generation(world: &World) -> u64 {
        world.tiles.generation()
    }

    /// Reports whether an agent with `capability` may stand on `cell`.
    #[must_use]
    pub fn is_walkable(world: &World, cell: CellCoord, capability: Capability) -> bool {
        world.can_enter(cell, capability)
    }

    /// Cell currently occupied by the player.
    #[must_use]
    pub fn player_cell(world: &World) -> CellCoord {
        world.player
    }

    /// Current score.
    #[must_use]
    pub fn score(world: &World) -> u32 {
        world.score
    }

    /// Time left on the session clock.
    #[must_use]
    pub fn time_remaining(world: &World) -> Duration {
        world.time_remaining
    }

    /// Current play state.
    #[must_use]
    pub fn play_state(world: &World) -> PlayState {
        world.play_state
    }

    /// Named buildings ordered by name.
    #[must_use]
    pub fn buildings(world: &World) -> &BTreeMap<String, CellCoord> {
        &world.buildings
    }

    /// Location of the named building, if it exists.
    #[must_use]
    pub fn building(world: &World, name: &str) -> Option<CellCoord> {
        world.buildings.get(name).copied()
    }

    /// Number of moves that can currently be undone.
    #[must_use]
    pub fn undo_depth(world: &World) -> usize {
        world.undo.len()
    }

    /// Kinds of the map events currently active, in activation order.
    #[must_use]
    pub fn active_map_events(world: &World) -> Vec<MapEventKind> {
        world.map_events.iter().map(|event| event.kind()).collect()
    }

    /// Advisory movement cost multiplier caused by the weather.
    #[must_use]
    pub fn rain_intensity(world: &World) -> f32 {
        if world
            .map_events
            .iter()
            .any(|event| event.kind() == MapEventKind::Rain)
        {
            RAIN_INTENSITY
        } else {
            1.0
        }
    }

    /// Number of ticks the world has processed.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }
}

#[derive(Clone, Copy, Debug)]
struct MoveRecord {
    position: CellCoord,
    score: u32,
}
