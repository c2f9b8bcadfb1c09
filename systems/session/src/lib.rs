#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Explicit session context that owns every Campus Runner subsystem.
//!
//! The session applies commands to the world, rebuilds the navigation graphs
//! as soon as the world reports a tile change, and only then lets the
//! follow-up systems (tile effects, NPCs, tasks and map events) react.

mod config;
mod frame;

use std::time::Duration;

use campus_runner_core::{
    Capability, CellCoord, Command, Direction, Event, MoveError, PathAlgorithm, PathResult,
    PlayState,
};
use campus_runner_system_map_events::{self as map_events, MapEventScheduler};
use campus_runner_system_npc::Npcs;
use campus_runner_system_pathfinding::{find_path, NavigationGraph};
use campus_runner_system_tasks::{Completion, Task, TaskRegistry};
use campus_runner_system_tile_effects::{EffectMessage, TileEffects};
use campus_runner_world::{self as world, query, CampusLayout, World};
use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};
use tracing::{debug, info};

pub use self::{
    config::SessionConfig,
    frame::{AlgorithmStats, Frame, PathOverlay},
};

/// Upper bound on command cascades triggered by a single input.
const MAX_DISPATCH_ROUNDS: usize = 16;

/// Running play session.
#[derive(Debug)]
pub struct Session {
    config: SessionConfig,
    layout: CampusLayout,
    catalog: Vec<Task>,
    world: World,
    player_graph: NavigationGraph,
    npc_graph: NavigationGraph,
    effects: TileEffects,
    npcs: Npcs,
    tasks: TaskRegistry,
    scheduler: Option<MapEventScheduler>,
    rng: ChaCha8Rng,
    path: Option<PathOverlay>,
    stats: AlgorithmStats,
    message: Option<EffectMessage>,
    last_completion: Option<Completion>,
}

impl Session {
    /// Starts a session on `layout` with the provided task catalogue.
    #[must_use]
    pub fn new(layout: CampusLayout, catalog: Vec<Task>, config: SessionConfig) -> Self {
        let world = World::new(&layout, config.time_limit());
        let mut rng = ChaCha8Rng::seed_from_u64(config.rng_seed());

        let mut effects = TileEffects::new();
        effects.discover_portals(query::tile_view(&world));

        let player_graph = build_graph(&world, effects.capability());
        let npc_graph = build_graph(&world, Capability::NONE);

        let npcs = if config.npcs() {
            let buildings: Vec<CellCoord> = query::buildings(&world).values().copied().collect();
            Npcs::spawn_roster(&buildings, &mut rng)
        } else {
            Npcs::default()
        };

        let mut tasks = TaskRegistry::new(catalog.clone());
        if let Some(task) = tasks.assign_next(&mut rng) {
            info!(%task, "task assigned");
        }

        let scheduler = config.map_events().then(|| {
            MapEventScheduler::new(map_events::Config::new(
                config.first_event_delay(),
                config.event_interval(),
                config.rng_seed().wrapping_add(1),
            ))
        });

        Self {
            config,
            layout,
            catalog,
            world,
            player_graph,
            npc_graph,
            effects,
            npcs,
            tasks,
            scheduler,
            rng,
            path: None,
            stats: AlgorithmStats::default(),
            message: None,
            last_completion: None,
        }
    }

    /// Attempts a single player step.
    pub fn move_player(&mut self, direction: Direction) -> Vec<Event> {
        let destination = query::player_cell(&self.world).step(direction);
        if query::play_state(&self.world) == PlayState::Playing {
            if let Some(npc) = destination.and_then(|cell| self.npcs.blocking_at(cell)) {
                debug!(npc = npc.id().get(), ?direction, "move blocked by npc");
                return vec![Event::MoveRejected {
                    direction,
                    reason: MoveError::OccupiedByNpc,
                }];
            }
        }

        self.dispatch(Command::MovePlayer {
            direction,
            capability: self.effects.capability(),
        })
    }

    /// Advances the session clock by `dt`, then continues any ice slide.
    pub fn tick(&mut self, dt: Duration) -> Vec<Event> {
        let mut events = self.dispatch(Command::Tick { dt });

        if query::play_state(&self.world) == PlayState::Playing && self.effects.is_sliding() {
            let player = query::player_cell(&self.world);
            let capability = self.effects.capability();
            let world = &self.world;
            let npcs = &self.npcs;
            let next = self.effects.continue_slide(player, |cell| {
                query::is_walkable(world, cell, capability) && npcs.blocking_at(cell).is_none()
            });
            if let Some(cell) = next {
                events.extend(self.dispatch(Command::RelocatePlayer { cell }));
            }
        }

        events
    }

    /// Restores the position and score from before the last move.
    pub fn undo(&mut self) -> Vec<Event> {
        self.dispatch(Command::UndoMove)
    }

    /// Computes a path from the player to the current task's building.
    ///
    /// Returns `None` when no task is assigned. The result replaces the path
    /// overlay and updates the algorithm statistics.
    pub fn request_path(&mut self, algorithm: PathAlgorithm) -> Option<&PathOverlay> {
        let goal = self.current_target()?;
        let result = self.path_to(goal, algorithm);
        self.path = Some(PathOverlay { algorithm, result });
        self.path.as_ref()
    }

    /// Computes a path from the player to `goal` without touching the overlay.
    pub fn path_to(&mut self, goal: CellCoord, algorithm: PathAlgorithm) -> PathResult {
        self.player_graph
            .debug_assert_current(query::tile_generation(&self.world));
        let start = query::player_cell(&self.world);
        let result = find_path(&self.player_graph, algorithm, start, goal);
        self.stats.record(algorithm, result.nodes_explored);
        result
    }

    /// Removes the path overlay.
    pub fn clear_path(&mut self) {
        self.path = None;
    }

    /// Replaces the current task with a random uncompleted one.
    pub fn skip_task(&mut self) -> Option<&Task> {
        if query::play_state(&self.world) != PlayState::Playing {
            return None;
        }
        let next = self.tasks.assign_next(&mut self.rng)?;
        info!(task = %next, "task skipped");
        self.path = None;
        self.tasks.current()
    }

    /// Toggles between playing and paused.
    pub fn toggle_pause(&mut self) -> Vec<Event> {
        let state = match query::play_state(&self.world) {
            PlayState::Playing => PlayState::Paused,
            PlayState::Paused => PlayState::Playing,
            PlayState::Victory | PlayState::GameOver => return Vec::new(),
        };
        self.dispatch(Command::SetPlayState { state })
    }

    /// Discards all state and starts over with the same layout, tasks and seed.
    pub fn reset(&mut self) {
        info!("session reset");
        *self = Self::new(self.layout.clone(), self.catalog.clone(), self.config);
    }

    /// Applies an arbitrary command and lets every system react to it.
    pub fn apply(&mut self, command: Command) -> Vec<Event> {
        self.dispatch(command)
    }

    /// Snapshot of everything a renderer needs.
    #[must_use]
    pub fn frame(&self) -> Frame {
        Frame {
            player: query::player_cell(&self.world),
            score: query::score(&self.world),
            time_remaining: query::time_remaining(&self.world),
            play_state: query::play_state(&self.world),
            current_task: self.tasks.current().cloned(),
            target: self.current_target(),
            completed_tasks: self.tasks.completed_count(),
            total_tasks: self.tasks.len(),
            path: self.path.clone(),
            message: self.message,
            npcs: self.npcs.snapshots(),
            stats: self.stats,
            map_events: query::active_map_events(&self.world),
            holds_key: self.effects.holds_key(),
            movement_cost_multiplier: self.movement_cost_multiplier(),
        }
    }

    /// Advisory movement cost combining rain and the booster.
    #[must_use]
    pub fn movement_cost_multiplier(&self) -> f32 {
        query::rain_intensity(&self.world) / self.effects.speed_multiplier()
    }

    /// Exploration statistics of the most recent searches.
    #[must_use]
    pub const fn algorithm_stats(&self) -> AlgorithmStats {
        self.stats
    }

    /// Authoritative world state.
    #[must_use]
    pub const fn world(&self) -> &World {
        &self.world
    }

    /// Navigation graph used for the player's searches.
    #[must_use]
    pub const fn graph(&self) -> &NavigationGraph {
        &self.player_graph
    }

    /// NPCs on campus.
    #[must_use]
    pub const fn npcs(&self) -> &Npcs {
        &self.npcs
    }

    /// Task registry.
    #[must_use]
    pub const fn tasks(&self) -> &TaskRegistry {
        &self.tasks
    }

    /// Tile effect state.
    #[must_use]
    pub const fn effects(&self) -> &TileEffects {
        &self.effects
    }

    /// Most recent task completion.
    #[must_use]
    pub const fn last_completion(&self) -> Option<&Completion> {
        self.last_completion.as_ref()
    }

    fn current_target(&self) -> Option<CellCoord> {
        let task = self.tasks.current()?;
        query::building(&self.world, &task.building)
    }

    fn dispatch(&mut self, command: Command) -> Vec<Event> {
        let mut log = Vec::new();
        let mut pending = vec![command];

        for _ in 0..MAX_DISPATCH_ROUNDS {
            if pending.is_empty() {
                break;
            }
            let mut events = Vec::new();
            for command in pending.drain(..) {
                world::apply(&mut self.world, command, &mut events);
            }
            self.sync_graphs(&events);
            pending = self.react(&events);
            log.extend(events);
        }

        log
    }

    fn sync_graphs(&mut self, events: &[Event]) {
        let Some(generation) = events.iter().rev().find_map(|event| match event {
            Event::TileLayerChanged { generation } => Some(*generation),
            _ => None,
        }) else {
            return;
        };
        debug!(generation, "rebuilding navigation graphs");
        self.npc_graph = build_graph(&self.world, Capability::NONE);
        self.player_graph = build_graph(&self.world, self.effects.capability());
        self.effects.discover_portals(query::tile_view(&self.world));
    }

    fn react(&mut self, events: &[Event]) -> Vec<Command> {
        let mut out = Vec::new();

        if let Some(message) =
            self.effects
                .handle(events, query::tile_view(&self.world), &mut out)
        {
            self.message = Some(message);
        }
        // Picking up the key changes what the player may walk on.
        if self.player_graph.capability() != self.effects.capability() {
            self.player_graph = build_graph(&self.world, self.effects.capability());
        }

        let player = query::player_cell(&self.world);
        self.npcs.handle(events, player, &self.npc_graph);

        if let Some(completion) =
            self.tasks
                .handle(events, query::buildings(&self.world), &mut self.rng, &mut out)
        {
            self.path = None;
            self.last_completion = Some(completion);
        }

        if let Some(scheduler) = &mut self.scheduler {
            scheduler.handle(events, query::tile_view(&self.world), &[player], &mut out);
        }

        out
    }
}

fn build_graph(world: &World, capability: Capability) -> NavigationGraph {
    NavigationGraph::build(
        query::grid_view(world),
        Some(query::tile_view(world)),
        capability,
        query::tile_generation(world),
    )
}
