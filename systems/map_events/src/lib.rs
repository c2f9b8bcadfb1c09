#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Seeded generator for construction, rain and fire-drill map events.

use std::time::Duration;

use campus_runner_core::{CellCoord, Command, Direction, Event, MapEvent, TileKind, TileLayerView};
use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::info;

/// Delay before the first event of a session.
pub const DEFAULT_FIRST_EVENT_DELAY: Duration = Duration::from_secs(15);

/// Delay between consecutive events.
pub const DEFAULT_EVENT_INTERVAL: Duration = Duration::from_secs(20);

const MAX_CONSTRUCTION_CELLS: usize = 4;
const MAX_FIRE_DRILL_CELLS: usize = 5;
const NEIGHBOR_SPREAD_PROBABILITY: f64 = 0.5;

/// Configuration parameters required to construct the map event scheduler.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    first_delay: Duration,
    interval: Duration,
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided cadence and seed.
    #[must_use]
    pub const fn new(first_delay: Duration, interval: Duration, rng_seed: u64) -> Self {
        Self {
            first_delay,
            interval,
            rng_seed,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_FIRST_EVENT_DELAY, DEFAULT_EVENT_INTERVAL, 0)
    }
}

/// Pure system that turns elapsed time into `StartMapEvent` commands.
#[derive(Debug)]
pub struct MapEventScheduler {
    interval: Duration,
    elapsed: Duration,
    next_at: Duration,
    rng: ChaCha8Rng,
}

impl MapEventScheduler {
    /// Creates a scheduler using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            interval: config.interval,
            elapsed: Duration::ZERO,
            next_at: config.first_delay,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Consumes world events and emits a map event whenever one is due.
    ///
    /// Cells listed in `avoid` (usually the player's cell) are never picked
    /// for construction or a fire drill.
    pub fn handle(
        &mut self,
        events: &[Event],
        tiles: TileLayerView<'_>,
        avoid: &[CellCoord],
        out: &mut Vec<Command>,
    ) {
        for event in events {
            let Event::TimeAdvanced { dt } = event else {
                continue;
            };
            self.elapsed = self.elapsed.saturating_add(*dt);
            if self.elapsed < self.next_at {
                continue;
            }
            self.next_at = self.elapsed.saturating_add(self.interval);

            if let Some(map_event) = self.generate(tiles, avoid) {
                info!(
                    kind = ?map_event.kind(),
                    cells = map_event.cells().len(),
                    duration_secs = map_event.duration().as_secs(),
                    "map event scheduled"
                );
                out.push(Command::StartMapEvent { event: map_event });
            }
        }
    }

    /// Generates a random map event for the current tile layer.
    ///
    /// Returns `None` when the layer has no free normal cell to build on.
    pub fn generate(&mut self, tiles: TileLayerView<'_>, avoid: &[CellCoord]) -> Option<MapEvent> {
        let candidates: Vec<CellCoord> = tiles
            .cells_of_kind(TileKind::Normal)
            .filter(|cell| !avoid.contains(cell))
            .collect();
        if candidates.is_empty() {
            return None;
        }

        let event = match self.rng.gen_range(0..3) {
            0 => {
                let center = *candidates.choose(&mut self.rng)?;
                let mut cells = vec![center];
                for direction in Direction::ALL {
                    if !self.rng.gen_bool(NEIGHBOR_SPREAD_PROBABILITY) {
                        continue;
                    }
                    let Some(neighbor) = center.step(direction) else {
                        continue;
                    };
                    if candidates.contains(&neighbor) {
                        cells.push(neighbor);
                    }
                }
                cells.truncate(MAX_CONSTRUCTION_CELLS);
                MapEvent::Construction {
                    cells,
                    duration: Duration::from_secs(self.rng.gen_range(15..=30)),
                }
            }
            1 => MapEvent::Rain {
                duration: Duration::from_secs(self.rng.gen_range(15..=25)),
            },
            _ => {
                let cells = candidates
                    .choose_multiple(&mut self.rng, MAX_FIRE_DRILL_CELLS)
                    .copied()
                    .collect();
                MapEvent::FireDrill {
                    cells,
                    duration: Duration::from_secs(self.rng.gen_range(20..=30)),
                }
            }
        };
        Some(event)
    }
}
