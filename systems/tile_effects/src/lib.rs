#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Tile effect processor tracking slides, boosts, traps, portals and the key.

use std::{collections::HashSet, fmt, time::Duration};

use campus_runner_core::{
    Capability, CellCoord, Command, Direction, Event, TileKind, TileLayerView,
};
use tracing::debug;

/// How long a booster keeps the player fast.
pub const BOOSTER_DURATION: Duration = Duration::from_secs(3);

/// Movement speed multiplier while a booster is active.
pub const BOOSTER_SPEED_MULTIPLIER: f32 = 2.0;

/// Informational message produced by stepping on a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EffectMessage {
    /// The player started sliding on ice.
    Ice,
    /// A trap fired and cost the player time.
    Trap {
        /// Time deducted from the clock.
        penalty: Duration,
    },
    /// A booster sped the player up.
    SpeedBoost,
    /// A portal moved the player to its counterpart.
    Teleport,
    /// The player picked up the gate key.
    KeyAcquired,
    /// The player entered grass.
    Grass,
    /// The player entered water.
    Water,
}

impl fmt::Display for EffectMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ice => f.write_str("ICE!"),
            Self::Trap { penalty } => write!(f, "TRAP! -{}s", penalty.as_secs()),
            Self::SpeedBoost => f.write_str("SPEED BOOST!"),
            Self::Teleport => f.write_str("TELEPORT!"),
            Self::KeyAcquired => f.write_str("KEY ACQUIRED!"),
            Self::Grass => f.write_str("Grass slows you..."),
            Self::Water => f.write_str("Water slows you down..."),
        }
    }
}

/// Advisory outcome of stepping onto a tile.
///
/// The processor never applies these outputs itself; the caller relocates the
/// player, deducts time and shows the message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileEffect {
    /// Where the player should end up.
    pub position: CellCoord,
    /// Time to deduct from the session clock.
    pub time_penalty: Duration,
    /// Message describing the effect, if any.
    pub message: Option<EffectMessage>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Slide {
    direction: Direction,
    remaining: u32,
}

/// Session-scoped tile effect state.
#[derive(Clone, Debug, Default)]
pub struct TileEffects {
    portal_a: Option<CellCoord>,
    portal_b: Option<CellCoord>,
    holds_key: bool,
    slide: Option<Slide>,
    landing: Option<(CellCoord, Direction)>,
    booster_remaining: Option<Duration>,
    triggered_traps: HashSet<CellCoord>,
}

impl TileEffects {
    /// Creates a processor with no portals configured.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the portal locations. Portals without a counterpart are inert.
    pub fn set_portals(&mut self, portal_a: Option<CellCoord>, portal_b: Option<CellCoord>) {
        self.portal_a = portal_a;
        self.portal_b = portal_b;
    }

    /// Reads the first portal of each kind from the tile layer.
    pub fn discover_portals(&mut self, tiles: TileLayerView<'_>) {
        self.set_portals(
            tiles.cells_of_kind(TileKind::PortalA).next(),
            tiles.cells_of_kind(TileKind::PortalB).next(),
        );
    }

    /// Computes the effect of the player arriving on `cell` of `kind` while
    /// moving in `direction`.
    pub fn process(&mut self, cell: CellCoord, kind: TileKind, direction: Direction) -> TileEffect {
        let mut effect = TileEffect {
            position: cell,
            time_penalty: Duration::ZERO,
            message: None,
        };

        match kind {
            TileKind::Ice => {
                if let Some(remaining) = kind.slide_distance() {
                    self.slide = Some(Slide {
                        direction,
                        remaining,
                    });
                    effect.message = Some(EffectMessage::Ice);
                }
            }
            TileKind::Trap => {
                if let Some(penalty) = kind.time_penalty() {
                    if self.triggered_traps.insert(cell) {
                        effect.time_penalty = penalty;
                        effect.message = Some(EffectMessage::Trap { penalty });
                    }
                }
            }
            TileKind::Booster => {
                self.booster_remaining = Some(BOOSTER_DURATION);
                effect.message = Some(EffectMessage::SpeedBoost);
            }
            TileKind::PortalA => {
                if let Some(target) = self.portal_b {
                    effect.position = target;
                    effect.message = Some(EffectMessage::Teleport);
                }
            }
            TileKind::PortalB => {
                if let Some(target) = self.portal_a {
                    effect.position = target;
                    effect.message = Some(EffectMessage::Teleport);
                }
            }
            TileKind::Key => {
                self.holds_key = true;
                effect.message = Some(EffectMessage::KeyAcquired);
            }
            TileKind::Grass => effect.message = Some(EffectMessage::Grass),
            TileKind::Water => effect.message = Some(EffectMessage::Water),
            TileKind::Normal | TileKind::Wall | TileKind::LockedGate | TileKind::Construction => {}
        }

        if let Some(message) = effect.message {
            debug!(%cell, ?kind, %message, "tile effect triggered");
        }
        effect
    }

    /// Counts the booster down by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        if let Some(remaining) = self.booster_remaining {
            let remaining = remaining.saturating_sub(dt);
            self.booster_remaining = (!remaining.is_zero()).then_some(remaining);
        }
    }

    /// Moves an active slide one cell further.
    ///
    /// The next cell is checked with `is_walkable` before moving; an obstacle
    /// ends the slide early. Returns the new position when the player moved.
    pub fn continue_slide<F>(&mut self, position: CellCoord, is_walkable: F) -> Option<CellCoord>
    where
        F: Fn(CellCoord) -> bool,
    {
        self.landing = None;
        let slide = self.slide?;
        let next = position
            .step(slide.direction)
            .filter(|cell| is_walkable(*cell));

        let Some(next) = next else {
            self.slide = None;
            return None;
        };

        let remaining = slide.remaining.saturating_sub(1);
        self.slide = (remaining > 0).then_some(Slide {
            direction: slide.direction,
            remaining,
        });
        self.landing = Some((next, slide.direction));
        Some(next)
    }

    /// Reacts to world events and proposes the commands that apply tile effects.
    ///
    /// Player steps and relocations onto the cell of the last slide step are
    /// processed; other relocations such as portal jumps are not. Returns the
    /// message of the last effect that produced one.
    pub fn handle(
        &mut self,
        events: &[Event],
        tiles: TileLayerView<'_>,
        out: &mut Vec<Command>,
    ) -> Option<EffectMessage> {
        let mut latest = None;
        for event in events {
            let (cell, direction) = match event {
                Event::TimeAdvanced { dt } => {
                    self.advance(*dt);
                    continue;
                }
                Event::PlayerMoved { to, direction, .. } => (*to, *direction),
                Event::PlayerRelocated { to, .. } => match self.landing {
                    Some((landing, direction)) if landing == *to => {
                        self.landing = None;
                        (*to, direction)
                    }
                    _ => continue,
                },
                _ => continue,
            };
            let Some(kind) = tiles.kind(cell) else {
                continue;
            };

            let effect = self.process(cell, kind, direction);
            if effect.position != cell {
                out.push(Command::RelocatePlayer {
                    cell: effect.position,
                });
            }
            if !effect.time_penalty.is_zero() {
                out.push(Command::ApplyTimePenalty {
                    penalty: effect.time_penalty,
                });
            }
            if effect.message.is_some() {
                latest = effect.message;
            }
        }
        latest
    }

    /// Capability granted by the effects collected so far.
    #[must_use]
    pub const fn capability(&self) -> Capability {
        Capability::from_key_flag(self.holds_key)
    }

    /// Reports whether the player picked up the key.
    #[must_use]
    pub const fn holds_key(&self) -> bool {
        self.holds_key
    }

    /// Reports whether an ice slide is still in progress.
    #[must_use]
    pub const fn is_sliding(&self) -> bool {
        self.slide.is_some()
    }

    /// Current movement speed multiplier.
    #[must_use]
    pub fn speed_multiplier(&self) -> f32 {
        if self.booster_remaining.is_some() {
            BOOSTER_SPEED_MULTIPLIER
        } else {
            1.0
        }
    }

    /// Reports whether the trap at `cell` already fired this session.
    #[must_use]
    pub fn trap_triggered(&self, cell: CellCoord) -> bool {
        self.triggered_traps.contains(&cell)
    }
}
