//! Tunables for a play session.

use std::time::Duration;

use campus_runner_system_map_events::{DEFAULT_EVENT_INTERVAL, DEFAULT_FIRST_EVENT_DELAY};
use campus_runner_world::DEFAULT_TIME_LIMIT;

/// Configuration parameters required to start a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    time_limit: Duration,
    rng_seed: u64,
    map_events: bool,
    first_event_delay: Duration,
    event_interval: Duration,
    npcs: bool,
}

impl SessionConfig {
    /// Creates a configuration with the provided clock and seed and every
    /// optional system enabled.
    #[must_use]
    pub const fn new(time_limit: Duration, rng_seed: u64) -> Self {
        Self {
            time_limit,
            rng_seed,
            map_events: true,
            first_event_delay: DEFAULT_FIRST_EVENT_DELAY,
            event_interval: DEFAULT_EVENT_INTERVAL,
            npcs: true,
        }
    }

    /// Enables or disables random map events.
    #[must_use]
    pub const fn with_map_events(mut self, enabled: bool) -> Self {
        self.map_events = enabled;
        self
    }

    /// Overrides when the first map event fires and how often later ones follow.
    #[must_use]
    pub const fn with_event_timing(mut self, first_delay: Duration, interval: Duration) -> Self {
        self.first_event_delay = first_delay;
        self.event_interval = interval;
        self
    }

    /// Enables or disables the NPC roster.
    #[must_use]
    pub const fn with_npcs(mut self, enabled: bool) -> Self {
        self.npcs = enabled;
        self
    }

    /// Length of the session clock.
    #[must_use]
    pub const fn time_limit(&self) -> Duration {
        self.time_limit
    }

    /// Seed shared by every random choice in the session.
    #[must_use]
    pub const fn rng_seed(&self) -> u64 {
        self.rng_seed
    }

    /// Whether map events are generated.
    #[must_use]
    pub const fn map_events(&self) -> bool {
        self.map_events
    }

    /// Delay before the first map event.
    #[must_use]
    pub const fn first_event_delay(&self) -> Duration {
        self.first_event_delay
    }

    /// Delay between map events.
    #[must_use]
    pub const fn event_interval(&self) -> Duration {
        self.event_interval
    }

    /// Whether NPCs are spawned.
    #[must_use]
    pub const fn npcs(&self) -> bool {
        self.npcs
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new(DEFAULT_TIME_LIMIT, 0)
    }
}
