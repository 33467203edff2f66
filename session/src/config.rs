//! Session configuration loaded from TOML.

use std::time::Duration;

use serde::Deserialize;
use word_defence_system_spawning::SpawnTuning;

/// Seed used when the configuration does not name one.
const DEFAULT_SEED: u64 = 0x5eed_c0de;

/// Tunable parameters of a play session.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// Seed for the spawn scheduler's random number generator.
    pub seed: u64,
    /// Overrides the delay before wave and level transitions, in milliseconds.
    pub transition_delay_ms: Option<u64>,
    /// Spawn cadence, population and placement tuning.
    pub spawn: SpawnTuning,
}

impl SessionConfig {
    /// Delay override requested by the configuration.
    #[must_use]
    pub fn transition_delay(&self) -> Option<Duration> {
        self.transition_delay_ms.map(Duration::from_millis)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            transition_delay_ms: None,
            spawn: SpawnTuning::default(),
        }
    }
}
