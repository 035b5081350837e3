//! Tunables for the gather and comprehension drills.
//!
//! The defaults reproduce the classic exercise timing: one second of wall time
//! per unit of random delay, one second between generated values, ten values
//! per drain and four concurrent drains. Tests and demos shrink the time scale
//! to keep runs short without changing any of the concurrency properties.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Upper bound used by the free-function shortcuts for random delays.
pub const DEFAULT_MAX_DELAY: f64 = 10.0;

/// Runtime configuration.
///
/// Durations are (de)serialized as whole milliseconds. Missing fields fall
/// back to their defaults.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Wall time spent suspended per unit of drawn delay.
    #[serde(rename = "time_unit_ms", with = "millis")]
    pub time_unit: Duration,

    /// Pause before each value of the periodic generator.
    #[serde(rename = "tick_ms", with = "millis")]
    pub tick: Duration,

    /// Number of values produced by one generator.
    pub values_per_drain: usize,

    /// Number of drains run concurrently by the runtime measurement.
    pub drains: usize,

    /// Upper bound of generated values.
    pub value_bound: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            time_unit: Duration::from_secs(1),
            tick: Duration::from_secs(1),
            values_per_drain: 10,
            drains: 4,
            value_bound: 10.0,
        }
    }
}

impl Config {
    /// Parses a configuration from a JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_time_unit(mut self, time_unit: Duration) -> Self {
        self.time_unit = time_unit;
        self
    }

    pub fn with_tick(mut self, tick: Duration) -> Self {
        self.tick = tick;
        self
    }

    pub fn with_values_per_drain(mut self, values_per_drain: usize) -> Self {
        self.values_per_drain = values_per_drain;
        self
    }

    pub fn with_drains(mut self, drains: usize) -> Self {
        self.drains = drains;
        self
    }

    pub fn with_value_bound(mut self, value_bound: f64) -> Self {
        self.value_bound = value_bound;
        self
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        let millis = u64::try_from(value.as_millis()).unwrap_or(u64::MAX);
        serializer.serialize_u64(millis)
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
