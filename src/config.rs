//! Processing thresholds
//!
//! Thresholds shared by the synthesizer and the accumulators. The defaults
//! reproduce the reference statistics exactly; override them only for
//! experiments.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::TrackError;

/// Gap between consecutive samples above which the segment counts as paused
pub const IMPLICIT_PAUSE_SECS: i64 = 65;

/// Minimum samples in a range before moving time can be computed
pub const MIN_MOVING_SAMPLES: usize = 3;

/// Minimum located samples for a track not to be considered stationary
pub const MIN_USABLE_POINTS: usize = 2;

/// Thresholds used while synthesizing and measuring a track
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackConfig {
    /// Implicit pause threshold (seconds)
    pub implicit_pause_secs: i64,
    /// Minimum samples required by the moving-time accumulator
    pub min_moving_samples: usize,
    /// Minimum located samples for a non-stationary track
    pub min_usable_points: usize,
}

impl Default for TrackConfig {
    fn default() -> Self {
        Self {
            implicit_pause_secs: IMPLICIT_PAUSE_SECS,
            min_moving_samples: MIN_MOVING_SAMPLES,
            min_usable_points: MIN_USABLE_POINTS,
        }
    }
}

impl TrackConfig {
    /// Implicit pause threshold as a duration
    pub fn implicit_pause(&self) -> Duration {
        Duration::seconds(self.implicit_pause_secs)
    }

    /// Load a configuration from JSON; missing keys keep their defaults
    pub fn from_json(json: &str) -> Result<Self, TrackError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Save the configuration as JSON
    pub fn to_json(&self) -> Result<String, TrackError> {
        serde_json::to_string_pretty(self).map_err(|e| TrackError::EncodingError(e.to_string()))
    }
}
