//! Raw per-field activity streams
//!
//! Each stream is a parallel array indexed by sample position. Only the time
//! stream is authoritative for length and order; every other stream may be
//! absent, shorter than the time stream, or contain null entries.

use serde::{Deserialize, Serialize};

use crate::error::TrackError;

/// Fixed set of named, independently optional streams
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawStreams {
    /// Offsets from activity start (seconds)
    pub time: Option<Vec<f64>>,
    /// `[latitude, longitude]` pairs (degrees)
    pub latlng: Option<Vec<Option<[f64; 2]>>>,
    /// Altitude (meters)
    pub altitude: Option<Vec<Option<f64>>>,
    /// Heart rate (bpm)
    pub heartrate: Option<Vec<Option<f64>>>,
    /// Cadence (rpm)
    pub cadence: Option<Vec<Option<f64>>>,
    /// Power (watts)
    pub watts: Option<Vec<Option<f64>>>,
    /// Temperature (celsius)
    pub temp: Option<Vec<Option<f64>>>,
    /// Whether the athlete was resting at each sample
    pub resting: Option<Vec<Option<bool>>>,
}

impl RawStreams {
    /// Streams with only the time stream populated
    pub fn new(time: Vec<f64>) -> Self {
        Self {
            time: Some(time),
            ..Self::default()
        }
    }

    /// Parse one stream set from JSON
    pub fn from_json(json: &str) -> Result<Self, TrackError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_latlng(mut self, points: Vec<[f64; 2]>) -> Self {
        self.latlng = Some(points.into_iter().map(Some).collect());
        self
    }

    pub fn with_altitude(mut self, values: Vec<f64>) -> Self {
        self.altitude = Some(dense(values));
        self
    }

    pub fn with_heartrate(mut self, values: Vec<f64>) -> Self {
        self.heartrate = Some(dense(values));
        self
    }

    pub fn with_cadence(mut self, values: Vec<f64>) -> Self {
        self.cadence = Some(dense(values));
        self
    }

    pub fn with_watts(mut self, values: Vec<f64>) -> Self {
        self.watts = Some(dense(values));
        self
    }

    pub fn with_temp(mut self, values: Vec<f64>) -> Self {
        self.temp = Some(dense(values));
        self
    }

    pub fn with_resting(mut self, values: Vec<bool>) -> Self {
        self.resting = Some(values.into_iter().map(Some).collect());
        self
    }

    /// Validated time offsets.
    ///
    /// Fails when the time stream is absent, or when an offset is non-finite
    /// or earlier than its predecessor.
    pub fn time_offsets(&self, activity_id: &str) -> Result<&[f64], TrackError> {
        let time = self
            .time
            .as_deref()
            .ok_or_else(|| TrackError::MissingTimeStream {
                activity_id: activity_id.to_string(),
            })?;

        let mut previous = f64::NEG_INFINITY;
        for (idx, &offset) in time.iter().enumerate() {
            if !offset.is_finite() {
                return Err(malformed_time(activity_id, idx, "offset is not finite"));
            }
            if offset < previous {
                return Err(malformed_time(activity_id, idx, "offset decreases"));
            }
            previous = offset;
        }
        Ok(time)
    }

    /// Whether a resting stream with at least one entry was fetched
    pub fn has_resting(&self) -> bool {
        self.resting.as_ref().is_some_and(|r| !r.is_empty())
    }

    pub fn latlng_at(&self, idx: usize) -> Option<[f64; 2]> {
        value_at(&self.latlng, idx)
    }

    pub fn altitude_at(&self, idx: usize) -> Option<f64> {
        value_at(&self.altitude, idx)
    }

    pub fn heartrate_at(&self, idx: usize) -> Option<f64> {
        value_at(&self.heartrate, idx)
    }

    pub fn cadence_at(&self, idx: usize) -> Option<f64> {
        value_at(&self.cadence, idx)
    }

    pub fn watts_at(&self, idx: usize) -> Option<f64> {
        value_at(&self.watts, idx)
    }

    pub fn temp_at(&self, idx: usize) -> Option<f64> {
        value_at(&self.temp, idx)
    }

    pub fn resting_at(&self, idx: usize) -> Option<bool> {
        value_at(&self.resting, idx)
    }
}

fn dense(values: Vec<f64>) -> Vec<Option<f64>> {
    values.into_iter().map(Some).collect()
}

/// Entry `idx` of an optional stream; absent when the stream is missing,
/// too short, or holds null there
fn value_at<T: Copy>(stream: &Option<Vec<Option<T>>>, idx: usize) -> Option<T> {
    stream.as_ref().and_then(|s| s.get(idx).copied().flatten())
}

fn malformed_time(activity_id: &str, idx: usize, message: &str) -> TrackError {
    TrackError::MalformedStream {
        activity_id: activity_id.to_string(),
        stream: "time",
        message: format!("{} at index {}", message, idx),
    }
}
