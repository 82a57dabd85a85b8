//! Distance accumulation
//!
//! Walks a range of a track and sums the geodetic distance between
//! consecutive located samples. Segments ending in a Pause, or following a
//! gap longer than the implicit pause threshold, are not counted. Samples
//! without a fix are skipped without breaking the walk.

use chrono::{DateTime, Duration, Utc};

use crate::config::TrackConfig;
use crate::error::TrackError;
use crate::geodesy::estimate_distance;
use crate::types::{AccumulatedStatistic, ActivityTrack, GeoPoint, Sample, StatisticRange};

/// Sums travelled distance over a track range
#[derive(Debug, Clone)]
pub struct DistanceAccumulator {
    implicit_pause: Duration,
}

impl Default for DistanceAccumulator {
    fn default() -> Self {
        Self::with_config(&TrackConfig::default())
    }
}

impl DistanceAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: &TrackConfig) -> Self {
        Self {
            implicit_pause: config.implicit_pause(),
        }
    }

    /// Distance in meters over `range`, or the whole track when `None`.
    ///
    /// Missing data only lowers the total; the sole error is an invalid range.
    pub fn accumulate(
        &self,
        track: &ActivityTrack,
        range: Option<StatisticRange>,
    ) -> Result<AccumulatedStatistic<f64>, TrackError> {
        let resolved = StatisticRange::resolve(range, track)?;
        let value = match resolved {
            Some(r) => self.sum(track.slice(r)),
            None => 0.0,
        };
        Ok(AccumulatedStatistic {
            value,
            range: resolved,
        })
    }

    fn sum(&self, samples: &[Sample]) -> f64 {
        let mut total = 0.0;
        // Carried across samples without altitude and across pauses
        let mut held_altitude: Option<f64> = None;
        let mut last_timestamp: Option<DateTime<Utc>> = None;
        let mut anchor: Option<&GeoPoint> = None;

        for sample in samples {
            let gap = last_timestamp.map(|t| sample.timestamp - t);
            last_timestamp = Some(sample.timestamp);

            if sample.is_pause() || gap.is_some_and(|g| g > self.implicit_pause) {
                anchor = None;
                continue;
            }

            let Some(location) = sample.location.as_ref() else {
                continue;
            };

            if let Some(previous) = anchor {
                held_altitude = previous.altitude.or(held_altitude);
                total += estimate_distance(previous, location, held_altitude);
            }
            anchor = Some(location);
        }

        total
    }
}
