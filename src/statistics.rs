//! Activity statistics
//!
//! Populates a generic statistics record from a synthesized track:
//! - distance and moving time from the accumulators
//! - elapsed time from the activity bounds
//! - avg/min/max summaries of the physiological and environmental channels
//! - elevation range with cumulative gain and loss

use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::TrackConfig;
use crate::distance::DistanceAccumulator;
use crate::error::TrackError;
use crate::moving_time::MovingTimeAccumulator;
use crate::types::ActivityTrack;

/// Unit of a statistic value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatisticUnit {
    Meters,
    Seconds,
    BeatsPerMinute,
    RevolutionsPerMinute,
    Watts,
    DegreesCelsius,
}

/// One statistic; fields not meaningful for it stay empty
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityStatistic {
    pub unit: StatisticUnit,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gain: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loss: Option<f64>,
}

impl ActivityStatistic {
    pub fn empty(unit: StatisticUnit) -> Self {
        Self {
            unit,
            value: None,
            avg: None,
            min: None,
            max: None,
            gain: None,
            loss: None,
        }
    }

    pub fn with_value(unit: StatisticUnit, value: f64) -> Self {
        Self {
            value: Some(value),
            ..Self::empty(unit)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_none()
            && self.avg.is_none()
            && self.min.is_none()
            && self.max.is_none()
            && self.gain.is_none()
            && self.loss.is_none()
    }
}

/// Statistics record for one activity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityStatistics {
    pub distance: ActivityStatistic,
    pub moving_time: ActivityStatistic,
    pub elapsed_time: ActivityStatistic,
    pub heart_rate: ActivityStatistic,
    pub cadence: ActivityStatistic,
    pub power: ActivityStatistic,
    pub temperature: ActivityStatistic,
    pub elevation: ActivityStatistic,
}

/// Conditions raised while computing statistics that leave a field empty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatisticSignal {
    /// Too few samples for moving time
    InsufficientSamples,
    /// The whole track produced no moving time
    ZeroDuration,
}

/// Statistics plus the signals raised while computing them
#[derive(Debug, Clone, PartialEq)]
pub struct StatisticsOutcome {
    pub statistics: ActivityStatistics,
    pub signals: Vec<StatisticSignal>,
}

/// Computes the statistics record for whole tracks
#[derive(Debug, Clone, Default)]
pub struct StatisticsCalculator {
    distance: DistanceAccumulator,
    moving_time: MovingTimeAccumulator,
}

impl StatisticsCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: &TrackConfig) -> Self {
        Self {
            distance: DistanceAccumulator::with_config(config),
            moving_time: MovingTimeAccumulator::with_config(config),
        }
    }

    /// Compute statistics over the whole track
    pub fn compute(&self, track: &ActivityTrack) -> Result<StatisticsOutcome, TrackError> {
        let mut signals = Vec::new();

        let distance = if track.is_empty() {
            ActivityStatistic::empty(StatisticUnit::Meters)
        } else {
            let meters = self.distance.accumulate(track, None)?.value;
            ActivityStatistic::with_value(StatisticUnit::Meters, meters)
        };

        let moving_time = match self.moving_time.accumulate(track, None) {
            Ok(stat) => {
                let secs = stat.value.num_milliseconds() as f64 / 1000.0;
                ActivityStatistic::with_value(StatisticUnit::Seconds, secs)
            }
            Err(TrackError::InsufficientSamples { .. }) => {
                signals.push(StatisticSignal::InsufficientSamples);
                ActivityStatistic::empty(StatisticUnit::Seconds)
            }
            Err(TrackError::ZeroDuration { .. }) => {
                signals.push(StatisticSignal::ZeroDuration);
                ActivityStatistic::empty(StatisticUnit::Seconds)
            }
            Err(e) => return Err(e),
        };

        let elapsed_secs = (track.end() - track.start()).num_milliseconds() as f64 / 1000.0;
        let samples = track.samples();

        let statistics = ActivityStatistics {
            distance,
            moving_time,
            elapsed_time: ActivityStatistic::with_value(StatisticUnit::Seconds, elapsed_secs),
            heart_rate: avg_max(
                StatisticUnit::BeatsPerMinute,
                samples.iter().filter_map(|s| s.heart_rate),
            ),
            cadence: avg_max(
                StatisticUnit::RevolutionsPerMinute,
                samples.iter().filter_map(|s| s.cadence),
            ),
            power: avg_max(StatisticUnit::Watts, samples.iter().filter_map(|s| s.power)),
            temperature: summarize(
                StatisticUnit::DegreesCelsius,
                samples.iter().filter_map(|s| s.temperature),
            ),
            elevation: elevation(samples.iter().filter_map(|s| s.altitude())),
        };

        debug!(
            "Statistics for {}: distance {:?} m, moving {:?} s, signals {:?}",
            track.activity_id(),
            statistics.distance.value,
            statistics.moving_time.value,
            signals
        );

        Ok(StatisticsOutcome {
            statistics,
            signals,
        })
    }
}

/// Average, minimum and maximum in iteration order
fn summarize(unit: StatisticUnit, values: impl Iterator<Item = f64>) -> ActivityStatistic {
    let mut stat = ActivityStatistic::empty(unit);
    let mut sum = 0.0;
    let mut count = 0usize;

    for v in values {
        sum += v;
        count += 1;
        stat.min = Some(stat.min.map_or(v, |m| m.min(v)));
        stat.max = Some(stat.max.map_or(v, |m| m.max(v)));
    }

    if count > 0 {
        stat.avg = Some(sum / count as f64);
    }
    stat
}

fn avg_max(unit: StatisticUnit, values: impl Iterator<Item = f64>) -> ActivityStatistic {
    ActivityStatistic {
        min: None,
        ..summarize(unit, values)
    }
}

/// Altitude range with cumulative gain and loss between consecutive readings
fn elevation(altitudes: impl Iterator<Item = f64>) -> ActivityStatistic {
    let mut stat = ActivityStatistic::empty(StatisticUnit::Meters);
    let mut previous: Option<f64> = None;
    let mut gain = 0.0;
    let mut loss = 0.0;

    for alt in altitudes {
        if let Some(prev) = previous {
            let delta = alt - prev;
            if delta > 0.0 {
                gain += delta;
            } else {
                loss -= delta;
            }
        }
        stat.min = Some(stat.min.map_or(alt, |m| m.min(alt)));
        stat.max = Some(stat.max.map_or(alt, |m| m.max(alt)));
        previous = Some(alt);
    }

    if previous.is_some() {
        stat.gain = Some(gain);
        stat.loss = Some(loss);
    }
    stat
}
