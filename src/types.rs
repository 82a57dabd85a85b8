//! Core types for the activity track model
//!
//! This module defines the normalized track that the synthesizer produces and
//! the accumulators read: geographic points, classified samples, the track
//! itself, statistic ranges and the exclusion signal.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TrackError;

/// A geographic fix with optional altitude
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude (degrees, signed)
    pub latitude: f64,
    /// Longitude (degrees, signed)
    pub longitude: f64,
    /// Altitude (meters)
    pub altitude: Option<f64>,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            altitude: None,
        }
    }

    pub fn with_altitude(latitude: f64, longitude: f64, altitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            altitude: Some(altitude),
        }
    }

    /// Build a point from a raw provider fix.
    ///
    /// Providers report a missing fix as the literal origin, so `(0, 0)`
    /// yields `None` rather than a point in the Gulf of Guinea.
    pub fn from_fix(latitude: f64, longitude: f64, altitude: Option<f64>) -> Option<Self> {
        if latitude == 0.0 && longitude == 0.0 {
            return None;
        }
        Some(Self {
            latitude,
            longitude,
            altitude,
        })
    }
}

/// Structural classification of a sample within a track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleKind {
    Regular,
    Start,
    Pause,
    Resume,
    End,
}

/// One classified point-in-time observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Absolute instant of the observation
    pub timestamp: DateTime<Utc>,
    /// Position fix, absent when the provider had none
    pub location: Option<GeoPoint>,
    /// Heart rate (bpm)
    pub heart_rate: Option<f64>,
    /// Cadence (rpm)
    pub cadence: Option<f64>,
    /// Power (watts)
    pub power: Option<f64>,
    /// Temperature (celsius)
    pub temperature: Option<f64>,
    /// Structural tag
    pub kind: SampleKind,
}

impl Sample {
    /// A sample carrying only a timestamp and a tag
    pub fn new(timestamp: DateTime<Utc>, kind: SampleKind) -> Self {
        Self {
            timestamp,
            location: None,
            heart_rate: None,
            cadence: None,
            power: None,
            temperature: None,
            kind,
        }
    }

    pub fn with_location(mut self, location: GeoPoint) -> Self {
        self.location = Some(location);
        self
    }

    pub fn is_pause(&self) -> bool {
        self.kind == SampleKind::Pause
    }

    /// Altitude of this sample's fix, if any
    pub fn altitude(&self) -> Option<f64> {
        self.location.and_then(|l| l.altitude)
    }
}

/// The ordered samples of one activity.
///
/// Tracks are only built by the synthesizer and are read-only afterwards;
/// recomputing a track means synthesizing it again from fresh streams.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityTrack {
    activity_id: String,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    stationary: bool,
    samples: Vec<Sample>,
}

impl ActivityTrack {
    pub(crate) fn new(
        activity_id: String,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        stationary: bool,
        samples: Vec<Sample>,
    ) -> Self {
        Self {
            activity_id,
            start,
            end,
            stationary,
            samples,
        }
    }

    pub fn activity_id(&self) -> &str {
        &self.activity_id
    }

    /// Activity start instant
    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// Activity end instant
    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// True when the activity has too few located samples, or no streams at all
    pub fn is_stationary(&self) -> bool {
        self.stationary
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Samples covered by a caller range, validated like any statistic query
    pub fn samples_in(&self, range: StatisticRange) -> Result<&[Sample], TrackError> {
        match StatisticRange::resolve(Some(range), self)? {
            Some(r) => Ok(self.slice(r)),
            None => Ok(&[]),
        }
    }

    /// Samples covered by a resolved range; empty when out of bounds
    pub(crate) fn slice(&self, range: StatisticRange) -> &[Sample] {
        self.samples.get(range.start..=range.end).unwrap_or(&[])
    }

    /// Number of samples carrying a location fix
    pub fn located_count(&self) -> usize {
        self.samples.iter().filter(|s| s.location.is_some()).count()
    }
}

/// Inclusive range of sample indices within one track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatisticRange {
    pub start: usize,
    pub end: usize,
}

impl StatisticRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Resolve an optional caller range against a track.
    ///
    /// `None` covers the whole track. Returns `Ok(None)` for an empty track
    /// queried without a range.
    pub fn resolve(
        range: Option<StatisticRange>,
        track: &ActivityTrack,
    ) -> Result<Option<StatisticRange>, TrackError> {
        let sample_count = track.len();
        match range {
            None if sample_count == 0 => Ok(None),
            None => Ok(Some(StatisticRange::new(0, sample_count - 1))),
            Some(r) if r.start <= r.end && r.end < sample_count => Ok(Some(r)),
            Some(r) => Err(TrackError::InvalidRange {
                start: r.start,
                end: r.end,
                sample_count,
            }),
        }
    }

    /// Number of samples covered, zero for a reversed range
    pub(crate) fn len(&self) -> usize {
        if self.end < self.start {
            return 0;
        }
        self.end - self.start + 1
    }
}

/// A scalar computed over a range of a track
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccumulatedStatistic<T> {
    pub value: T,
    /// Range the value was computed over, `None` for an empty track
    pub range: Option<StatisticRange>,
}

/// Signal that an activity cannot be processed further.
///
/// Not an error: the batch skips this activity and continues.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exclusion {
    pub activity_id: String,
    pub reason: String,
}

impl Exclusion {
    pub fn new(activity_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            activity_id: activity_id.into(),
            reason: reason.into(),
        }
    }
}

/// Outcome of track synthesis
#[derive(Debug, Clone, PartialEq)]
pub enum Synthesis {
    Track(ActivityTrack),
    Excluded(Exclusion),
}

impl Synthesis {
    pub fn track(self) -> Option<ActivityTrack> {
        match self {
            Synthesis::Track(track) => Some(track),
            Synthesis::Excluded(_) => None,
        }
    }

    pub fn is_excluded(&self) -> bool {
        matches!(self, Synthesis::Excluded(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn track_of(len: usize) -> ActivityTrack {
        let t0 = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
        let samples = (0..len)
            .map(|i| Sample::new(t0 + chrono::Duration::seconds(i as i64), SampleKind::Regular))
            .collect();
        ActivityTrack::new("a".to_string(), t0, t0, false, samples)
    }

    #[test]
    fn test_origin_fix_is_absent() {
        assert!(GeoPoint::from_fix(0.0, 0.0, Some(12.0)).is_none());
        assert!(GeoPoint::from_fix(0.0, 1.0, None).is_some());
        assert!(GeoPoint::from_fix(-0.0, 0.0, None).is_none());
    }

    #[test]
    fn test_resolve_defaults_to_whole_track() {
        let track = track_of(4);
        let range = StatisticRange::resolve(None, &track).unwrap().unwrap();
        assert_eq!(range, StatisticRange::new(0, 3));
        assert_eq!(range.len(), 4);
        assert_eq!(track.slice(range).len(), 4);
    }

    #[test]
    fn test_resolve_rejects_reversed_or_out_of_bounds() {
        let track = track_of(4);
        assert!(matches!(
            StatisticRange::resolve(Some(StatisticRange::new(3, 1)), &track),
            Err(TrackError::InvalidRange { .. })
        ));
        assert!(matches!(
            StatisticRange::resolve(Some(StatisticRange::new(0, 4)), &track),
            Err(TrackError::InvalidRange { sample_count: 4, .. })
        ));
    }

    #[test]
    fn test_reversed_range_covers_nothing() {
        assert_eq!(StatisticRange::new(3, 1).len(), 0);
        assert_eq!(StatisticRange::new(2, 2).len(), 1);
    }

    #[test]
    fn test_samples_in_validates_range() {
        let track = track_of(1);
        assert!(matches!(
            track.samples_in(StatisticRange::new(0, 5)),
            Err(TrackError::InvalidRange { end: 5, sample_count: 1, .. })
        ));
        assert!(track.samples_in(StatisticRange::new(1, 0)).is_err());
        assert_eq!(track.samples_in(StatisticRange::new(0, 0)).unwrap().len(), 1);
        assert!(track.slice(StatisticRange::new(0, 5)).is_empty());
    }

    #[test]
    fn test_resolve_empty_track() {
        let track = track_of(0);
        assert_eq!(StatisticRange::resolve(None, &track).unwrap(), None);
    }
}
