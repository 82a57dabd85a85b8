//! Track synthesis
//!
//! Merges parallel, independently sparse field streams into one ordered
//! sequence of classified samples:
//! - the first sample is tagged Start and the last emitted sample End
//! - the resting stream drives an explicit Moving/Paused state machine that
//!   tags intermediate samples as Pause or Resume
//! - `(0, 0)` location fixes are dropped as provider sentinels
//!
//! The final raw time offset is never emitted as a sample; providers repeat
//! the last entry as a sentinel.

use chrono::{DateTime, Duration, Utc};
use log::{debug, warn};

use crate::config::TrackConfig;
use crate::error::TrackError;
use crate::schema::{ActivityHeader, RawStreams};
use crate::types::{ActivityTrack, Exclusion, GeoPoint, Sample, SampleKind, Synthesis};

/// Reason attached to activities without a single usable fix
pub const NO_LOCATION_REASON: &str = "No samples with usable location data";

/// Whether the athlete is currently moving, as reported by the resting stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MotionState {
    Moving,
    Paused,
}

impl MotionState {
    /// Classify an intermediate sample and return the state that follows it
    fn step(self, resting: Option<bool>) -> (SampleKind, MotionState) {
        match (self, resting) {
            (MotionState::Paused, Some(false)) => (SampleKind::Resume, MotionState::Moving),
            (_, Some(true)) => (SampleKind::Pause, MotionState::Paused),
            (state, _) => (SampleKind::Regular, state),
        }
    }
}

/// Builds activity tracks from raw streams
#[derive(Debug, Clone, Default)]
pub struct TrackSynthesizer {
    config: TrackConfig,
}

impl TrackSynthesizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: &TrackConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Synthesize a track from raw streams.
    ///
    /// Returns `Synthesis::Excluded` when no emitted sample carries a usable
    /// location. Missing or malformed time data is an error and produces no
    /// partial track.
    pub fn synthesize(
        &self,
        header: &ActivityHeader,
        streams: &RawStreams,
    ) -> Result<Synthesis, TrackError> {
        let activity_id = header.activity_id.as_str();
        let time = streams.time_offsets(activity_id)?;

        let emitted = time.len().saturating_sub(1);
        let last = emitted.saturating_sub(1);
        let has_resting = streams.has_resting();

        let mut state = MotionState::Moving;
        let mut samples = Vec::with_capacity(emitted);

        for (idx, &offset) in time.iter().take(emitted).enumerate() {
            let timestamp = offset_instant(header, offset)?;

            let location = streams.latlng_at(idx).and_then(|[lat, lng]| {
                GeoPoint::from_fix(lat, lng, streams.altitude_at(idx))
            });

            let kind = if idx == 0 {
                SampleKind::Start
            } else if idx == last {
                SampleKind::End
            } else if has_resting {
                let (kind, next) = state.step(streams.resting_at(idx));
                state = next;
                kind
            } else {
                SampleKind::Regular
            };

            samples.push(Sample {
                timestamp,
                location,
                heart_rate: streams.heartrate_at(idx),
                cadence: streams.cadence_at(idx),
                power: streams.watts_at(idx),
                temperature: streams.temp_at(idx),
                kind,
            });
        }

        let located = samples.iter().filter(|s| s.location.is_some()).count();
        if located == 0 {
            warn!(
                "Excluding activity {}: {} ({} samples)",
                activity_id,
                NO_LOCATION_REASON,
                samples.len()
            );
            return Ok(Synthesis::Excluded(Exclusion::new(
                activity_id,
                NO_LOCATION_REASON,
            )));
        }

        let end = match (header.end_time, time.last()) {
            (Some(end), _) => checked_end(header, end, samples.last().map(|s| s.timestamp))?,
            (None, Some(&offset)) => offset_instant(header, offset)?,
            (None, None) => header.start_time,
        };
        let stationary = located < self.config.min_usable_points;

        debug!(
            "Synthesized activity {}: {} samples, {} located, resting stream: {}",
            activity_id,
            samples.len(),
            located,
            has_resting
        );

        Ok(Synthesis::Track(ActivityTrack::new(
            activity_id.to_string(),
            header.start_time,
            end,
            stationary,
            samples,
        )))
    }

    /// Empty stationary track for an activity whose streams were never fetched
    pub fn stationary(&self, header: &ActivityHeader) -> Result<ActivityTrack, TrackError> {
        let end = match header.end_time {
            Some(end) => checked_end(header, end, None)?,
            None => header.start_time,
        };
        Ok(ActivityTrack::new(
            header.activity_id.clone(),
            header.start_time,
            end,
            true,
            Vec::new(),
        ))
    }
}

/// Header end instant, which may not precede the start or the last sample
fn checked_end(
    header: &ActivityHeader,
    end: DateTime<Utc>,
    last_sample: Option<DateTime<Utc>>,
) -> Result<DateTime<Utc>, TrackError> {
    let floor = last_sample.map_or(header.start_time, |t| t.max(header.start_time));
    if end < floor {
        return Err(TrackError::InvalidEndTime {
            activity_id: header.activity_id.clone(),
            message: format!("{} precedes {}", end.to_rfc3339(), floor.to_rfc3339()),
        });
    }
    Ok(end)
}

/// Absolute instant of a time offset (seconds, millisecond resolution)
fn offset_instant(header: &ActivityHeader, offset: f64) -> Result<DateTime<Utc>, TrackError> {
    let millis = (offset * 1000.0).round();
    Duration::try_milliseconds(millis as i64)
        .and_then(|d| header.start_time.checked_add_signed(d))
        .ok_or_else(|| TrackError::MalformedStream {
            activity_id: header.activity_id.clone(),
            stream: "time",
            message: format!("offset {} out of range", offset),
        })
}
