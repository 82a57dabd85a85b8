//! Moving-time accumulation
//!
//! Sums elapsed time between consecutive samples, excluding explicit pauses
//! and gaps longer than the implicit pause threshold.

use chrono::{DateTime, Duration, Utc};

use crate::config::TrackConfig;
use crate::error::TrackError;
use crate::types::{AccumulatedStatistic, ActivityTrack, Sample, StatisticRange};

/// Sums moving duration over a track range
#[derive(Debug, Clone)]
pub struct MovingTimeAccumulator {
    implicit_pause: Duration,
    min_samples: usize,
}

impl Default for MovingTimeAccumulator {
    fn default() -> Self {
        Self::with_config(&TrackConfig::default())
    }
}

impl MovingTimeAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: &TrackConfig) -> Self {
        Self {
            implicit_pause: config.implicit_pause(),
            min_samples: config.min_moving_samples,
        }
    }

    /// Moving duration over `range`, or the whole track when `None`.
    ///
    /// # Errors
    /// - `InsufficientSamples` when the range holds fewer than the minimum
    ///   sample count (three by default)
    /// - `ZeroDuration` when a whole-track query yields no moving time
    /// - `InvalidRange` for a range outside the track
    pub fn accumulate(
        &self,
        track: &ActivityTrack,
        range: Option<StatisticRange>,
    ) -> Result<AccumulatedStatistic<Duration>, TrackError> {
        let resolved = StatisticRange::resolve(range, track)?;
        let sample_count = resolved.map_or(0, |r| r.len());

        let Some(r) = resolved.filter(|_| sample_count >= self.min_samples) else {
            return Err(TrackError::InsufficientSamples {
                activity_id: track.activity_id().to_string(),
                sample_count,
                minimum_required: self.min_samples,
            });
        };

        let value = self.sum(track.slice(r));
        if value.is_zero() && range.is_none() {
            return Err(TrackError::ZeroDuration {
                activity_id: track.activity_id().to_string(),
            });
        }

        Ok(AccumulatedStatistic {
            value,
            range: Some(r),
        })
    }

    fn sum(&self, samples: &[Sample]) -> Duration {
        let mut duration = Duration::zero();
        let mut last_counted: Option<DateTime<Utc>> = None;

        for sample in samples {
            if sample.is_pause() {
                last_counted = None;
                continue;
            }

            if let Some(previous) = last_counted {
                let elapsed = sample.timestamp - previous;
                if elapsed <= self.implicit_pause {
                    duration += elapsed;
                }
            }
            last_counted = Some(sample.timestamp);
        }

        duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ActivityHeader, RawStreams};
    use crate::synthesizer::TrackSynthesizer;
    use crate::types::{GeoPoint, SampleKind};
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 7, 0, 0).unwrap()
    }

    fn track_at(offsets: &[(i64, SampleKind)]) -> ActivityTrack {
        let samples: Vec<Sample> = offsets
            .iter()
            .map(|&(secs, kind)| {
                Sample::new(t0() + Duration::seconds(secs), kind)
                    .with_location(GeoPoint::new(46.0, 7.0))
            })
            .collect();
        let end = samples.last().map(|s| s.timestamp).unwrap_or_else(t0);
        ActivityTrack::new("m".to_string(), t0(), end, false, samples)
    }

    fn synthesized(time: Vec<f64>, resting: Option<Vec<bool>>) -> ActivityTrack {
        let n = time.len();
        let mut streams = RawStreams::new(time).with_latlng(vec![[46.0, 7.0]; n]);
        if let Some(r) = resting {
            streams = streams.with_resting(r);
        }
        TrackSynthesizer::new()
            .synthesize(&ActivityHeader::new("m", t0()), &streams)
            .unwrap()
            .track()
            .unwrap()
    }

    #[test]
    fn test_regular_track() {
        let track = synthesized(vec![0.0, 5.0, 10.0, 15.0, 20.0], None);
        let stat = MovingTimeAccumulator::new().accumulate(&track, None).unwrap();
        assert_eq!(stat.value, Duration::seconds(15));
    }

    #[test]
    fn test_paused_interval_excluded() {
        let track = synthesized(
            vec![0.0, 10.0, 20.0, 30.0, 40.0, 50.0, 60.0],
            Some(vec![false, false, true, true, false, false, false]),
        );
        let stat = MovingTimeAccumulator::new().accumulate(&track, None).unwrap();
        // 0-10 counted, 10-40 paused, 40-50 counted
        assert_eq!(stat.value, Duration::seconds(20));
    }

    #[test]
    fn test_fully_paused_track_is_zero_duration() {
        let track = synthesized(
            vec![0.0, 10.0, 20.0, 30.0, 40.0],
            Some(vec![false, true, true, false, false]),
        );
        let result = MovingTimeAccumulator::new().accumulate(&track, None);
        assert!(matches!(result, Err(TrackError::ZeroDuration { .. })));
    }

    #[test]
    fn test_explicit_range_allows_zero() {
        let track = track_at(&[
            (0, SampleKind::Start),
            (10, SampleKind::Pause),
            (20, SampleKind::Pause),
            (30, SampleKind::End),
        ]);
        let stat = MovingTimeAccumulator::new()
            .accumulate(&track, Some(StatisticRange::new(0, 3)))
            .unwrap();
        assert!(stat.value.is_zero());
    }

    #[test]
    fn test_implicit_pause_excluded() {
        let track = track_at(&[
            (0, SampleKind::Start),
            (10, SampleKind::Regular),
            (80, SampleKind::Regular),
            (90, SampleKind::End),
        ]);
        let stat = MovingTimeAccumulator::new().accumulate(&track, None).unwrap();
        assert_eq!(stat.value, Duration::seconds(20));
    }

    #[test]
    fn test_gap_at_threshold_counted() {
        let track = track_at(&[
            (0, SampleKind::Start),
            (65, SampleKind::Regular),
            (70, SampleKind::End),
        ]);
        let stat = MovingTimeAccumulator::new().accumulate(&track, None).unwrap();
        assert_eq!(stat.value, Duration::seconds(70));
    }

    #[test]
    fn test_two_sample_range_is_usage_error() {
        let track = track_at(&[
            (0, SampleKind::Start),
            (10, SampleKind::Regular),
            (20, SampleKind::Regular),
            (30, SampleKind::End),
        ]);
        let result = MovingTimeAccumulator::new().accumulate(&track, Some(StatisticRange::new(1, 2)));
        assert!(matches!(
            result,
            Err(TrackError::InsufficientSamples {
                sample_count: 2,
                minimum_required: 3,
                ..
            })
        ));

        let short = track_at(&[(0, SampleKind::Start), (10, SampleKind::End)]);
        assert!(matches!(
            MovingTimeAccumulator::new().accumulate(&short, None),
            Err(TrackError::InsufficientSamples { .. })
        ));
    }

    #[test]
    fn test_empty_track_is_usage_error() {
        let track = track_at(&[]);
        assert!(matches!(
            MovingTimeAccumulator::new().accumulate(&track, None),
            Err(TrackError::InsufficientSamples { sample_count: 0, .. })
        ));
    }

    #[test]
    fn test_never_exceeds_elapsed() {
        let offsets = [0, 3, 9, 80, 81, 90, 200, 201, 260];
        let kinds = [
            SampleKind::Start,
            SampleKind::Regular,
            SampleKind::Pause,
            SampleKind::Resume,
            SampleKind::Regular,
            SampleKind::Regular,
            SampleKind::Regular,
            SampleKind::Regular,
            SampleKind::End,
        ];
        let layout: Vec<(i64, SampleKind)> = offsets.iter().copied().zip(kinds).collect();
        let track = track_at(&layout);
        let acc = MovingTimeAccumulator::new();

        for start in 0..layout.len() {
            for end in (start + 2)..layout.len() {
                let range = StatisticRange::new(start, end);
                let stat = acc.accumulate(&track, Some(range)).unwrap();
                let s = track.slice(range);
                let elapsed = s.last().unwrap().timestamp - s.first().unwrap().timestamp;
                assert!(stat.value <= elapsed);
            }
        }
    }

    #[test]
    fn test_custom_threshold() {
        let config = TrackConfig {
            implicit_pause_secs: 120,
            ..TrackConfig::default()
        };
        let track = track_at(&[
            (0, SampleKind::Start),
            (10, SampleKind::Regular),
            (80, SampleKind::Regular),
            (90, SampleKind::End),
        ]);
        let stat = MovingTimeAccumulator::with_config(&config)
            .accumulate(&track, None)
            .unwrap();
        assert_eq!(stat.value, Duration::seconds(90));
    }
}
