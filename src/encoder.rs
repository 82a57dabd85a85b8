//! Report encoding
//!
//! Encodes a synthesized track and its statistics into the JSON report
//! consumed by caching, comparison and presentation layers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::TrackError;
use crate::schema::ActivityHeader;
use crate::statistics::{ActivityStatistics, StatisticSignal, StatisticsOutcome};
use crate::types::ActivityTrack;
use crate::{PRODUCER_NAME, TRACK_VERSION};

/// Current report schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Producer metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportProducer {
    pub name: String,
    pub version: String,
    pub instance_id: String,
}

/// Statistics report for one activity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityReport {
    pub schema_version: String,
    pub producer: ReportProducer,
    pub activity_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    pub start_time_utc: String,
    pub start_time_local: String,
    pub end_time_utc: String,
    pub computed_at_utc: String,
    pub stationary: bool,
    pub sample_count: usize,
    pub located_sample_count: usize,
    pub signals: Vec<StatisticSignal>,
    pub statistics: ActivityStatistics,
}

/// Report encoder
pub struct ReportEncoder {
    instance_id: String,
}

impl Default for ReportEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportEncoder {
    /// Create a new encoder with a unique instance ID
    pub fn new() -> Self {
        Self {
            instance_id: Uuid::new_v4().to_string(),
        }
    }

    /// Create an encoder with a specific instance ID
    pub fn with_instance_id(instance_id: String) -> Self {
        Self { instance_id }
    }

    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }

    /// Build the report for a track
    pub fn encode(
        &self,
        header: &ActivityHeader,
        track: &ActivityTrack,
        outcome: &StatisticsOutcome,
    ) -> Result<ActivityReport, TrackError> {
        self.encode_at(header, track, outcome, Utc::now())
    }

    fn encode_at(
        &self,
        header: &ActivityHeader,
        track: &ActivityTrack,
        outcome: &StatisticsOutcome,
        computed_at: DateTime<Utc>,
    ) -> Result<ActivityReport, TrackError> {
        let local_start = header.local_start()?;
        // The zero-duration signal marks the activity stationary for callers.
        let stationary =
            track.is_stationary() || outcome.signals.contains(&StatisticSignal::ZeroDuration);

        Ok(ActivityReport {
            schema_version: SCHEMA_VERSION.to_string(),
            producer: ReportProducer {
                name: PRODUCER_NAME.to_string(),
                version: TRACK_VERSION.to_string(),
                instance_id: self.instance_id.clone(),
            },
            activity_id: track.activity_id().to_string(),
            timezone: header.timezone.clone(),
            start_time_utc: track.start().to_rfc3339(),
            start_time_local: local_start.to_rfc3339(),
            end_time_utc: track.end().to_rfc3339(),
            computed_at_utc: computed_at.to_rfc3339(),
            stationary,
            sample_count: track.len(),
            located_sample_count: track.located_count(),
            signals: outcome.signals.clone(),
            statistics: outcome.statistics.clone(),
        })
    }

    /// Encode to JSON string
    pub fn encode_to_json(
        &self,
        header: &ActivityHeader,
        track: &ActivityTrack,
        outcome: &StatisticsOutcome,
    ) -> Result<String, TrackError> {
        let report = self.encode(header, track, outcome)?;
        serde_json::to_string_pretty(&report).map_err(|e| TrackError::EncodingError(e.to_string()))
    }
}
