//! Error types for activity track processing

use thiserror::Error;

/// Errors that can occur while synthesizing a track or computing its statistics.
///
/// An activity without usable location data is not an error; see
/// [`crate::types::Exclusion`].
#[derive(Debug, Error)]
pub enum TrackError {
    #[error("Activity '{activity_id}' has no time stream")]
    MissingTimeStream { activity_id: String },

    #[error("Activity '{activity_id}' has a malformed {stream} stream: {message}")]
    MalformedStream {
        activity_id: String,
        stream: &'static str,
        message: String,
    },

    #[error("Activity '{activity_id}' has an invalid end time: {message}")]
    InvalidEndTime { activity_id: String, message: String },

    #[error("Invalid statistic range {start}..={end} over {sample_count} samples")]
    InvalidRange {
        start: usize,
        end: usize,
        sample_count: usize,
    },

    #[error(
        "Activity '{activity_id}' has {sample_count} samples, \
         minimum {minimum_required} required for moving time"
    )]
    InsufficientSamples {
        activity_id: String,
        sample_count: usize,
        minimum_required: usize,
    },

    #[error("Activity '{activity_id}' has zero moving time")]
    ZeroDuration { activity_id: String },

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Failed to parse input: {0}")]
    ParseError(String),

    #[error("Encoding error: {0}")]
    EncodingError(String),
}

impl TrackError {
    /// Whether this error only concerns the requested statistic, leaving
    /// the track itself usable.
    pub fn is_statistic_signal(&self) -> bool {
        matches!(
            self,
            TrackError::InsufficientSamples { .. } | TrackError::ZeroDuration { .. }
        )
    }
}
