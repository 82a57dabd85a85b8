//! Activity Track - track synthesis and statistics for athletic activities
//!
//! Turns already-fetched, independently sparse per-field streams into one
//! classified track and derives distance and moving-time statistics from it
//! through a deterministic pipeline: stream merge → track synthesis →
//! accumulation → report encoding.
//!
//! ## Features
//!
//! - **`parallel`** - Process batches across worker threads with rayon

pub mod config;
pub mod distance;
pub mod encoder;
pub mod error;
pub mod geodesy;
pub mod moving_time;
pub mod pipeline;
pub mod schema;
pub mod statistics;
pub mod synthesizer;
pub mod types;

pub use config::TrackConfig;
pub use distance::DistanceAccumulator;
pub use error::TrackError;
pub use moving_time::MovingTimeAccumulator;
pub use pipeline::{
    activity_to_report_json, process_activity, synthesize_track, ActivityInput, ActivityOutcome,
    BatchResult, TrackProcessor,
};
pub use statistics::{ActivityStatistic, ActivityStatistics, StatisticsCalculator};
pub use synthesizer::TrackSynthesizer;
pub use types::{
    AccumulatedStatistic, ActivityTrack, Exclusion, GeoPoint, Sample, SampleKind, StatisticRange,
    Synthesis,
};

// Schema exports
pub use schema::{ActivityHeader, RawStreams};

/// Crate version embedded in all reports
pub const TRACK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for reports
pub const PRODUCER_NAME: &str = "activity-track";
