//! Pipeline orchestration
//!
//! This module provides the public API for turning raw activity streams into
//! statistics reports, one activity at a time or as a batch.
//!
//! Pipeline stages:
//! 1. TrackSynthesizer - Merge raw streams into a classified track
//! 2. StatisticsCalculator - Distance, moving time and channel summaries
//! 3. ReportEncoder - Encode the report for downstream collaborators

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::config::TrackConfig;
use crate::encoder::{ActivityReport, ReportEncoder};
use crate::error::TrackError;
use crate::schema::{ActivityHeader, RawStreams};
use crate::statistics::StatisticsCalculator;
use crate::synthesizer::TrackSynthesizer;
use crate::types::{Exclusion, Synthesis};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// One activity as handed over by the fetch layer.
///
/// `streams` is absent when nothing was fetched, e.g. for manually entered
/// activities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityInput {
    pub header: ActivityHeader,
    #[serde(default)]
    pub streams: Option<RawStreams>,
}

/// Result of processing one activity
#[derive(Debug, Clone, PartialEq)]
pub enum ActivityOutcome {
    Processed(ActivityReport),
    Excluded(Exclusion),
}

/// An activity whose processing failed
#[derive(Debug)]
pub struct BatchFailure {
    pub activity_id: String,
    pub error: TrackError,
}

/// Results of a batch, in input order within each list
#[derive(Debug, Default)]
pub struct BatchResult {
    pub reports: Vec<ActivityReport>,
    pub exclusions: Vec<Exclusion>,
    pub failures: Vec<BatchFailure>,
}

/// Synthesize a track with default thresholds.
///
/// # Example
/// ```ignore
/// let synthesis = synthesize_track(&header, &streams)?;
/// if let Synthesis::Track(track) = synthesis {
///     println!("{} samples", track.len());
/// }
/// ```
pub fn synthesize_track(
    header: &ActivityHeader,
    streams: &RawStreams,
) -> Result<Synthesis, TrackError> {
    TrackSynthesizer::new().synthesize(header, streams)
}

/// Process one activity with default thresholds
pub fn process_activity(
    header: &ActivityHeader,
    streams: Option<&RawStreams>,
) -> Result<ActivityOutcome, TrackError> {
    TrackProcessor::new().process_parts(header, streams)
}

/// Convert an `ActivityInput` JSON document into a report JSON.
///
/// Returns `Ok(None)` when the activity is excluded.
pub fn activity_to_report_json(raw_json: String) -> Result<Option<String>, TrackError> {
    TrackProcessor::new().process_json(&raw_json)
}

/// Processor holding thresholds and an encoder across many activities
pub struct TrackProcessor {
    config: TrackConfig,
    synthesizer: TrackSynthesizer,
    calculator: StatisticsCalculator,
    encoder: ReportEncoder,
}

impl Default for TrackProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl TrackProcessor {
    /// Create a new processor with default settings
    pub fn new() -> Self {
        Self::with_config(TrackConfig::default())
    }

    /// Create a processor with custom thresholds
    pub fn with_config(config: TrackConfig) -> Self {
        Self {
            synthesizer: TrackSynthesizer::with_config(&config),
            calculator: StatisticsCalculator::with_config(&config),
            encoder: ReportEncoder::new(),
            config,
        }
    }

    pub fn config(&self) -> &TrackConfig {
        &self.config
    }

    /// Process a single activity
    pub fn process(&self, input: &ActivityInput) -> Result<ActivityOutcome, TrackError> {
        self.process_parts(&input.header, input.streams.as_ref())
    }

    fn process_parts(
        &self,
        header: &ActivityHeader,
        streams: Option<&RawStreams>,
    ) -> Result<ActivityOutcome, TrackError> {
        let track = match streams {
            None => {
                debug!("Activity {} has no streams, treating as stationary", header.activity_id);
                self.synthesizer.stationary(header)?
            }
            Some(streams) => match self.synthesizer.synthesize(header, streams)? {
                Synthesis::Track(track) => track,
                Synthesis::Excluded(exclusion) => return Ok(ActivityOutcome::Excluded(exclusion)),
            },
        };

        let outcome = self.calculator.compute(&track)?;
        let report = self.encoder.encode(header, &track, &outcome)?;
        Ok(ActivityOutcome::Processed(report))
    }

    /// Process an `ActivityInput` JSON document into report JSON
    pub fn process_json(&self, raw_json: &str) -> Result<Option<String>, TrackError> {
        let input: ActivityInput = serde_json::from_str(raw_json)
            .map_err(|e| TrackError::ParseError(format!("Failed to parse activity input: {}", e)))?;

        match self.process(&input)? {
            ActivityOutcome::Processed(report) => serde_json::to_string_pretty(&report)
                .map(Some)
                .map_err(|e| TrackError::EncodingError(e.to_string())),
            ActivityOutcome::Excluded(_) => Ok(None),
        }
    }

    /// Process many activities.
    ///
    /// Exclusions and per-activity failures are collected; one bad activity
    /// never aborts the batch.
    pub fn process_batch(&self, inputs: &[ActivityInput]) -> BatchResult {
        #[cfg(feature = "parallel")]
        let outcomes: Vec<_> = inputs.par_iter().map(|i| self.process(i)).collect();
        #[cfg(not(feature = "parallel"))]
        let outcomes: Vec<_> = inputs.iter().map(|i| self.process(i)).collect();

        let mut result = BatchResult::default();
        for (input, outcome) in inputs.iter().zip(outcomes) {
            match outcome {
                Ok(ActivityOutcome::Processed(report)) => result.reports.push(report),
                Ok(ActivityOutcome::Excluded(exclusion)) => result.exclusions.push(exclusion),
                Err(error) => {
                    warn!("Activity {} failed: {}", input.header.activity_id, error);
                    result.failures.push(BatchFailure {
                        activity_id: input.header.activity_id.clone(),
                        error,
                    });
                }
            }
        }

        debug!(
            "Batch of {}: {} reports, {} exclusions, {} failures",
            inputs.len(),
            result.reports.len(),
            result.exclusions.len(),
            result.failures.len()
        );
        result
    }
}
