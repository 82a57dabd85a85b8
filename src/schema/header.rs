//! Activity header
//!
//! Identifies an activity and anchors its stream time offsets to an absolute
//! start instant. The timezone identifier is carried for presentation only;
//! synthesis needs nothing beyond the resolved UTC offset.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TrackError;

/// Activity identity and timing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityHeader {
    /// Provider activity identifier
    pub activity_id: String,
    /// Activity start instant (UTC)
    pub start_time: DateTime<Utc>,
    /// Activity end instant (UTC), when the provider reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    /// IANA zone name (e.g. "America/Los_Angeles")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    /// Resolved offset from UTC (seconds east)
    #[serde(default)]
    pub utc_offset_secs: i32,
}

impl ActivityHeader {
    pub fn new(activity_id: impl Into<String>, start_time: DateTime<Utc>) -> Self {
        Self {
            activity_id: activity_id.into(),
            start_time,
            end_time: None,
            timezone: None,
            utc_offset_secs: 0,
        }
    }

    pub fn with_end_time(mut self, end_time: DateTime<Utc>) -> Self {
        self.end_time = Some(end_time);
        self
    }

    /// Set an already-resolved zone name and offset
    pub fn with_timezone(mut self, timezone: impl Into<String>, utc_offset_secs: i32) -> Self {
        self.timezone = Some(timezone.into());
        self.utc_offset_secs = utc_offset_secs;
        self
    }

    /// Set the timezone from a provider label.
    ///
    /// Accepts `"(GMT-08:00) America/Los_Angeles"`, taking the zone name
    /// from the text after the parenthesised prefix and the offset from the
    /// prefix. A bare zone name keeps the current offset.
    pub fn with_timezone_label(mut self, label: &str) -> Result<Self, TrackError> {
        let (name, offset) = parse_timezone_label(label)?;
        self.timezone = Some(name);
        if let Some(offset) = offset {
            self.utc_offset_secs = offset.local_minus_utc();
        }
        Ok(self)
    }

    /// Resolved UTC offset
    pub fn utc_offset(&self) -> Result<FixedOffset, TrackError> {
        FixedOffset::east_opt(self.utc_offset_secs).ok_or_else(|| {
            TrackError::InvalidTimezone(format!("offset {}s out of range", self.utc_offset_secs))
        })
    }

    /// Start instant in the activity's local offset
    pub fn local_start(&self) -> Result<DateTime<FixedOffset>, TrackError> {
        Ok(self.start_time.with_timezone(&self.utc_offset()?))
    }
}

/// Split a provider timezone label into zone name and optional offset
pub fn parse_timezone_label(label: &str) -> Result<(String, Option<FixedOffset>), TrackError> {
    let label = label.trim();

    let (offset, name) = match label.strip_prefix('(') {
        Some(rest) => {
            let close = rest
                .find(')')
                .ok_or_else(|| TrackError::InvalidTimezone(label.to_string()))?;
            (Some(parse_gmt_offset(&rest[..close])?), rest[close + 1..].trim())
        }
        None => (None, label),
    };

    if name.is_empty() {
        return Err(TrackError::InvalidTimezone(label.to_string()));
    }
    Ok((name.to_string(), offset))
}

/// Parse `GMT-08:00`, `GMT +05:30` or bare `GMT`
fn parse_gmt_offset(prefix: &str) -> Result<FixedOffset, TrackError> {
    let invalid = || TrackError::InvalidTimezone(prefix.to_string());

    let rest = prefix
        .trim()
        .strip_prefix("GMT")
        .or_else(|| prefix.trim().strip_prefix("UTC"))
        .ok_or_else(invalid)?
        .trim();
    if rest.is_empty() {
        return FixedOffset::east_opt(0).ok_or_else(invalid);
    }

    let (sign, digits) = match rest.as_bytes()[0] {
        b'+' => (1, &rest[1..]),
        b'-' => (-1, &rest[1..]),
        _ => return Err(invalid()),
    };
    let (hours, minutes) = digits.trim().split_once(':').ok_or_else(invalid)?;
    let hours: i32 = hours.parse().map_err(|_| invalid())?;
    let minutes: i32 = minutes.parse().map_err(|_| invalid())?;
    if !(0..24).contains(&hours) || !(0..60).contains(&minutes) {
        return Err(invalid());
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(invalid)
}
