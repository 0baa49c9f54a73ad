//! Acquisition-time parsing and the `[min, max]` sequencing-time window.

use crate::error::{CatError, Result};
use chrono::{DateTime, NaiveDateTime, TimeDelta};
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static START_TIME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)start_time=([^ ]+)").expect("valid start_time regex"));

/// Output format of reported start times, and the first format tried on input.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";
const OFFSET_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f%:z";

/// Parses `YYYY-MM-DDTHH:MM:SSZ`, falling back to
/// `YYYY-MM-DDTHH:MM:SS.ffffff+HH:MM`. The offset of the second form is
/// dropped and the wall-clock time kept.
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT)
        .or_else(|_| {
            DateTime::parse_from_str(value, OFFSET_TIMESTAMP_FORMAT).map(|dt| dt.naive_local())
        })
        .map_err(|_| CatError::Timestamp {
            value: value.to_string(),
        })
}

/// Acquisition time carried by a header comment.
pub fn start_time_from_comment(read_id: &str, comment: Option<&str>) -> Result<NaiveDateTime> {
    let caps = comment
        .and_then(|c| START_TIME_PATTERN.captures(c))
        .ok_or_else(|| CatError::MissingStartTime {
            read_id: read_id.to_string(),
        })?;
    parse_timestamp(&caps[1])
}

/// Base time of the window: a fixed timestamp or the earliest read in the inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartTime {
    Auto,
    At(NaiveDateTime),
}

impl StartTime {
    /// `auto` (or `min`) requests the pre-pass; anything else must be a timestamp.
    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "auto" | "min" => Ok(StartTime::Auto),
            other => parse_timestamp(other).map(StartTime::At),
        }
    }
}

/// Unresolved window: base time plus offsets in minutes.
#[derive(Debug, Clone, Default)]
pub struct WindowSpec {
    pub start: Option<StartTime>,
    pub max_offset_minutes: Option<i64>,
    pub min_offset_minutes: Option<i64>,
}

impl WindowSpec {
    pub fn has_offsets(&self) -> bool {
        self.max_offset_minutes.is_some() || self.min_offset_minutes.is_some()
    }

    /// Offsets without a base time would never take effect.
    pub fn validate(&self) -> Result<()> {
        if self.start.is_none() {
            if self.max_offset_minutes.is_some() {
                return Err(CatError::invalid_parameter(
                    "max-sequencing-time",
                    "requires --start-time",
                ));
            }
            if self.min_offset_minutes.is_some() {
                return Err(CatError::invalid_parameter(
                    "min-sequencing-time",
                    "requires --start-time",
                ));
            }
        }
        Ok(())
    }

    /// Resolves the window. `earliest` runs only for [`StartTime::Auto`] with at
    /// least one offset set.
    pub fn resolve<F, E>(&self, earliest: F) -> std::result::Result<Option<TimeWindow>, E>
    where
        F: FnOnce() -> std::result::Result<NaiveDateTime, E>,
        E: From<CatError>,
    {
        self.validate()?;
        let Some(start) = self.start else {
            return Ok(None);
        };
        if !self.has_offsets() {
            log::warn!("--start-time has no effect without --max/--min-sequencing-time");
            return Ok(None);
        }

        let base = match start {
            StartTime::At(t) => t,
            StartTime::Auto => earliest()?,
        };
        let window = TimeWindow::from_base(base, self.min_offset_minutes, self.max_offset_minutes)?;
        Ok(Some(window))
    }
}

/// Inclusive acquisition-time window; a missing bound is unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeWindow {
    pub min_time: Option<NaiveDateTime>,
    pub max_time: Option<NaiveDateTime>,
}

impl TimeWindow {
    pub fn from_base(
        base: NaiveDateTime,
        min_offset_minutes: Option<i64>,
        max_offset_minutes: Option<i64>,
    ) -> Result<Self> {
        Ok(Self {
            min_time: min_offset_minutes
                .map(|m| offset(base, m, "min-sequencing-time"))
                .transpose()?,
            max_time: max_offset_minutes
                .map(|m| offset(base, m, "max-sequencing-time"))
                .transpose()?,
        })
    }

    pub fn is_unbounded(&self) -> bool {
        self.min_time.is_none() && self.max_time.is_none()
    }

    pub fn contains(&self, time: NaiveDateTime) -> bool {
        self.max_time.map_or(true, |max| time <= max) && self.min_time.map_or(true, |min| time >= min)
    }

    /// Checks a record's header. With no bounds the header is not read at all;
    /// otherwise a header lacking `start_time=` is an error.
    pub fn accepts(&self, read_id: &str, comment: Option<&str>) -> Result<bool> {
        if self.is_unbounded() {
            return Ok(true);
        }
        let time = start_time_from_comment(read_id, comment)?;
        Ok(self.contains(time))
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bound = |t: Option<NaiveDateTime>| {
            t.map(|t| t.format(TIMESTAMP_FORMAT).to_string())
                .unwrap_or_else(|| "unbounded".to_string())
        };
        write!(f, "[{}, {}]", bound(self.min_time), bound(self.max_time))
    }
}

fn offset(base: NaiveDateTime, minutes: i64, parameter: &str) -> Result<NaiveDateTime> {
    TimeDelta::try_minutes(minutes)
        .and_then(|delta| base.checked_add_signed(delta))
        .ok_or_else(|| CatError::invalid_parameter(parameter, format!("{} minutes is out of range", minutes)))
}
