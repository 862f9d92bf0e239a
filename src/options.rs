//! Settings for GPS extraction and track assembly.

use chrono::{Local, LocalResult, NaiveDate, TimeZone};
use time::{PrimitiveDateTime, UtcOffset};

/// GPMF nesting depth searched for GPS records.
/// GoPro payloads are laid out as `DEVC` -> `STRM` -> data.
pub const DEFAULT_MAX_DEPTH: usize = 4;

/// How `GPSU` datetimes, which carry no time zone, are interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TimeReference {
    /// Time zone of the running process, as `mktime`.
    /// The offset is resolved for each datetime,
    /// so daylight saving time follows the recording date.
    #[default]
    Local,
    /// GPS time is UTC.
    Utc,
    /// Fixed offset.
    Offset(UtcOffset),
}

impl TimeReference {
    /// Unix time in seconds for a zone-less `GPSU` datetime.
    /// Returns `None` if the datetime can not be represented.
    pub fn unix_timestamp(&self, datetime: PrimitiveDateTime) -> Option<i64> {
        match self {
            Self::Utc => Some(datetime.assume_utc().unix_timestamp()),
            Self::Offset(offset) => Some(datetime.assume_offset(*offset).unix_timestamp()),
            Self::Local => local_timestamp(datetime),
        }
    }
}

/// Resolves `datetime` in the process time zone (`TZ`, else `/etc/localtime`).
fn local_timestamp(datetime: PrimitiveDateTime) -> Option<i64> {
    let naive = NaiveDate::from_ymd_opt(
        datetime.year(),
        u8::from(datetime.month()) as u32,
        datetime.day() as u32
    )?.and_hms_opt(
        datetime.hour() as u32,
        datetime.minute() as u32,
        datetime.second() as u32
    )?;

    match Local.from_local_datetime(&naive) {
        LocalResult::Single(t) => Some(t.timestamp()),
        // Repeated hour when clocks go back, first occurrence
        LocalResult::Ambiguous(a, b) => Some(a.timestamp().min(b.timestamp())),
        // Skipped hour when clocks go forward, offset before the transition
        LocalResult::None => {
            let offset = Local.offset_from_utc_datetime(&naive);
            Some(naive.and_utc().timestamp() - offset.local_minus_utc() as i64)
        }
    }
}

/// What to do when a single payload fails to parse or decode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Record a warning and continue with the next payload.
    #[default]
    Skip,
    /// Return the first error.
    Abort,
}

/// Extraction settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    /// Nesting levels searched for `GPS5`, `GPRI`, `GPSU`.
    pub max_depth: usize,
    /// Divide values by their `SCAL` record.
    pub apply_scale: bool,
    /// Time zone for `GPSU`.
    pub time_reference: TimeReference,
    /// Per-payload failure handling.
    pub policy: ErrorPolicy,
    /// Parse and decode payloads in parallel.
    pub parallel: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            apply_scale: true,
            time_reference: TimeReference::default(),
            policy: ErrorPolicy::default(),
            parallel: true,
        }
    }
}

impl Options {
    pub fn with_max_depth(self, max_depth: usize) -> Self {
        Self { max_depth, ..self }
    }

    pub fn with_scale(self, apply_scale: bool) -> Self {
        Self { apply_scale, ..self }
    }

    pub fn with_time_reference(self, time_reference: TimeReference) -> Self {
        Self { time_reference, ..self }
    }

    pub fn with_policy(self, policy: ErrorPolicy) -> Self {
        Self { policy, ..self }
    }

    pub fn with_parallel(self, parallel: bool) -> Self {
        Self { parallel, ..self }
    }
}
