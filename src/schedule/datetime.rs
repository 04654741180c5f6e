//! Turns the request's start time into one validated instant.
//!
//! `start_at_local` wins over `start_at`. Each is tried against its own
//! ordered list of accepted layouts and the first layout that parses is
//! used. Every failure is reported on `start_at_local`, the field clients
//! are expected to fill in.
use chrono::{DateTime, Duration, FixedOffset, NaiveDateTime, Utc};

use super::error::{FIELD_START_AT_LOCAL, FieldError};
use super::request::ScheduleRequest;

/// How far ahead a meeting may be scheduled.
pub const MAX_DAYS_AHEAD: i64 = 30;

#[derive(Clone, Copy, Debug)]
enum Layout {
    Rfc3339,
    /// Layout carrying a numeric offset.
    Offset(&'static str),
    /// Layout ending in a literal `Z`.
    Zulu(&'static str),
}

impl Layout {
    fn parse(&self, input: &str) -> Option<DateTime<FixedOffset>> {
        match self {
            Layout::Rfc3339 => DateTime::parse_from_rfc3339(input).ok(),
            Layout::Offset(fmt) => DateTime::parse_from_str(input, fmt).ok(),
            Layout::Zulu(fmt) => NaiveDateTime::parse_from_str(input, fmt)
                .ok()
                .map(|naive| naive.and_utc().fixed_offset()),
        }
    }
}

const LOCAL_LAYOUTS: [Layout; 6] = [
    Layout::Rfc3339,
    Layout::Offset("%Y-%m-%dT%H:%M:%S%:z"),
    Layout::Offset("%Y-%m-%dT%H:%M:%S%z"),
    Layout::Zulu("%Y-%m-%dT%H:%M:%SZ"),
    Layout::Offset("%Y-%m-%dT%H:%M%:z"),
    Layout::Zulu("%Y-%m-%dT%H:%MZ"),
];

const UTC_LAYOUTS: [Layout; 4] = [
    Layout::Rfc3339,
    Layout::Offset("%Y-%m-%dT%H:%M:%S%.f%:z"),
    Layout::Zulu("%Y-%m-%dT%H:%M:%S%.3fZ"),
    Layout::Zulu("%Y-%m-%dT%H:%M:%SZ"),
];

fn parse_first(layouts: &[Layout], input: &str) -> Option<DateTime<FixedOffset>> {
    layouts.iter().find_map(|layout| {
        let parsed = layout.parse(input);
        if parsed.is_some() {
            tracing::debug!("Parsed start time {} with {:?}", input, layout);
        }
        parsed
    })
}

/// Which request field the start time came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimeSource {
    Local,
    Utc,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ScheduledTime {
    pub instant: DateTime<Utc>,
    /// The same instant in the offset the client sent.
    pub local: DateTime<FixedOffset>,
    pub source: TimeSource,
}

/// Parses the start time and checks it lies within `[now, now + 30 days]`.
pub fn normalize_start(
    req: &ScheduleRequest,
    now: DateTime<Utc>,
) -> Result<ScheduledTime, FieldError> {
    let (local, source) = if !req.start_at_local.is_empty() {
        let parsed = parse_first(&LOCAL_LAYOUTS, &req.start_at_local).ok_or_else(|| {
            tracing::warn!("Failed to parse start_at_local {}", req.start_at_local);
            FieldError::new(
                FIELD_START_AT_LOCAL,
                format!(
                    "Invalid local time format: {} (expected YYYY-MM-DDTHH:mm:ss+03:00)",
                    req.start_at_local
                ),
            )
        })?;
        (parsed, TimeSource::Local)
    } else if !req.start_at.is_empty() {
        let parsed = parse_first(&UTC_LAYOUTS, &req.start_at).ok_or_else(|| {
            tracing::warn!("Failed to parse start_at {}", req.start_at);
            FieldError::new(
                FIELD_START_AT_LOCAL,
                format!(
                    "Invalid date and time format: {} (expected ISO 8601)",
                    req.start_at
                ),
            )
        })?;
        (parsed, TimeSource::Utc)
    } else {
        return Err(FieldError::new(
            FIELD_START_AT_LOCAL,
            "Date and time required (provide start_at_local or start_at)",
        ));
    };

    let instant = local.with_timezone(&Utc);
    let latest = now + Duration::days(MAX_DAYS_AHEAD);

    if instant < now {
        tracing::warn!(scheduled_at = %instant, now = %now, "Scheduled time is in the past");
        return Err(FieldError::new(
            FIELD_START_AT_LOCAL,
            "Date and time cannot be in the past",
        ));
    }
    if instant > latest {
        tracing::warn!(scheduled_at = %instant, latest = %latest, "Scheduled time is too far in the future");
        return Err(FieldError::new(
            FIELD_START_AT_LOCAL,
            format!(
                "Date cannot be more than {} days in the future",
                MAX_DAYS_AHEAD
            ),
        ));
    }

    Ok(ScheduledTime {
        instant,
        local,
        source,
    })
}
