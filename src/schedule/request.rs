//! Parsing and validation of the inbound schedule-meeting body.
use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::datetime::{ScheduledTime, normalize_start};
use super::error::{
    FIELD_CHANNEL_ID, FIELD_DURATION_MINUTES, FIELD_TITLE, FIELD_USER_ID, FieldError,
};

pub const DEFAULT_TIMEZONE: &str = "Europe/Moscow";
pub const MIN_DURATION_MINUTES: i64 = 5;
pub const MAX_DURATION_MINUTES: i64 = 480;
pub const MAX_TITLE_CHARS: usize = 100;

// Wire shape. Clients send nulls for unset fields, so everything is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawScheduleRequest {
    channel_id: Option<String>,
    team_id: Option<String>,
    user_id: Option<String>,
    start_at: Option<String>,
    start_at_local: Option<String>,
    timezone: Option<String>,
    duration_minutes: Option<i64>,
    title: Option<String>,
    participant_ids: Option<Vec<String>>,
    root_id: Option<String>,
}

/// A validated schedule-meeting request.
#[derive(Clone, Debug, PartialEq)]
pub struct ScheduleRequest {
    pub channel_id: String,
    pub team_id: String,
    pub user_id: String,
    pub start_at: String,
    pub start_at_local: String,
    pub timezone: String,
    pub duration_minutes: i64,
    pub title: Option<String>,
    /// In request order, possibly with duplicates.
    pub participant_ids: Vec<String>,
    pub root_id: Option<String>,
}

impl From<RawScheduleRequest> for ScheduleRequest {
    fn from(raw: RawScheduleRequest) -> Self {
        let timezone = raw
            .timezone
            .map(|tz| tz.trim().to_string())
            .filter(|tz| !tz.is_empty())
            .unwrap_or_else(|| DEFAULT_TIMEZONE.to_string());

        Self {
            channel_id: raw.channel_id.unwrap_or_default().trim().to_string(),
            team_id: raw.team_id.unwrap_or_default().trim().to_string(),
            user_id: raw.user_id.unwrap_or_default().trim().to_string(),
            start_at: raw.start_at.unwrap_or_default().trim().to_string(),
            start_at_local: raw.start_at_local.unwrap_or_default().trim().to_string(),
            timezone,
            duration_minutes: raw.duration_minutes.unwrap_or_default(),
            title: raw.title,
            participant_ids: raw
                .participant_ids
                .unwrap_or_default()
                .into_iter()
                .map(|id| id.trim().to_string())
                .filter(|id| !id.is_empty())
                .collect(),
            root_id: raw.root_id.filter(|id| !id.trim().is_empty()),
        }
    }
}

/// Parses `body` and checks every field, reporting all violations at once.
///
/// The start time is normalized against `now` as part of the same pass.
pub fn validate(
    body: &[u8],
    now: DateTime<Utc>,
) -> Result<(ScheduleRequest, ScheduledTime), Vec<FieldError>> {
    let raw: RawScheduleRequest = serde_json::from_slice(body).map_err(|err| {
        tracing::warn!("Failed to parse schedule request JSON: {}", err);
        vec![FieldError::general(format!("Invalid JSON: {}", err))]
    })?;
    let req = ScheduleRequest::from(raw);

    tracing::info!(
        channel_id = %req.channel_id,
        user_id = %req.user_id,
        duration_minutes = req.duration_minutes,
        participant_count = req.participant_ids.len(),
        has_local_start = !req.start_at_local.is_empty(),
        "Schedule request received"
    );

    let mut errors = vec![];

    if req.channel_id.is_empty() {
        errors.push(FieldError::new(FIELD_CHANNEL_ID, "channel_id is required"));
    }

    if req.user_id.is_empty() {
        errors.push(FieldError::new(FIELD_USER_ID, "user_id is required"));
    }

    let start = match normalize_start(&req, now) {
        Ok(start) => Some(start),
        Err(err) => {
            errors.push(err);
            None
        }
    };

    if req.duration_minutes < MIN_DURATION_MINUTES {
        errors.push(FieldError::new(
            FIELD_DURATION_MINUTES,
            format!("Duration must be at least {} minutes", MIN_DURATION_MINUTES),
        ));
    } else if req.duration_minutes > MAX_DURATION_MINUTES {
        errors.push(FieldError::new(
            FIELD_DURATION_MINUTES,
            format!(
                "Duration cannot exceed {} minutes (8 hours)",
                MAX_DURATION_MINUTES
            ),
        ));
    }

    if let Some(title) = &req.title {
        if title.chars().count() > MAX_TITLE_CHARS {
            errors.push(FieldError::new(
                FIELD_TITLE,
                format!("Title cannot be longer than {} characters", MAX_TITLE_CHARS),
            ));
        }
    }

    match start {
        Some(start) if errors.is_empty() => Ok((req, start)),
        _ => {
            tracing::warn!(error_count = errors.len(), "Schedule request validation failed");
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 20, 12, 0, 0).unwrap()
    }

    fn check(body: &serde_json::Value) -> Result<ScheduleRequest, Vec<FieldError>> {
        validate(body.to_string().as_bytes(), now()).map(|(req, _)| req)
    }

    fn valid_body() -> serde_json::Value {
        json!({
            "channel_id": "c1",
            "team_id": "t1",
            "user_id": "u1",
            "start_at_local": "2025-06-01T10:00:00+03:00",
            "duration_minutes": 30,
            "participant_ids": ["u2", "u3"]
        })
    }

    fn fields(errors: &[FieldError]) -> Vec<&str> {
        errors.iter().map(|e| e.field.as_str()).collect()
    }

    #[test]
    fn it_accepts_valid_request() {
        let req = check(&valid_body()).unwrap();
        assert_eq!(req.channel_id, "c1");
        assert_eq!(req.timezone, DEFAULT_TIMEZONE);
        assert_eq!(req.participant_ids, vec!["u2", "u3"]);
        assert_eq!(req.title, None);
        assert_eq!(req.root_id, None);
    }

    #[test]
    fn it_reports_malformed_json_on_general() {
        let errors = validate(b"{not json", now()).unwrap_err();
        assert_eq!(fields(&errors), vec!["general"]);
        assert!(errors[0].message.starts_with("Invalid JSON"));
    }

    #[test]
    fn it_reports_empty_body_on_general() {
        let errors = validate(b"", now()).unwrap_err();
        assert_eq!(fields(&errors), vec!["general"]);
    }

    #[test]
    fn it_accumulates_every_violation() {
        let body = json!({
            "duration_minutes": 2,
            "title": "x".repeat(101),
        });
        let errors = check(&body).unwrap_err();
        assert_eq!(
            fields(&errors),
            vec![
                "channel_id",
                "user_id",
                "start_at_local",
                "duration_minutes",
                "title"
            ]
        );
    }

    #[test]
    fn it_reports_start_time_with_other_violations() {
        let mut body = valid_body();
        body["duration_minutes"] = json!(2);
        body["start_at_local"] = json!("2025-05-01T10:00:00+03:00");

        let errors = check(&body).unwrap_err();
        assert_eq!(fields(&errors), vec!["start_at_local", "duration_minutes"]);
        assert!(errors[0].message.contains("in the past"));
    }

    #[test]
    fn it_returns_normalized_start() {
        let (_, start) = validate(valid_body().to_string().as_bytes(), now()).unwrap();
        assert_eq!(
            start.instant,
            Utc.with_ymd_and_hms(2025, 6, 1, 7, 0, 0).unwrap()
        );
    }

    #[test]
    fn it_rejects_duration_out_of_bounds() {
        for (duration, expected) in [(4, "at least 5"), (481, "cannot exceed 480")] {
            let mut body = valid_body();
            body["duration_minutes"] = json!(duration);
            let errors = check(&body).unwrap_err();
            assert_eq!(fields(&errors), vec!["duration_minutes"]);
            assert!(errors[0].message.contains(expected));
        }
    }

    #[test]
    fn it_accepts_duration_bounds() {
        for duration in [5, 480] {
            let mut body = valid_body();
            body["duration_minutes"] = json!(duration);
            assert!(check(&body).is_ok());
        }
    }

    #[test]
    fn it_counts_title_length_in_characters() {
        let mut body = valid_body();
        // 100 two-byte characters
        body["title"] = json!("я".repeat(100));
        assert!(check(&body).is_ok());

        body["title"] = json!("я".repeat(101));
        let errors = check(&body).unwrap_err();
        assert_eq!(fields(&errors), vec!["title"]);
    }

    #[test]
    fn it_tolerates_null_fields() {
        let mut body = valid_body();
        body["participant_ids"] = json!(null);
        body["timezone"] = json!(null);
        body["root_id"] = json!("");
        let req = check(&body).unwrap();
        assert!(req.participant_ids.is_empty());
        assert_eq!(req.timezone, DEFAULT_TIMEZONE);
        assert_eq!(req.root_id, None);
    }

    #[test]
    fn it_keeps_timezone_and_thread_root() {
        let mut body = valid_body();
        body["timezone"] = json!("Asia/Yekaterinburg");
        body["root_id"] = json!("root1");
        let req = check(&body).unwrap();
        assert_eq!(req.timezone, "Asia/Yekaterinburg");
        assert_eq!(req.root_id.as_deref(), Some("root1"));
    }
}
