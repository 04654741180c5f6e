//! The resolved meeting and the webhook payload built from it.
use chrono::{DateTime, Duration, FixedOffset, SecondsFormat, Utc};

use super::datetime::{ScheduledTime, TimeSource};
use super::request::ScheduleRequest;
use super::webhook::{PayloadParticipant, WebhookPayload};
use crate::host::{Channel, User};

pub const OPERATION_SCHEDULED_MEETING: &str = "scheduled_meeting";
pub const SOURCE_USER_SELECTION: &str = "user_selection";

const LOCAL_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%:z";

/// A fully validated and resolved meeting, alive for one request.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedMeeting {
    pub start: ScheduledTime,
    pub end: DateTime<Utc>,
    pub duration_minutes: i64,
    pub timezone: String,
    pub title: String,
    pub team_id: String,
    pub root_id: Option<String>,
    pub channel: Channel,
    pub organizer: User,
    pub participants: Vec<User>,
}

fn utc_string(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Secs, true)
}

impl ResolvedMeeting {
    pub fn new(
        req: ScheduleRequest,
        start: ScheduledTime,
        organizer: User,
        channel: Channel,
        participants: Vec<User>,
    ) -> Self {
        let end = start.instant + Duration::minutes(req.duration_minutes);
        Self {
            start,
            end,
            duration_minutes: req.duration_minutes,
            timezone: req.timezone,
            title: req.title.unwrap_or_default(),
            team_id: req.team_id,
            root_id: req.root_id,
            channel,
            organizer,
            participants,
        }
    }

    /// End of the meeting in the offset the start was given in.
    pub fn end_local(&self) -> DateTime<FixedOffset> {
        self.end.with_timezone(self.start.local.offset())
    }

    pub fn to_payload(&self, timestamp: DateTime<Utc>) -> WebhookPayload {
        let scheduled_at = utc_string(self.start.instant);
        let end_time = utc_string(self.end);
        let (scheduled_at_local, end_time_local) = match self.start.source {
            TimeSource::Local => (
                self.start.local.format(LOCAL_FORMAT).to_string(),
                self.end_local().format(LOCAL_FORMAT).to_string(),
            ),
            TimeSource::Utc => (scheduled_at.clone(), end_time.clone()),
        };

        WebhookPayload {
            operation_type: OPERATION_SCHEDULED_MEETING.to_string(),
            scheduled_at,
            scheduled_at_local,
            end_time,
            end_time_local,
            timezone: self.timezone.clone(),
            duration_minutes: self.duration_minutes,
            title: self.title.clone(),
            description: None,
            team_id: self.team_id.clone(),
            channel_id: self.channel.id.clone(),
            channel_name: self.channel.name.clone(),
            channel_type: self.channel.channel_type.as_str().to_string(),
            user_id: self.organizer.id.clone(),
            username: self.organizer.username.clone(),
            user_email: self.organizer.email.clone(),
            participants: self
                .participants
                .iter()
                .map(|user| PayloadParticipant {
                    user_id: user.id.clone(),
                    username: user.username.clone(),
                    email: user.email.clone(),
                    first_name: user.first_name.clone(),
                    last_name: user.last_name.clone(),
                })
                .collect(),
            auto_detected: false,
            source: SOURCE_USER_SELECTION.to_string(),
            timestamp: utc_string(timestamp),
        }
    }
}
