//! Confirmation post and success response.
use serde::{Deserialize, Serialize};

use super::datetime::TimeSource;
use super::meeting::ResolvedMeeting;
use crate::host::NewPost;

pub const STATUS_SUCCESS: &str = "success";
pub const SUCCESS_MESSAGE: &str = "Meeting created successfully";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScheduleResponse {
    pub status: String,
    pub message: String,
    pub room_url: String,
}

impl ScheduleResponse {
    pub fn success(room_url: &str) -> Self {
        Self {
            status: STATUS_SUCCESS.to_string(),
            message: SUCCESS_MESSAGE.to_string(),
            room_url: room_url.to_string(),
        }
    }
}

/// Start time as shown in the channel, e.g. `01.06.2025, 10:00 (Europe/Moscow)`.
pub fn display_start(meeting: &ResolvedMeeting) -> String {
    match meeting.start.source {
        TimeSource::Local => format!(
            "{} ({})",
            meeting.start.local.format("%d.%m.%Y, %H:%M"),
            meeting.timezone
        ),
        TimeSource::Utc => format!("{} (UTC)", meeting.start.instant.format("%d.%m.%Y, %H:%M")),
    }
}

pub fn post_message(meeting: &ResolvedMeeting, room_url: &str) -> String {
    let mentions = meeting
        .participants
        .iter()
        .map(|user| format!("@{}", user.username))
        .collect::<Vec<_>>()
        .join(", ");

    let mut message = format!(
        "📅 @{} scheduled a meeting for {}\n\n",
        meeting.organizer.username,
        display_start(meeting)
    );
    if !meeting.title.is_empty() {
        message.push_str(&format!("📝 {}\n\n", meeting.title));
    }
    message.push_str(&format!("👥 Participants: {}\n\n", mentions));
    message.push_str(&format!("⏱ Duration: {} minutes", meeting.duration_minutes));
    if !room_url.is_empty() {
        message.push_str(&format!("\n\n[🔗 Join meeting]({})", room_url));
    }
    message
}

/// Confirmation post authored by the organizer, threaded when asked to.
pub fn confirmation_post(meeting: &ResolvedMeeting, room_url: &str) -> NewPost {
    NewPost {
        channel_id: meeting.channel.id.clone(),
        user_id: meeting.organizer.id.clone(),
        message: post_message(meeting, room_url),
        root_id: meeting.root_id.clone(),
    }
}
