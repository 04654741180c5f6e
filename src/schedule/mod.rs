//! The schedule-meeting pipeline.
//!
//! validate and normalize start → resolve organizer and channel →
//! resolve participants → call the webhook → post a confirmation. Any stage may
//! stop the pipeline with a [`ScheduleError`].
pub mod datetime;
pub mod error;
pub mod formatter;
pub mod identity;
pub mod meeting;
pub mod participants;
pub mod request;
pub mod webhook;

pub use error::{FieldError, ScheduleError};
pub use formatter::ScheduleResponse;
pub use meeting::ResolvedMeeting;
pub use request::ScheduleRequest;
pub use webhook::{WebhookClient, WebhookError, WebhookPayload, WebhookReply};

use crate::core::{Clock, PluginConfig};
use crate::host::HostApi;

/// Outcome of a scheduled meeting.
#[derive(Clone, Debug)]
pub struct ScheduledMeeting {
    pub room_url: String,
    /// `None` when the confirmation post could not be created.
    pub post_id: Option<String>,
}

pub struct Scheduler<'a> {
    pub host: &'a dyn HostApi,
    pub webhook: &'a WebhookClient,
    pub clock: &'a dyn Clock,
}

impl Scheduler<'_> {
    pub async fn schedule(
        &self,
        body: &[u8],
        config: &PluginConfig,
    ) -> Result<ScheduledMeeting, ScheduleError> {
        let now = self.clock.now();
        let (req, start) = request::validate(body, now).map_err(ScheduleError::Invalid)?;

        let organizer = identity::resolve_user(self.host, &req.user_id)
            .await
            .map_err(|_| ScheduleError::UserNotFound(req.user_id.clone()))?;
        let channel = identity::resolve_channel(self.host, &req.channel_id)
            .await
            .map_err(|_| ScheduleError::ChannelNotFound(req.channel_id.clone()))?;
        tracing::info!(
            user_id = %organizer.id,
            channel_id = %channel.id,
            channel_type = channel.channel_type.as_str(),
            "Organizer and channel loaded"
        );

        let participants = participants::resolve_participants(
            self.host,
            &req.participant_ids,
            &organizer.id,
            &channel,
        )
        .await
        .map_err(ScheduleError::invalid)?;

        if !config.is_webhook_configured() {
            tracing::error!("Webhook URL is not configured");
            return Err(ScheduleError::WebhookNotConfigured);
        }

        let meeting = ResolvedMeeting::new(req, start, organizer, channel, participants.users);
        let payload = meeting.to_payload(now);
        let reply = self.webhook.send(&config.webhook_url, &payload).await?;

        let room_url = match reply.join_url() {
            Some(url) => url.to_string(),
            None => {
                tracing::error!(fields = ?reply.fields.keys().collect::<Vec<_>>(), "Webhook returned no room URL");
                return Err(ScheduleError::MissingRoomUrl);
            }
        };

        // The meeting exists downstream at this point, a failed post is only logged
        let post = formatter::confirmation_post(&meeting, &room_url);
        let post_id = match self.host.create_post(post).await {
            Ok(post) => {
                tracing::info!(post_id = %post.id, "Confirmation post created");
                Some(post.id)
            }
            Err(err) => {
                tracing::error!("Failed to create confirmation post: {}", err);
                None
            }
        };

        tracing::info!(
            room_url = %room_url,
            scheduled_at = %meeting.start.instant,
            "Meeting scheduled"
        );

        Ok(ScheduledMeeting { room_url, post_id })
    }
}
