//! Expands and resolves the participant list.
use itertools::Itertools;

use super::error::{FIELD_PARTICIPANT_IDS, FieldError};
use super::identity::resolve_user;
use crate::host::{Channel, HostApi, User};

#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedParticipants {
    pub users: Vec<User>,
    /// Ids that did not resolve and were left out.
    pub failed_ids: Vec<String>,
}

/// Final list of participant ids to look up.
///
/// Duplicates are dropped keeping the first occurrence. In a direct
/// channel the other member is added when missing.
pub fn participant_ids(requested: &[String], organizer_id: &str, channel: &Channel) -> Vec<String> {
    let mut ids: Vec<String> = requested.iter().unique().cloned().collect();

    if channel.is_direct() {
        match channel.other_user_for_dm(organizer_id) {
            Some(other) if !ids.contains(&other) => {
                tracing::debug!("Adding direct channel member {} to participants", other);
                ids.push(other);
            }
            Some(_) => {}
            None => tracing::warn!(
                channel_id = %channel.id,
                "Could not get the other member of direct channel"
            ),
        }
    }

    ids
}

pub async fn resolve_participants(
    host: &dyn HostApi,
    requested: &[String],
    organizer_id: &str,
    channel: &Channel,
) -> Result<ResolvedParticipants, FieldError> {
    let ids = participant_ids(requested, organizer_id, channel);

    if ids.is_empty() {
        let message = if channel.is_direct() {
            "Could not determine the direct-message participant"
        } else {
            "Select at least one participant"
        };
        tracing::warn!(
            channel_id = %channel.id,
            channel_type = channel.channel_type.as_str(),
            "No participants to invite"
        );
        return Err(FieldError::new(FIELD_PARTICIPANT_IDS, message));
    }

    let mut users = Vec::with_capacity(ids.len());
    let mut failed_ids = vec![];
    for id in &ids {
        match resolve_user(host, id).await {
            Ok(user) => users.push(user),
            Err(err) => {
                tracing::warn!("Skipping participant {}: {}", id, err.reason);
                failed_ids.push(id.clone());
            }
        }
    }

    if users.is_empty() {
        tracing::error!(
            requested_count = ids.len(),
            failed_ids = ?failed_ids,
            "No valid participants found"
        );
        return Err(FieldError::new(
            FIELD_PARTICIPANT_IDS,
            format!(
                "Could not load participant information (requested: {}, found: 0)",
                ids.len()
            ),
        ));
    }

    tracing::info!(
        requested_count = ids.len(),
        loaded_count = users.len(),
        failed_count = failed_ids.len(),
        "Participants loaded"
    );

    Ok(ResolvedParticipants { users, failed_ids })
}
