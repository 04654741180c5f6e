//! API routes module

pub mod config;
pub mod schedule;

use std::sync::Arc;

use crate::api::state::AppState;
use axum::Router;

pub(crate) type SharedState = Arc<AppState>;

/// Create the combined API router
pub fn router() -> Router<SharedState> {
    Router::new()
        // Schedule meeting routes
        .nest("/schedule-meeting", schedule::router())
}
