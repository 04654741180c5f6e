//! Router for the config API

use axum::{Json, Router, extract::State, routing::get};

use super::public::ConfigResponse;
use crate::api::public::ApiError;
use crate::api::routes::SharedState;

/// Cached plugin settings as seen by the webapp
async fn get_config(State(state): State<SharedState>) -> Json<ConfigResponse> {
    let config = state.settings.get();
    Json(ConfigResponse::from(config.as_ref()))
}

async fn method_not_allowed() -> ApiError {
    ApiError::method_not_allowed("GET")
}

/// Create the config router
pub fn router() -> Router<SharedState> {
    Router::new().route("/", get(get_config).fallback(method_not_allowed))
}
