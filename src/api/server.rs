use std::any::Any;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use axum::response::{IntoResponse, Response};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use super::public::ApiError;
use super::routes;
use crate::api::state::AppState;
use crate::core::{AppConfig, ConfigCache, FileSettings, SystemClock};
use crate::host::MattermostHost;
use crate::schedule::WebhookClient;

// A panicking handler answers this request with a 500 and leaves every
// other request untouched.
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };
    tracing::error!("Handler panicked: {}", detail);
    ApiError::internal().into_response()
}

pub fn app(shared_state: Arc<AppState>) -> Router {
    let cors = CorsLayer::permissive();

    Router::new()
        // Plugin settings for the webapp
        .nest("/config", routes::config::router())
        // API routes
        .nest("/api", routes::router())
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(Arc::clone(&shared_state))
}

pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                // axum logs rejections from built-in extractors with the `axum::rejection`
                // target, at `TRACE` level. `axum::rejection=trace` enables showing those events
                format! {
                    "{}=debug,tower_http=debug,axum::rejection=trace",
                    env!("CARGO_CRATE_NAME")
                }
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

// Settings changes are announced with SIGHUP. The cache is dropped and
// reloaded by the next request.
#[cfg(unix)]
fn spawn_settings_reload(shared_state: Arc<AppState>) -> Result<()> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut hangup =
        signal(SignalKind::hangup()).context("Failed to install SIGHUP handler")?;
    tokio::spawn(async move {
        while hangup.recv().await.is_some() {
            tracing::info!("Received SIGHUP, reloading plugin settings");
            shared_state.settings.invalidate();
        }
    });
    Ok(())
}

#[cfg(not(unix))]
fn spawn_settings_reload(_shared_state: Arc<AppState>) -> Result<()> {
    Ok(())
}

// Run the server
pub async fn serve(host: String, port: String, config: AppConfig) -> Result<()> {
    init_tracing();

    let mattermost = MattermostHost::new(&config.mattermost_url, &config.mattermost_token);
    let settings = ConfigCache::new(Arc::new(FileSettings::new(&config.settings_path)));
    let webhook = WebhookClient::new(config.webhook_timeout)?;

    let app_state = AppState::new(
        Arc::new(mattermost),
        settings,
        webhook,
        Arc::new(SystemClock),
    );
    let shared_state = Arc::new(app_state);

    let plugin_config = shared_state.settings.get();
    if plugin_config.is_webhook_configured() {
        tracing::info!(webhook_url = %plugin_config.webhook_url, "Plugin configured");
    } else {
        tracing::warn!("Webhook URL is not configured");
    }

    spawn_settings_reload(Arc::clone(&shared_state))?;

    let app = app(Arc::clone(&shared_state));
    let listener = tokio::net::TcpListener::bind(format!("{}:{}", host, port))
        .await
        .with_context(|| format!("Failed to bind {}:{}", host, port))?;

    tracing::debug!("Server started. Listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
