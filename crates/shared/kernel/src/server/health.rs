use super::state::AppState;
use axum::extract::State;
use axum::http::header;
use axum::{Json, response::IntoResponse};
use crwa_derive::{api_handler, api_model};
use crwa_domain::constants::SYSTEM_TAG;
use std::sync::LazyLock;
use std::time::Instant;

#[api_model]
/// Health check response
pub struct HealthResponse {
    /// `up`, or `degraded` when secrets were unavailable at startup
    pub status: String,
    /// Service version
    pub version: String,
    /// Deployment environment
    pub environment: String,
    /// Uptime in seconds
    pub uptime: u64,
}

static START_TIME: LazyLock<Instant> = LazyLock::new(Instant::now);

#[api_handler(
    get,
    path = "/health",
    responses((status = OK, description = "Healthcheck endpoint", body = HealthResponse)),
    tag = SYSTEM_TAG,
)]
pub(super) async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let body = HealthResponse {
        status: if state.degraded { "degraded" } else { "up" }.to_owned(),
        version: env!("CARGO_PKG_VERSION").to_owned(),
        environment: state.config.environment.to_string(),
        uptime: START_TIME.elapsed().as_secs(),
    };

    (
        [
            (header::CACHE_CONTROL, "no-store, no-cache, must-revalidate"),
            (header::PRAGMA, "no-cache"),
        ],
        Json(body),
    )
}
