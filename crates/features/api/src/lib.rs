//! Versioned JSON API blueprint, mounted under [`PREFIX`].
//!
//! Serves service metadata so clients can discover the deployment they talk to.

mod error;

pub use crate::error::{ApiError, ApiErrorExt, ErrorBody};

use axum::Json;
use axum::extract::{Path, State};
use crwa_kernel::prelude::*;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

pub const NAME: &str = "api";
pub const PREFIX: &str = "/api/v1";

#[api_model]
/// Links to the API documentation
pub struct DocsLinks {
    /// Interactive documentation UI
    pub ui: String,
    /// Machine-readable `OpenAPI` document
    pub spec: String,
}

#[api_model]
/// Deployment metadata
pub struct ServiceInfo {
    pub title: String,
    pub version: String,
    /// `development`, `testing` or `production`
    pub environment: String,
    /// `true` when the service runs without its secrets
    pub degraded: bool,
    /// Registered blueprints, in registration order
    pub blueprints: Vec<String>,
    /// Absent when documentation is disabled
    pub docs: Option<DocsLinks>,
}

#[api_model]
/// Registration status of one blueprint
pub struct BlueprintStatus {
    pub name: String,
    pub registered: bool,
}

#[api_handler(
    get,
    path = "/info",
    responses((status = OK, description = "Service metadata", body = ServiceInfo)),
    tag = API_TAG,
)]
async fn info_handler(State(state): State<AppState>) -> Json<ServiceInfo> {
    let docs = &state.config.docs;
    Json(ServiceInfo {
        title: docs.title.clone(),
        version: docs.version.clone(),
        environment: state.config.environment.to_string(),
        degraded: state.degraded,
        blueprints: state.blueprints.clone(),
        docs: docs
            .enabled
            .then(|| DocsLinks { ui: docs.ui_path.clone(), spec: docs.spec_path.clone() }),
    })
}

#[api_handler(
    get,
    path = "/blueprints/{name}",
    params(("name" = String, Path, description = "Blueprint name")),
    responses(
        (status = OK, description = "Blueprint is registered", body = BlueprintStatus),
        (status = NOT_FOUND, description = "Blueprint is not registered", body = ErrorBody),
    ),
    tag = API_TAG,
)]
async fn blueprint_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<BlueprintStatus>, ApiError> {
    if state.has_blueprint(&name) {
        Ok(Json(BlueprintStatus { name, registered: true }))
    } else {
        Err(ApiError::NotFound { message: format!("blueprint '{name}'").into(), context: None })
    }
}

/// Blueprint provider for the JSON API.
///
/// # Errors
/// Never fails; the signature matches [`BlueprintProvider`].
pub fn bp(_config: &AppConfig) -> Result<Blueprint, BlueprintError> {
    let router = OpenApiRouter::new()
        .routes(routes!(info_handler))
        .routes(routes!(blueprint_handler));

    tracing::debug!(prefix = PREFIX, "API blueprint built");

    Ok(Blueprint::new(NAME, router).with_prefix(PREFIX))
}
