use super::health;
use super::state::AppState;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

/// Routes every deployment serves regardless of the blueprint selection.
pub fn system_router() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(health::health_handler))
}
