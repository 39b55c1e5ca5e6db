mod blueprint;
mod health;
mod router;
mod state;

pub use blueprint::{
    Blueprint, BlueprintError, BlueprintProvider, BlueprintRegistry, RegistrarError,
    RegistrarErrorExt, documented_routes, register_blueprints, route_shape,
};
pub use health::HealthResponse;
pub use router::system_router;
pub use state::{AppState, AppStateBuilder, AppStateError, AppStateErrorExt, AppStateInner};
