//! Facade crate for the flagging service blueprints and shared modules.
//! Re-exports domain/kernel primitives and aggregates blueprint registration.
//! Keep this crate thin: it should compose other crates, not implement business logic.
//!
//! ## Usage
//! - Add `crwa` with the desired blueprint features (`api`/`flagging`, both on by default).
//! - Pass [`blueprints`] to the application factory; extend it as new blueprints appear.

pub use crwa_domain as domain;
pub use crwa_kernel as kernel;

pub mod server {
    pub use crwa_kernel::server::{
        Blueprint, BlueprintError, BlueprintRegistry, register_blueprints, system_router,
    };
}

/// Blueprint crates compiled into this build.
pub mod blueprints {
    #[cfg(feature = "api")]
    pub use crwa_api as api;
    #[cfg(feature = "flagging")]
    pub use crwa_flagging as flagging;

    /// Build-time enabled blueprints (by Cargo feature), in registration order.
    pub const ENABLED: &[&str] = &[
        #[cfg(feature = "api")]
        crwa_api::NAME,
        #[cfg(feature = "flagging")]
        crwa_flagging::NAME,
    ];
}

/// The registration list of every compiled-in blueprint.
///
/// Order matters: without an explicit `blueprints` setting, registration follows it.
#[must_use]
pub fn blueprints() -> crwa_kernel::server::BlueprintRegistry {
    let registry = crwa_kernel::server::BlueprintRegistry::new();

    #[cfg(feature = "api")]
    let registry = registry.register(crwa_api::NAME, crwa_api::bp);

    #[cfg(feature = "flagging")]
    let registry = registry.register(crwa_flagging::NAME, crwa_flagging::bp);

    registry
}
