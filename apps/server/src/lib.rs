//! # CRWA Flagging Server
//!
//! Application factory for the flagging service, built on `Axum` with `utoipa` documentation.
//!
//! [`create_app`] runs the startup sequence once and returns a ready [`App`]:
//!
//! 1. Resolve the configuration ([`ConfigSource`]).
//! 2. Load secrets from the vault (fatal in production, degraded elsewhere).
//! 3. Register the selected blueprints.
//! 4. Attach the documentation UI and the `OpenAPI` spec.
//!
//! ## Example
//! ```no_run
//! use crwa_server::create_app;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     create_app("development")?.serve().await
//! }
//! ```

pub mod docs;
mod error;
pub mod secrets;

pub use crate::docs::{DocsError, DocsErrorExt, RuleFilter};
pub use crate::error::{AppError, AppErrorExt};
pub use crwa::kernel::config::ConfigSource;

use crate::docs::ApiDoc;
use crate::secrets::{Secrets, load_secrets};
use anyhow::{Context, Result};
use axum::Router;
use axum_server::Handle;
use crwa::domain::config::AppConfig;
use crwa::kernel::server::{AppState, BlueprintRegistry, register_blueprints, system_router};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use utoipa::OpenApi;
use utoipa::openapi::OpenApi as OpenApiDoc;
use utoipa_axum::router::OpenApiRouter;

const SHUTDOWN_GRACE: Duration = Duration::from_secs(30);

/// Builds the application from `source`: an [`AppConfig`], a profile name, an
/// [`Environment`](crwa::domain::Environment), or `None` to read `CRWA_ENV`.
///
/// # Errors
/// Returns an [`AppError`] when the configuration cannot be resolved, secrets are missing in
/// production, a blueprint fails to register, or the documentation settings are invalid.
pub fn create_app(source: impl Into<ConfigSource>) -> Result<App, AppError> {
    App::builder().config(source).build()
}

/// A fluent builder for the [`App`], for callers that need a custom blueprint list or spec
/// filter.
#[must_use = "builders do nothing unless you call .build()"]
#[derive(Debug, Default)]
pub struct AppBuilder {
    source: ConfigSource,
    registry: Option<BlueprintRegistry>,
    rule_filter: Option<RuleFilter>,
}

impl AppBuilder {
    pub fn config(mut self, source: impl Into<ConfigSource>) -> Self {
        self.source = source.into();
        self
    }

    /// Replaces the compiled-in blueprints.
    pub fn registry(mut self, registry: BlueprintRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Decides which routes are documented. Overrides `docs.include_prefixes`.
    pub fn rule_filter(mut self, filter: impl Fn(&str) -> bool + Send + Sync + 'static) -> Self {
        self.rule_filter = Some(RuleFilter::new(filter));
        self
    }

    /// Runs the startup sequence.
    ///
    /// # Errors
    /// See [`create_app`].
    pub fn build(self) -> Result<App, AppError> {
        let mut config = self.source.resolve()?;

        let degraded = load_secrets(&mut config)? == Secrets::Degraded;

        let registry = self.registry.unwrap_or_else(crwa::blueprints);
        let router = OpenApiRouter::with_openapi(ApiDoc::openapi()).merge(system_router());
        let (router, blueprints) = register_blueprints(router, &registry, &config)?;

        let state = AppState::builder()
            .config(config.clone())
            .blueprints(blueprints)
            .degraded(degraded)
            .build()?;

        let (router, openapi) = router
            .layer(TraceLayer::new_for_http())
            .with_state(state.clone())
            .split_for_parts();

        let filter =
            self.rule_filter.unwrap_or_else(|| RuleFilter::prefixes(&config.docs.include_prefixes));
        let (router, openapi) = docs::attach(router, openapi, &config.docs, &filter)?;

        info!(
            environment = %config.environment,
            blueprints = ?state.blueprints,
            degraded,
            "Application ready"
        );

        Ok(App { state, router, openapi })
    }
}

/// A fully constructed application. Not mutated after [`create_app`] returns.
#[must_use = "call .serve().await to start the server"]
#[derive(Debug)]
pub struct App {
    state: AppState,
    router: Router,
    openapi: OpenApiDoc,
}

impl App {
    pub fn builder() -> AppBuilder {
        AppBuilder::default()
    }

    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.state.config
    }

    #[must_use]
    pub const fn state(&self) -> &AppState {
        &self.state
    }

    /// Names of the registered blueprints, in registration order.
    #[must_use]
    pub fn blueprints(&self) -> &[String] {
        &self.state.blueprints
    }

    /// Secrets were unavailable and the app runs without them.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.state.degraded
    }

    /// The generated `OpenAPI` document, as served.
    #[must_use]
    pub const fn openapi(&self) -> &OpenApiDoc {
        &self.openapi
    }

    /// A handle to the routes, for in-process requests.
    #[must_use]
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    #[must_use]
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Serves on `server.address:server.port` until Ctrl+C or SIGTERM.
    ///
    /// # Errors
    /// Returns an error if the listener cannot bind to the configured address.
    pub async fn serve(self) -> Result<()> {
        let address = SocketAddr::new(self.config().server.address, self.config().server.port);

        let handle = Handle::<SocketAddr>::new();
        let shutdown_handle = handle.clone();

        tokio::spawn(async move {
            if let Err(e) = shutdown_signal().await {
                error!("Error while waiting for shutdown signal: {e}");
                return;
            }
            info!("Shutdown signal received, starting graceful shutdown...");
            shutdown_handle.graceful_shutdown(Some(SHUTDOWN_GRACE));
        });

        info!("Starting HTTP server on http://{address}");

        axum_server::bind(address)
            .handle(handle)
            .serve(self.router.into_make_service())
            .await
            .context("HTTP server failed")?;

        info!("Server shutdown complete");
        Ok(())
    }
}

/// Waits for SIGINT (Ctrl+C) or, on unix, SIGTERM.
async fn shutdown_signal() -> Result<()> {
    let ctrl_c = async { signal::ctrl_c().await.context("Failed to install Ctrl+C handler") };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .context("Failed to install SIGTERM handler")?
            .recv()
            .await;
        Ok::<_, anyhow::Error>(())
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<Result<()>>();

    tokio::select! {
        res = ctrl_c => res?,
        res = terminate => res?,
    }

    Ok(())
}
