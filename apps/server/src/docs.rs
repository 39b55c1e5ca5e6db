//! API documentation: the interactive Scalar UI and the machine-readable `OpenAPI` spec.

use axum::routing::get;
use axum::{Json, Router};
use crwa::domain::config::DocsConfig;
use crwa::kernel::server::{documented_routes, route_shape};
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};
use utoipa::OpenApi;
use utoipa::openapi::extensions::ExtensionsBuilder;
use utoipa::openapi::info::{ContactBuilder, InfoBuilder};
use utoipa::openapi::OpenApi as OpenApiDoc;
use utoipa_scalar::{Scalar, Servable};

#[crwa_derive::crwa_error]
pub enum DocsError {
    #[error("Documentation title must not be empty{}", format_context(.context))]
    EmptyTitle { context: Option<Cow<'static, str>> },

    #[error("Invalid documentation mount path '{path}'{}", format_context(.context))]
    InvalidMountPath { path: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Documentation UI and spec share the mount path '{path}'{}", format_context(.context))]
    SharedMountPath { path: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Documentation mount path '{path}' collides with a registered route{}", format_context(.context))]
    RouteCollision { path: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

#[derive(OpenApi)]
pub(crate) struct ApiDoc;

/// Decides which route paths appear in the generated spec.
#[derive(Clone)]
pub struct RuleFilter(Arc<dyn Fn(&str) -> bool + Send + Sync>);

impl RuleFilter {
    pub fn new(filter: impl Fn(&str) -> bool + Send + Sync + 'static) -> Self {
        Self(Arc::new(filter))
    }

    /// Keeps paths under any of `prefixes`; an empty list keeps everything.
    #[must_use]
    pub fn prefixes(prefixes: &[String]) -> Self {
        let prefixes = prefixes.to_vec();
        Self::new(move |path| prefixes.is_empty() || prefixes.iter().any(|p| path.starts_with(p.as_str())))
    }

    #[must_use]
    pub fn includes(&self, path: &str) -> bool {
        (self.0)(path)
    }
}

impl Default for RuleFilter {
    fn default() -> Self {
        Self::new(|_| true)
    }
}

impl fmt::Debug for RuleFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RuleFilter(..)")
    }
}

/// Checks the documentation settings against the routes already served.
///
/// # Errors
/// * [`DocsError::EmptyTitle`] for a blank title.
/// * [`DocsError::InvalidMountPath`] if a mount path does not start with `/` or has a
///   segment the router rejects (`*rest`, `:id`, `{`, a `{*rest}` that is not last).
/// * [`DocsError::SharedMountPath`] if the UI and the spec use the same path.
/// * [`DocsError::RouteCollision`] if a mount path matches a documented route, parameter
///   names aside.
pub fn validate(docs: &DocsConfig, openapi: &OpenApiDoc) -> Result<(), DocsError> {
    if docs.title.trim().is_empty() {
        return Err(DocsError::EmptyTitle { context: None });
    }

    for (name, path) in [("ui_path", &docs.ui_path), ("spec_path", &docs.spec_path)] {
        if let Some(defect) = mount_path_defect(path) {
            return Err(DocsError::InvalidMountPath {
                path: path.clone().into(),
                context: Some(format!("{name}: {defect}").into()),
            });
        }
    }

    if route_shape(&docs.ui_path) == route_shape(&docs.spec_path) {
        return Err(DocsError::SharedMountPath { path: docs.ui_path.clone().into(), context: None });
    }

    let routes = documented_routes(openapi, None);
    for path in [&docs.ui_path, &docs.spec_path] {
        let shape = route_shape(path);
        if let Some((method, route)) = routes.iter().find(|(_, route)| route_shape(route) == shape) {
            return Err(DocsError::RouteCollision {
                path: path.clone().into(),
                context: Some(format!("{method} {route}").into()),
            });
        }
    }

    Ok(())
}

/// Why the router would refuse `path`, if it would.
fn mount_path_defect(path: &str) -> Option<&'static str> {
    if !path.starts_with('/') {
        return Some("must start with '/'");
    }

    let segments: Vec<&str> = path.split('/').skip(1).collect();
    for (index, segment) in segments.iter().enumerate() {
        if segment.starts_with('*') || segment.starts_with(':') {
            return Some("captures are written '{name}' or '{*name}'");
        }
        if !segment.contains(['{', '}']) {
            continue;
        }

        let inner = segment.strip_prefix('{').and_then(|rest| rest.strip_suffix('}'));
        let name = inner.map(|inner| inner.strip_prefix('*').unwrap_or(inner));
        match name {
            Some(name) if !name.is_empty() && !name.contains(['{', '}', '*']) => {},
            _ => return Some("malformed capture segment"),
        }
        if inner.is_some_and(|inner| inner.starts_with('*')) && index + 1 != segments.len() {
            return Some("'{*name}' must be the last segment");
        }
    }

    None
}

/// Fills in the title, description, version and contact of `openapi`, then drops every
/// path `filter` rejects.
#[must_use]
pub fn describe(mut openapi: OpenApiDoc, docs: &DocsConfig, filter: &RuleFilter) -> OpenApiDoc {
    let contact = ContactBuilder::new()
        .name(Some(docs.contact.organization.clone()))
        .url(docs.contact.url.clone())
        .email(docs.contact.email.clone())
        .extensions(Some(
            ExtensionsBuilder::new()
                .add("x-responsible-organization", docs.contact.organization.clone())
                .add("x-responsible-developer", docs.contact.developer.clone())
                .build(),
        ))
        .build();

    openapi.info = InfoBuilder::new()
        .title(docs.title.clone())
        .version(docs.version.clone())
        .description(Some(docs.description.clone()))
        .contact(Some(contact))
        .build();

    let before = openapi.paths.paths.len();
    openapi.paths.paths.retain(|path, _| filter.includes(path));
    debug!(kept = openapi.paths.paths.len(), dropped = before - openapi.paths.paths.len(), "Spec filtered");

    openapi
}

/// Mounts the Scalar UI at `docs.ui_path` and the JSON spec at `docs.spec_path`.
///
/// Returns `router` unchanged when documentation is disabled. The returned document is the
/// one served.
///
/// # Errors
/// See [`validate`].
pub fn attach(
    router: Router,
    openapi: OpenApiDoc,
    docs: &DocsConfig,
    filter: &RuleFilter,
) -> Result<(Router, OpenApiDoc), DocsError> {
    if !docs.enabled {
        debug!("Documentation disabled");
        return Ok((router, describe(openapi, docs, filter)));
    }

    validate(docs, &openapi)?;
    let openapi = describe(openapi, docs, filter);

    let spec = openapi.clone();
    let spec_route: Router = Router::new().route(
        &docs.spec_path,
        get(move || {
            let spec = spec.clone();
            async move { Json(spec) }
        }),
    );

    info!(ui = %docs.ui_path, spec = %docs.spec_path, paths = openapi.paths.paths.len(), "Documentation attached");

    let router = router
        .merge(spec_route)
        .merge(Scalar::with_url(docs.ui_path.clone(), openapi.clone()));

    Ok((router, openapi))
}
