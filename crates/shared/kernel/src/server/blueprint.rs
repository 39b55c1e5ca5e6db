//! Named route groups and their registration.
//!
//! Every blueprint crate exposes a provider `fn(&AppConfig) -> Result<Blueprint, BlueprintError>`.
//! The server collects them in a [`BlueprintRegistry`] and [`register_blueprints`] attaches the
//! selected ones to the application router.

use super::state::AppState;
use crwa_domain::config::AppConfig;
use fxhash::FxHashSet;
use std::borrow::Cow;
use std::fmt;
use tracing::{debug, info};
use utoipa::openapi::OpenApi;
use utoipa_axum::router::OpenApiRouter;

/// Failure reported by a blueprint provider.
pub type BlueprintError = Box<dyn std::error::Error + Send + Sync>;

/// Builds a blueprint from the resolved configuration.
pub type BlueprintProvider = fn(&AppConfig) -> Result<Blueprint, BlueprintError>;

#[crwa_derive::crwa_error]
pub enum RegistrarError {
    #[error("Unknown blueprint '{name}'{}", format_context(.context))]
    UnknownBlueprint { name: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Blueprint '{name}' failed to build{}: {reason}", format_context(.context))]
    Provider { name: Cow<'static, str>, reason: BlueprintError, context: Option<Cow<'static, str>> },

    #[error("Blueprint '{name}' is registered more than once{}", format_context(.context))]
    Duplicate { name: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Blueprint '{name}' has an invalid prefix '{prefix}'{}", format_context(.context))]
    InvalidPrefix {
        name: Cow<'static, str>,
        prefix: Cow<'static, str>,
        context: Option<Cow<'static, str>>,
    },

    #[error("Blueprint '{name}' redefines route {method} {path}{}", format_context(.context))]
    RouteConflict {
        name: Cow<'static, str>,
        method: Cow<'static, str>,
        path: Cow<'static, str>,
        context: Option<Cow<'static, str>>,
    },
}

/// A named group of routes, optionally mounted under a URL prefix.
pub struct Blueprint {
    name: Cow<'static, str>,
    prefix: Option<String>,
    router: OpenApiRouter<AppState>,
}

impl Blueprint {
    #[must_use]
    pub fn new(name: impl Into<Cow<'static, str>>, router: OpenApiRouter<AppState>) -> Self {
        Self { name: name.into(), prefix: None, router }
    }

    /// Mounts the routes under `prefix` (e.g. `/api/v1`).
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    #[must_use]
    pub const fn router(&self) -> &OpenApiRouter<AppState> {
        &self.router
    }
}

impl fmt::Debug for Blueprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Blueprint")
            .field("name", &self.name)
            .field("prefix", &self.prefix)
            .field("routes", &documented_routes(self.router.get_openapi(), self.prefix()))
            .finish()
    }
}

/// Ordered `(name, provider)` pairs. Names starting with `_` are private: they are only
/// registered when listed explicitly.
#[derive(Debug, Default, Clone)]
pub struct BlueprintRegistry {
    entries: Vec<(Cow<'static, str>, BlueprintProvider)>,
}

impl BlueprintRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn register(mut self, name: impl Into<Cow<'static, str>>, provider: BlueprintProvider) -> Self {
        self.entries.push((name.into(), provider));
        self
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<BlueprintProvider> {
        self.entries.iter().find(|(entry, _)| entry == name).map(|(_, provider)| *provider)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_ref())
    }

    /// Names registered when no explicit list is configured.
    pub fn public_names(&self) -> impl Iterator<Item = &str> {
        self.names().filter(|name| !name.starts_with('_'))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn first_duplicate(&self) -> Option<&str> {
        let mut seen = FxHashSet::default();
        self.names().find(|name| !seen.insert(*name))
    }
}

/// Attaches the selected blueprints to `router`.
///
/// With a non-empty `config.blueprints`, exactly those names are registered in that order.
/// Otherwise every public registry entry is registered in registry order. Each selected
/// provider is called once with `config`.
///
/// Returns the extended router and the names that were registered.
///
/// # Errors
/// * [`RegistrarError::UnknownBlueprint`] if a listed name is not in the registry.
/// * [`RegistrarError::Duplicate`] if a name is listed or registered twice.
/// * [`RegistrarError::Provider`] if a provider fails.
/// * [`RegistrarError::InvalidPrefix`] for a prefix that is empty, `/`, lacks the leading
///   slash or ends with one.
/// * [`RegistrarError::RouteConflict`] if a documented method and path is already taken, or
///   the path repeats a taken route shape under different parameter names.
pub fn register_blueprints(
    mut router: OpenApiRouter<AppState>,
    registry: &BlueprintRegistry,
    config: &AppConfig,
) -> Result<(OpenApiRouter<AppState>, Vec<String>), RegistrarError> {
    if let Some(name) = registry.first_duplicate() {
        return Err(RegistrarError::Duplicate {
            name: name.to_owned().into(),
            context: Some("registry".into()),
        });
    }

    let selected: Vec<&str> = match config.explicit_blueprints() {
        Some(list) => list.iter().map(String::as_str).collect(),
        None => registry.public_names().collect(),
    };

    let mut taken: FxHashSet<(&'static str, TakenRoute)> = documented_routes(router.get_openapi(), None)
        .into_iter()
        .map(|(method, path)| (method, TakenRoute { shape: route_shape(&path), path }))
        .collect();
    let mut registered: Vec<String> = Vec::with_capacity(selected.len());

    for name in selected {
        if registered.iter().any(|done| done == name) {
            return Err(RegistrarError::Duplicate {
                name: name.to_owned().into(),
                context: Some("blueprints".into()),
            });
        }

        let provider = registry
            .get(name)
            .ok_or_else(|| RegistrarError::UnknownBlueprint { name: name.to_owned().into(), context: None })?;

        let blueprint = provider(config).map_err(|reason| RegistrarError::Provider {
            name: name.to_owned().into(),
            reason,
            context: None,
        })?;

        if let Some(prefix) = blueprint.prefix() {
            validate_prefix(name, prefix)?;
        }

        for (method, path) in documented_routes(blueprint.router.get_openapi(), blueprint.prefix()) {
            let shape = route_shape(&path);
            // Same method on the same shape, or the same shape spelled with other parameter names.
            let overlap = taken
                .iter()
                .find(|(taken_method, other)| {
                    other.shape == shape && (*taken_method == method || other.path != path)
                })
                .map(|(_, other)| other.path.clone());
            if let Some(other) = overlap {
                return Err(RegistrarError::RouteConflict {
                    name: name.to_owned().into(),
                    method: method.into(),
                    context: (other != path).then(|| format!("overlaps {other}").into()),
                    path: path.into(),
                });
            }
            taken.insert((method, TakenRoute { shape, path }));
        }

        debug!(blueprint = name, prefix = blueprint.prefix(), "Registering blueprint");

        router = match blueprint.prefix {
            Some(prefix) => router.nest(&prefix, blueprint.router),
            None => router.merge(blueprint.router),
        };
        registered.push(name.to_owned());
    }

    info!(blueprints = ?registered, "Blueprints registered");

    Ok((router, registered))
}

/// `(METHOD, path)` pairs documented in `openapi`, with `prefix` prepended to each path.
#[must_use]
pub fn documented_routes(openapi: &OpenApi, prefix: Option<&str>) -> Vec<(&'static str, String)> {
    let prefix = prefix.unwrap_or_default();
    let mut routes = Vec::new();

    for (path, item) in &openapi.paths.paths {
        let full = if prefix.is_empty() {
            path.clone()
        } else if path == "/" {
            prefix.to_owned()
        } else {
            format!("{prefix}{path}")
        };

        let operations = [
            ("GET", item.get.is_some()),
            ("PUT", item.put.is_some()),
            ("POST", item.post.is_some()),
            ("DELETE", item.delete.is_some()),
            ("OPTIONS", item.options.is_some()),
            ("HEAD", item.head.is_some()),
            ("PATCH", item.patch.is_some()),
            ("TRACE", item.trace.is_some()),
        ];
        routes.extend(operations.into_iter().filter(|(_, present)| *present).map(|(m, _)| (m, full.clone())));
    }

    routes
}

#[derive(PartialEq, Eq, Hash)]
struct TakenRoute {
    shape: String,
    path: String,
}

/// `path` with every `{...}` segment replaced by `{}`.
///
/// Two paths with the same shape match the same requests, whatever their parameter names,
/// so the router accepts only one spelling of it.
///
/// ```rust
/// use crwa_kernel::server::route_shape;
///
/// assert_eq!(route_shape("/items/{id}/tags/{*rest}"), "/items/{}/tags/{}");
/// assert_eq!(route_shape("/items/{id}"), route_shape("/items/{name}"));
/// ```
#[must_use]
pub fn route_shape(path: &str) -> String {
    path.split('/')
        .map(|segment| if segment.starts_with('{') && segment.ends_with('}') { "{}" } else { segment })
        .collect::<Vec<_>>()
        .join("/")
}

fn validate_prefix(name: &str, prefix: &str) -> Result<(), RegistrarError> {
    if prefix.len() > 1 && prefix.starts_with('/') && !prefix.ends_with('/') {
        return Ok(());
    }
    Err(RegistrarError::InvalidPrefix {
        name: name.to_owned().into(),
        prefix: prefix.to_owned().into(),
        context: Some("prefixes must start with '/' and must not end with it".into()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_rules() {
        assert!(validate_prefix("api", "/api/v1").is_ok());
        for bad in ["", "/", "api", "/api/"] {
            assert!(
                matches!(validate_prefix("api", bad), Err(RegistrarError::InvalidPrefix { .. })),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn shapes_ignore_parameter_names() {
        assert_eq!(route_shape("/"), "/");
        assert_eq!(route_shape("/items/{id}"), "/items/{}");
        assert_eq!(route_shape("/items/{id}/tags"), route_shape("/items/{name}/tags"));
        assert_ne!(route_shape("/items/{id}"), route_shape("/items/id"));
    }

    #[test]
    fn registry_reports_first_duplicate() {
        fn empty(_: &AppConfig) -> Result<Blueprint, BlueprintError> {
            Ok(Blueprint::new("empty", OpenApiRouter::new()))
        }

        let registry =
            BlueprintRegistry::new().register("a", empty).register("b", empty).register("a", empty);
        assert_eq!(registry.first_duplicate(), Some("a"));
        assert_eq!(registry.len(), 3);
    }
}
