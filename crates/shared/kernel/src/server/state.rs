use axum::extract::FromRef;
use crwa_domain::config::AppConfig;
use std::borrow::Cow;
use std::ops::Deref;
use std::sync::Arc;

#[crwa_derive::crwa_error]
pub enum AppStateError {
    #[error("State validation error{}: {message}", format_context(.context))]
    Validation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

#[derive(Debug)]
pub struct AppStateInner {
    pub config: AppConfig,
    /// Names of the registered blueprints, in registration order.
    pub blueprints: Vec<String>,
    /// Secrets were unavailable at startup and the service runs without them.
    pub degraded: bool,
}

/// State shared by every handler. Read-only after construction.
#[derive(Debug, Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

impl AppState {
    #[must_use]
    pub fn builder() -> AppStateBuilder {
        AppStateBuilder::default()
    }

    #[must_use]
    pub fn has_blueprint(&self, name: &str) -> bool {
        self.inner.blueprints.iter().any(|registered| registered == name)
    }
}

impl Deref for AppState {
    type Target = AppStateInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(state: &AppState) -> Self {
        state.inner.config.clone()
    }
}

#[derive(Debug, Default)]
pub struct AppStateBuilder {
    config: Option<AppConfig>,
    blueprints: Vec<String>,
    degraded: bool,
}

impl AppStateBuilder {
    #[must_use]
    pub fn config(mut self, config: AppConfig) -> Self {
        self.config = Some(config);
        self
    }

    #[must_use]
    pub fn blueprints<I>(mut self, names: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.blueprints = names.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub const fn degraded(mut self, degraded: bool) -> Self {
        self.degraded = degraded;
        self
    }

    /// # Errors
    /// Returns [`AppStateError::Validation`] if no configuration was provided.
    pub fn build(self) -> Result<AppState, AppStateError> {
        let config = self.config.ok_or_else(|| AppStateError::Validation {
            message: "AppConfig not provided".into(),
            context: None,
        })?;

        Ok(AppState {
            inner: Arc::new(AppStateInner {
                config,
                blueprints: self.blueprints,
                degraded: self.degraded,
            }),
        })
    }
}
