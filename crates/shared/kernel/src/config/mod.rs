use config::{Config, Environment as EnvSource, File, FileFormat};
use crwa_domain::Environment;
use crwa_domain::config::{AppConfig, AppConfigInner};
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::info;

/// Ambient deployment indicator, read only when no explicit configuration is given.
pub const ENV_VAR: &str = "CRWA_ENV";

/// Prefix of override variables, e.g. `CRWA__SERVER__PORT=8080`.
pub const ENV_PREFIX: &str = "CRWA";

/// Directory holding the optional per-environment TOML files.
pub const CONFIG_DIR: &str = "config";

#[crwa_derive::crwa_error]
pub enum ConfigError {
    #[error(
        "Unknown environment '{value}'{}: expected development, testing or production",
        format_context(.context)
    )]
    UnknownEnvironment { value: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// Interprets a raw indicator value. Unset or blank means [`Environment::Production`].
///
/// # Errors
/// [`ConfigError::UnknownEnvironment`] for any other unrecognized value.
pub fn environment_from_value(value: Option<&str>) -> Result<Environment, ConfigError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(Environment::Production),
        Some(raw) => Environment::parse(raw).ok_or_else(|| ConfigError::UnknownEnvironment {
            value: raw.to_owned().into(),
            context: Some(ENV_VAR.into()),
        }),
    }
}

/// Reads [`ENV_VAR`] once and interprets it.
///
/// # Errors
/// See [`environment_from_value`].
pub fn ambient_environment() -> Result<Environment, ConfigError> {
    environment_from_value(std::env::var(ENV_VAR).ok().as_deref())
}

/// `config/<environment>.toml`.
#[must_use]
pub fn default_config_path(environment: Environment) -> PathBuf {
    Path::new(CONFIG_DIR).join(format!("{environment}.toml"))
}

/// Layered configuration loader.
///
/// 1. **Profile**: the built-in defaults of `environment`.
/// 2. **File**: `path`, or `config/<environment>.toml` when `None`. An explicit path must
///    exist; the default one is optional.
/// 3. **Environment overrides**: variables prefixed with `CRWA__`, nested with `__`
///    (`CRWA__DOCS__TITLE` maps to `docs.title`). `CRWA__BLUEPRINTS` takes a comma list.
///
/// The `environment` field of the result always equals `environment`.
///
/// # Errors
/// Returns [`ConfigError::Config`] if the file is missing (explicit path only), malformed,
/// or does not match the configuration structure.
///
/// # Example
/// ```rust
/// use crwa_kernel::config::load_config;
/// use crwa_kernel::domain::Environment;
///
/// let cfg = load_config(Environment::Development, None).unwrap();
/// assert!(cfg.debug);
/// ```
pub fn load_config(environment: Environment, path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let required = path.is_some();
    let path = path.map_or_else(|| default_config_path(environment), Path::to_path_buf);

    let profile = AppConfigInner::for_environment(environment);

    let mut inner = Config::builder()
        .add_source(Config::try_from(&profile).context("Failed to encode profile defaults")?)
        .add_source(File::from(path.as_path()).format(FileFormat::Toml).required(required))
        .add_source(
            EnvSource::with_prefix(ENV_PREFIX)
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("blueprints")
                .try_parsing(true),
        )
        .build()
        .context("Failed to build config")?
        .try_deserialize::<AppConfigInner>()
        .context("Failed to deserialize config")?;

    inner.environment = environment;

    info!(%environment, file = %path.display(), "Configuration loaded");

    Ok(inner.into())
}

/// What `create_app` was asked to build from.
#[derive(Debug, Clone, Default)]
pub enum ConfigSource {
    /// Read [`ENV_VAR`] and load the layered configuration for it.
    #[default]
    Ambient,
    /// The built-in profile of an environment.
    Environment(Environment),
    /// A profile name such as `"testing"` or `"prod"`.
    Named(String),
    /// A fully built configuration, used as is.
    Config(AppConfig),
}

impl ConfigSource {
    /// Produces the configuration this source stands for.
    ///
    /// Explicit sources never consult the environment; only [`ConfigSource::Ambient`] does.
    ///
    /// # Errors
    /// [`ConfigError::UnknownEnvironment`] for unknown names or indicator values, and any
    /// error of [`load_config`] for the ambient source.
    pub fn resolve(self) -> Result<AppConfig, ConfigError> {
        match self {
            Self::Ambient => load_config(ambient_environment()?, None),
            Self::Environment(environment) => Ok(AppConfig::for_environment(environment)),
            Self::Named(name) => Environment::parse(&name)
                .map(AppConfig::for_environment)
                .ok_or_else(|| ConfigError::UnknownEnvironment { value: name.into(), context: None }),
            Self::Config(cfg) => Ok(cfg),
        }
    }
}

impl From<AppConfig> for ConfigSource {
    fn from(cfg: AppConfig) -> Self {
        Self::Config(cfg)
    }
}

impl From<Option<AppConfig>> for ConfigSource {
    fn from(cfg: Option<AppConfig>) -> Self {
        cfg.map_or(Self::Ambient, Self::Config)
    }
}

impl From<Environment> for ConfigSource {
    fn from(environment: Environment) -> Self {
        Self::Environment(environment)
    }
}

impl From<&str> for ConfigSource {
    fn from(name: &str) -> Self {
        Self::Named(name.to_owned())
    }
}

impl From<String> for ConfigSource {
    fn from(name: String) -> Self {
        Self::Named(name)
    }
}
