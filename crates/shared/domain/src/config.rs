use crate::constants::SIGNING_SECRET_PATH;
use crate::environment::Environment;
use crate::keys::{KeyBundle, SigningSecret};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{IpAddr, Ipv4Addr};
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;
use std::sync::Arc;

/// Top-level application configuration.
///
/// `keys` and `secret_key` are reserved slots filled from the vault at startup; they are
/// never read from configuration files.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfigInner {
    pub environment: Environment,
    pub debug: bool,
    pub testing: bool,
    pub server: ServerConfig,
    /// Explicit blueprint list. `None` (or an empty list) registers every public blueprint.
    pub blueprints: Option<Vec<String>>,
    pub vault: VaultConfig,
    pub docs: DocsConfig,
    pub logging: LoggingConfig,
    #[serde(skip)]
    pub keys: Option<KeyBundle>,
    #[serde(skip)]
    pub secret_key: Option<SigningSecret>,
}

/// Thin Arc-wrapped config for inexpensive cloning into subsystems.
#[derive(Default, Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(flatten, default)]
    inner: Arc<AppConfigInner>,
}

impl AppConfig {
    /// Returns the built-in profile for `environment`.
    #[must_use]
    pub fn for_environment(environment: Environment) -> Self {
        Self { inner: Arc::new(AppConfigInner::for_environment(environment)) }
    }

    /// Blueprint names explicitly requested, or `None` when all should be registered.
    #[must_use]
    pub fn explicit_blueprints(&self) -> Option<&[String]> {
        self.inner.blueprints.as_deref().filter(|list| !list.is_empty())
    }
}

impl From<AppConfigInner> for AppConfig {
    fn from(inner: AppConfigInner) -> Self {
        Self { inner: Arc::new(inner) }
    }
}

impl From<Environment> for AppConfig {
    fn from(environment: Environment) -> Self {
        Self::for_environment(environment)
    }
}

impl Deref for AppConfig {
    type Target = AppConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for AppConfig {
    fn deref_mut(&mut self) -> &mut AppConfigInner {
        Arc::make_mut(&mut self.inner)
    }
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub address: IpAddr,
    pub port: u16,
}

/// Location and unlocking of the encrypted credential store.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VaultConfig {
    pub path: PathBuf,
    /// Falls back to the `VAULT_PASSWORD` environment variable when unset.
    pub password: Option<String>,
    /// Dotted `group.field` path of the signing secret inside the bundle.
    pub signing_secret: String,
}

/// API documentation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DocsConfig {
    pub enabled: bool,
    pub title: String,
    pub description: String,
    pub version: String,
    /// Interactive UI mount path.
    pub ui_path: String,
    /// Machine-readable spec mount path.
    pub spec_path: String,
    /// Only document routes under these prefixes; empty documents everything.
    pub include_prefixes: Vec<String>,
    pub contact: DocsContact,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DocsContact {
    pub organization: String,
    pub developer: String,
    pub url: Option<String>,
    pub email: Option<String>,
}

/// Logging output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default level directive (`trace`, `debug`, `info`, `warn`, `error`).
    pub level: String,
    pub console: bool,
    pub json: bool,
    /// Directory for rolling log files; console only when unset.
    pub directory: Option<PathBuf>,
    /// How often a new log file starts: `minutely`, `hourly`, `daily` or `never`.
    pub rotation: String,
    /// Rolled files kept in `directory`.
    pub max_files: usize,
    /// Extra filter directives, e.g. `crwa_kernel=debug,tower_http=info`.
    pub env_filter: Option<String>,
}

// --- Default ---

impl Default for AppConfigInner {
    fn default() -> Self {
        Self::for_environment(Environment::default())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { address: IpAddr::V4(Ipv4Addr::UNSPECIFIED), port: 5000 }
    }
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("vault.bin"),
            password: None,
            signing_secret: SIGNING_SECRET_PATH.to_owned(),
        }
    }
}

impl fmt::Debug for VaultConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VaultConfig")
            .field("path", &self.path)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("signing_secret", &self.signing_secret)
            .finish()
    }
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            title: "CRWA Public Flagging API".to_owned(),
            description: "API for the Charles River Watershed Association's predictive models, \
                          and the data used for those models."
                .to_owned(),
            version: env!("CARGO_PKG_VERSION").to_owned(),
            ui_path: "/api/docs".to_owned(),
            spec_path: "/api/reach_api.json".to_owned(),
            include_prefixes: Vec::new(),
            contact: DocsContact::default(),
        }
    }
}

impl Default for DocsContact {
    fn default() -> Self {
        Self {
            organization: "Charles River Watershed Association".to_owned(),
            developer: "Code for Boston".to_owned(),
            url: Some("https://www.codeforboston.org".to_owned()),
            email: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            console: true,
            json: false,
            directory: None,
            rotation: "daily".to_owned(),
            max_files: 10,
            env_filter: None,
        }
    }
}
