//! Built-in configuration profiles, one per [`Environment`].

use crate::config::{AppConfigInner, DocsConfig, LoggingConfig, ServerConfig, VaultConfig};
use crate::environment::Environment;
use std::net::{IpAddr, Ipv4Addr};

impl AppConfigInner {
    /// Total mapping from environment to its profile.
    #[must_use]
    pub fn for_environment(environment: Environment) -> Self {
        match environment {
            Environment::Development => development(),
            Environment::Testing => testing(),
            Environment::Production => production(),
        }
    }
}

fn base(environment: Environment) -> AppConfigInner {
    AppConfigInner {
        environment,
        debug: false,
        testing: false,
        server: ServerConfig::default(),
        blueprints: None,
        vault: VaultConfig::default(),
        docs: DocsConfig::default(),
        logging: LoggingConfig::default(),
        keys: None,
        secret_key: None,
    }
}

fn development() -> AppConfigInner {
    let mut cfg = base(Environment::Development);
    cfg.debug = true;
    cfg.server.address = IpAddr::V4(Ipv4Addr::LOCALHOST);
    cfg.logging.level = "debug".to_owned();
    cfg
}

fn testing() -> AppConfigInner {
    let mut cfg = base(Environment::Testing);
    cfg.debug = true;
    cfg.testing = true;
    cfg.server.address = IpAddr::V4(Ipv4Addr::LOCALHOST);
    cfg.server.port = 0;
    cfg.logging.level = "warn".to_owned();
    cfg
}

fn production() -> AppConfigInner {
    let mut cfg = base(Environment::Production);
    cfg.logging.json = true;
    cfg
}
