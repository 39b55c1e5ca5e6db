//! Kernel shared by the server and every blueprint crate.
//!
//! * [`config`] resolves the [`AppConfig`](crwa_domain::config::AppConfig) for a deployment
//!   environment: built-in profile, optional TOML file, then `CRWA__` environment overrides.
//! * [`server`] holds the shared [`AppState`](server::AppState), the system routes and the
//!   blueprint registrar.
//!
//! ```rust
//! use crwa_kernel::config::ConfigSource;
//! use crwa_kernel::domain::Environment;
//!
//! let cfg = ConfigSource::from("testing").resolve().unwrap();
//! assert_eq!(cfg.environment, Environment::Testing);
//! ```

pub mod config;
pub mod prelude;
pub mod server;

pub use crwa_domain as domain;
