use crate::docs::DocsError;
use crwa::kernel::config::ConfigError;
use crwa::kernel::server::{AppStateError, RegistrarError};
use crwa_vault::VaultError;
use std::borrow::Cow;

/// Startup failures of [`create_app`](crate::create_app). Each one is fatal.
#[crwa_derive::crwa_error]
pub enum AppError {
    #[error("Configuration error{}: {source}", format_context(.context))]
    Config { source: ConfigError, context: Option<Cow<'static, str>> },

    #[error("Vault unavailable{}: {source}", format_context(.context))]
    VaultUnavailable { source: VaultError, context: Option<Cow<'static, str>> },

    #[error("Blueprint registration failed{}: {source}", format_context(.context))]
    Registrar { source: RegistrarError, context: Option<Cow<'static, str>> },

    #[error("Documentation error{}: {source}", format_context(.context))]
    Docs { source: DocsError, context: Option<Cow<'static, str>> },

    #[error("Application state error{}: {source}", format_context(.context))]
    State { source: AppStateError, context: Option<Cow<'static, str>> },
}
