use crate::error::AppError;
use crwa::domain::config::{AppConfig, VaultConfig};
use crwa::domain::keys::{KeyBundle, SigningSecret};
use crwa_vault::VaultError;
use tracing::{info, warn};

/// Outcome of loading secrets outside production.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Secrets {
    Loaded,
    /// The vault could not be read; `keys` and `secret_key` are `None`.
    Degraded,
}

/// Fills `config.keys` and `config.secret_key` from the vault.
///
/// Any vault failure, including a bundle without the signing secret, is fatal in production
/// and a warning everywhere else.
///
/// # Errors
/// [`AppError::VaultUnavailable`] in production when the vault cannot be read.
pub fn load_secrets(config: &mut AppConfig) -> Result<Secrets, AppError> {
    match read_vault(&config.vault) {
        Ok((keys, secret)) => {
            info!(path = %config.vault.path.display(), groups = keys.len(), "Secrets loaded");
            config.keys = Some(keys);
            config.secret_key = Some(secret);
            Ok(Secrets::Loaded)
        },
        Err(source) if config.environment.is_production() => Err(AppError::VaultUnavailable {
            source,
            context: Some(format!("{} (production)", config.vault.path.display()).into()),
        }),
        Err(e) => {
            warn!(
                environment = %config.environment,
                path = %config.vault.path.display(),
                error = %e,
                "Vault unavailable, continuing without secrets"
            );
            config.keys = None;
            config.secret_key = None;
            Ok(Secrets::Degraded)
        },
    }
}

fn read_vault(vault: &VaultConfig) -> Result<(KeyBundle, SigningSecret), VaultError> {
    let keys = crwa_vault::get_keys(&vault.path, vault.password.as_deref())?;
    let secret = crwa_vault::signing_secret(&keys, &vault.signing_secret)?;
    Ok((keys, secret))
}
