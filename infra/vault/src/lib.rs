//! Password-sealed credential store for the flagging service.
//!
//! The service keeps its third-party credentials in a single encrypted file (the "vault").
//! The plaintext is the JSON encoding of a [`KeyBundle`]: named credential groups, each a
//! map of field names to values.
//!
//! ## File Format & Versioning
//!
//! ```text
//! [V(1)][FLAGS(1)][SALT(16)][NONCE(12)][CIPHERTEXT(N)][TAG(16)]
//! ```
//!
//! The file key is derived with HKDF-SHA256 from the password and the per-file salt. The
//! two header bytes are authenticated as associated data, so flipping the compression or
//! cipher bits is detected like any other tampering.
//!
//! ## Compression Threat Model
//!
//! LZ4 compression is applied **before encryption** when enabled. It may leak information
//! via ciphertext length; that is acceptable for an at-rest credential file.
//!
//! ## Example
//! ```rust
//! use crwa_domain::keys::KeyBundle;
//!
//! # fn main() -> Result<(), crwa_vault::VaultError> {
//! let dir = tempfile::tempdir().unwrap();
//! let path = dir.path().join("vault.bin");
//!
//! let mut keys = KeyBundle::new();
//! keys.insert("flask", "secret_key", "s3cr3t");
//! crwa_vault::write_keys(&path, &keys, "pa55word")?;
//!
//! let loaded = crwa_vault::get_keys(&path, Some("pa55word"))?;
//! assert_eq!(crwa_vault::signing_secret(&loaded, "flask.secret_key")?.expose(), "s3cr3t");
//! # Ok(())
//! # }
//! ```

mod builder;
mod engine;
mod error;
mod types;

pub use builder::VaultBuilder;
pub use engine::Vault;
pub use error::{VaultError, VaultErrorExt};
pub use types::{Aes, ChaCha, Cipher, SealedVault, VaultCipher};

use crwa_domain::keys::{KeyBundle, SigningSecret};
use std::path::Path;
use tracing::debug;
use zeroize::Zeroizing;

/// Environment variable consulted when no password is passed explicitly.
pub const VAULT_PASSWORD_ENV: &str = "VAULT_PASSWORD";

/// Reads the vault file at `path` and returns the decrypted credential bundle.
///
/// `password` falls back to the `VAULT_PASSWORD` environment variable when `None`.
///
/// # Errors
/// Any [`VaultError`]: missing password, unreadable file, malformed or tampered payload,
/// or plaintext that is not a bundle.
pub fn get_keys(path: impl AsRef<Path>, password: Option<&str>) -> Result<KeyBundle, VaultError> {
    let path = path.as_ref();
    let password = resolve_password(password)?;
    let keys = Vault::builder().password(password.as_str()).build()?.load(path)?;
    debug!(path = %path.display(), groups = keys.len(), "Vault unsealed");
    Ok(keys)
}

/// Seals `bundle` into vault file bytes with the default cipher.
///
/// # Errors
/// [`VaultError::MissingPassword`] for an empty password, otherwise see [`Vault::seal`].
pub fn seal_keys(bundle: &KeyBundle, password: &str) -> Result<Vec<u8>, VaultError> {
    Ok(Vault::builder().password(password).build()?.seal(bundle)?.into_bytes())
}

/// Seals `bundle` and writes it to `path`.
///
/// # Errors
/// See [`seal_keys`] and [`Vault::store`].
pub fn write_keys(
    path: impl AsRef<Path>,
    bundle: &KeyBundle,
    password: &str,
) -> Result<(), VaultError> {
    Vault::builder().password(password).build()?.store(path, bundle)
}

/// Extracts the secret at a dotted `group.field` path.
///
/// # Errors
/// [`VaultError::MissingSecret`] if the path is absent.
pub fn signing_secret(bundle: &KeyBundle, path: &str) -> Result<SigningSecret, VaultError> {
    bundle.get(path).map(SigningSecret::new).ok_or_else(|| VaultError::MissingSecret {
        path: path.to_owned().into(),
        context: None,
    })
}

/// Returns the explicit password, or `VAULT_PASSWORD` when none is given.
///
/// # Errors
/// [`VaultError::MissingPassword`] when neither yields a non-empty value.
pub fn resolve_password(explicit: Option<&str>) -> Result<Zeroizing<String>, VaultError> {
    match explicit {
        Some(password) => password_or(Some(password), None),
        None => password_or(None, std::env::var(VAULT_PASSWORD_ENV).ok()),
    }
}

fn password_or(
    explicit: Option<&str>,
    ambient: Option<String>,
) -> Result<Zeroizing<String>, VaultError> {
    explicit
        .map(str::to_owned)
        .or(ambient)
        .filter(|password| !password.is_empty())
        .map(Zeroizing::new)
        .ok_or_else(|| VaultError::MissingPassword { context: Some(VAULT_PASSWORD_ENV.into()) })
}
