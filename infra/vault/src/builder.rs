use crate::engine::{Vault, VaultInner};
use crate::error::VaultError;
use crate::types::Cipher;
use private::Sealed;
use std::fmt;
use std::sync::Arc;
use zeroize::Zeroizing;

#[derive(Debug, Default)]
pub struct NoPassword;

/// Password held by the builder; wiped on drop.
pub struct WithPassword(Zeroizing<String>);

impl fmt::Debug for WithPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("WithPassword(***)")
    }
}

mod private {
    pub(super) trait Sealed {}
}
impl Sealed for NoPassword {}
impl Sealed for WithPassword {}

/// A builder for [`Vault`] handles.
///
/// The password is required before [`VaultBuilder::build`] becomes available.
#[allow(private_bounds)]
#[derive(Debug)]
pub struct VaultBuilder<P: Sealed = NoPassword> {
    cipher: Cipher,
    compression: bool,
    password: P,
}

impl Default for VaultBuilder {
    fn default() -> Self {
        Self { cipher: Cipher::default(), compression: false, password: NoPassword }
    }
}

impl VaultBuilder {
    #[must_use = "Builder must be given a password before use"]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the password the file key is derived from.
    pub fn password(self, password: impl Into<String>) -> VaultBuilder<WithPassword> {
        VaultBuilder {
            cipher: self.cipher,
            compression: self.compression,
            password: WithPassword(Zeroizing::new(password.into())),
        }
    }
}

#[allow(private_bounds)]
impl<P: Sealed> VaultBuilder<P> {
    /// Selects the AEAD used when sealing. Unsealing always follows the file header.
    #[must_use]
    pub const fn cipher(mut self, cipher: Cipher) -> Self {
        self.cipher = cipher;
        self
    }

    /// Toggles LZ4 compression of the plaintext before encryption.
    ///
    /// Compression state is stored in the header, so unsealing does not depend on it.
    #[must_use]
    pub const fn compression(mut self, enabled: bool) -> Self {
        self.compression = enabled;
        self
    }
}

impl VaultBuilder<WithPassword> {
    /// Finalizes the vault handle.
    ///
    /// # Errors
    /// Returns [`VaultError::MissingPassword`] if the password is empty.
    pub fn build(self) -> Result<Vault, VaultError> {
        if self.password.0.is_empty() {
            return Err(VaultError::MissingPassword { context: Some("empty password".into()) });
        }

        Ok(Vault {
            inner: Arc::new(VaultInner {
                password: self.password.0,
                cipher: self.cipher,
                compression: self.compression,
            }),
        })
    }
}
