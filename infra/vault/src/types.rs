use crate::error::VaultError;
use aead::{AeadInOut, KeyInit};
use aes_gcm::Aes256Gcm;
use chacha20poly1305::ChaCha20Poly1305;
use std::fmt;
use std::ops::Deref;

// --- Aliases ---

pub type Aes = Aes256Gcm;
pub type ChaCha = ChaCha20Poly1305;

pub trait VaultCipher: AeadInOut + KeyInit + 'static {}
impl<T: AeadInOut + KeyInit + 'static> VaultCipher for T {}

// --- File format constants ---

pub(crate) const FILE_VERSION_V1: u8 = 1;

/// `[version: u8][flags: u8]`
pub(crate) const HEADER_LEN: usize = 2;

/// Per-file random HKDF salt.
pub(crate) const SALT_LEN: usize = 16;

/// AEAD nonce length (96-bit).
pub(crate) const NONCE_LEN: usize = 12;

/// AEAD tag length (128-bit).
pub(crate) const TAG_LEN: usize = 16;

pub(crate) const MIN_FILE_LEN: usize = HEADER_LEN + SALT_LEN + NONCE_LEN + TAG_LEN;

/// Plaintext was LZ4-compressed before encryption.
pub(crate) const FLAG_COMPRESSED: u8 = 1 << 0;

/// Sealed with ChaCha20-Poly1305 instead of AES-256-GCM.
pub(crate) const FLAG_CHACHA: u8 = 1 << 1;

pub(crate) const KNOWN_FLAGS: u8 = FLAG_COMPRESSED | FLAG_CHACHA;

/// Associated data bound to every vault file, followed by the two header bytes.
pub(crate) const VAULT_AAD: &[u8] = b"crwa.vault.keys.v1";

/// HKDF `info` for the file encryption key.
pub(crate) const KEY_INFO: &[u8] = b"crwa.vault.file-key.v1";

/// AEAD algorithm a vault file is sealed with. Recorded in the header flags.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Cipher {
    /// AES-256-GCM.
    #[default]
    Aes,
    /// ChaCha20-Poly1305.
    ChaCha,
}

impl Cipher {
    pub(crate) const fn flag(self) -> u8 {
        match self {
            Self::Aes => 0,
            Self::ChaCha => FLAG_CHACHA,
        }
    }

    pub(crate) const fn from_flags(flags: u8) -> Self {
        if flags & FLAG_CHACHA == 0 { Self::Aes } else { Self::ChaCha }
    }
}

impl fmt::Display for Cipher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Aes => "AES-256-GCM",
            Self::ChaCha => "ChaCha20-Poly1305",
        })
    }
}

// --- Container ---

/// Raw bytes of a sealed vault file.
///
/// ```text
/// [V(1)][FLAGS(1)][SALT(16)][NONCE(12)][CIPHERTEXT(N)][TAG(16)]
/// ```
///
/// - `V` is the file format version.
/// - `FLAGS` bit 0 marks LZ4 compression, bit 1 marks ChaCha20-Poly1305.
/// - `SALT` feeds HKDF-SHA256 together with the password.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SealedVault {
    data: Vec<u8>,
}

impl SealedVault {
    /// Wraps raw bytes after checking the header and minimum length.
    ///
    /// # Errors
    /// Returns [`VaultError::InvalidPayload`] if the bytes cannot be a vault file.
    pub fn parse(data: impl Into<Vec<u8>>) -> Result<Self, VaultError> {
        let data = data.into();
        if data.len() < MIN_FILE_LEN {
            return Err(VaultError::InvalidPayload {
                message: format!(
                    "Payload too short ({} bytes). Expected at least {MIN_FILE_LEN} bytes",
                    data.len(),
                )
                .into(),
                context: None,
            });
        }

        let (version, flags) = (data[0], data[1]);
        if version != FILE_VERSION_V1 {
            return Err(VaultError::InvalidPayload {
                message: "Unsupported vault file version".into(),
                context: Some(format!("version={version}").into()),
            });
        }
        if flags & !KNOWN_FLAGS != 0 {
            return Err(VaultError::InvalidPayload {
                message: "Unknown header flags".into(),
                context: Some(format!("flags={flags:#010b}").into()),
            });
        }

        Ok(Self { data })
    }

    pub(crate) const fn from_sealed(data: Vec<u8>) -> Self {
        Self { data }
    }

    #[must_use]
    pub fn version(&self) -> u8 {
        self.data[0]
    }

    #[must_use]
    pub fn is_compressed(&self) -> bool {
        self.data[1] & FLAG_COMPRESSED != 0
    }

    #[must_use]
    pub fn cipher(&self) -> Cipher {
        Cipher::from_flags(self.data[1])
    }

    /// Splits the file into `(header, salt, nonce, ciphertext, tag)`.
    #[must_use]
    pub fn split(&self) -> (&[u8], &[u8], &[u8], &[u8], &[u8]) {
        let (header, rest) = self.data.split_at(HEADER_LEN);
        let (salt, rest) = rest.split_at(SALT_LEN);
        let (nonce, rest) = rest.split_at(NONCE_LEN);
        let (ciphertext, tag) = rest.split_at(rest.len() - TAG_LEN);
        (header, salt, nonce, ciphertext, tag)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }
}

impl fmt::Debug for SealedVault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SealedVault")
            .field("version", &self.version())
            .field("cipher", &self.cipher())
            .field("compressed", &self.is_compressed())
            .field("len", &self.data.len())
            .finish()
    }
}

impl AsRef<[u8]> for SealedVault {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

impl Deref for SealedVault {
    type Target = [u8];
    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_rejects_short_and_unknown_headers() {
        assert!(matches!(SealedVault::parse(vec![1u8; 10]), Err(VaultError::InvalidPayload { .. })));

        let mut bytes = vec![0u8; MIN_FILE_LEN];
        bytes[0] = 9;
        assert!(matches!(SealedVault::parse(bytes.clone()), Err(VaultError::InvalidPayload { .. })));

        bytes[0] = FILE_VERSION_V1;
        bytes[1] = 0b1000_0000;
        assert!(matches!(SealedVault::parse(bytes.clone()), Err(VaultError::InvalidPayload { .. })));

        bytes[1] = FLAG_COMPRESSED | FLAG_CHACHA;
        let sealed = SealedVault::parse(bytes).expect("known flags parse");
        assert!(sealed.is_compressed());
        assert_eq!(sealed.cipher(), Cipher::ChaCha);
    }

    #[test]
    fn split_matches_layout() {
        let mut bytes = vec![0u8; MIN_FILE_LEN + 5];
        bytes[0] = FILE_VERSION_V1;
        let sealed = SealedVault::parse(bytes).expect("parse");
        let (header, salt, nonce, ciphertext, tag) = sealed.split();
        assert_eq!(
            (header.len(), salt.len(), nonce.len(), ciphertext.len(), tag.len()),
            (HEADER_LEN, SALT_LEN, NONCE_LEN, 5, TAG_LEN)
        );
    }
}
