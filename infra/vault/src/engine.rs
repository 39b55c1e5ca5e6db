use aead::inout::InOutBuf;
use aead::{Key, Nonce};
use crwa_domain::keys::KeyBundle;
use getrandom::fill;
use hkdf::Hkdf;
use sha2::Sha256;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;
use zeroize::Zeroizing;

use crate::builder::VaultBuilder;
use crate::error::{VaultError, VaultErrorExt};
use crate::types::{
    Aes, ChaCha, Cipher, FILE_VERSION_V1, FLAG_COMPRESSED, HEADER_LEN, KEY_INFO, NONCE_LEN,
    SALT_LEN, SealedVault, TAG_LEN, VAULT_AAD, VaultCipher,
};

pub(crate) struct VaultInner {
    pub(crate) password: Zeroizing<String>,
    pub(crate) cipher: Cipher,
    pub(crate) compression: bool,
}

/// A password-bound handle for sealing and unsealing credential bundles.
///
/// Every sealed file gets a fresh random salt and nonce; the file key is derived with
/// HKDF-SHA256 from the password and that salt. Cheap to clone.
///
/// ```rust
/// use crwa_domain::keys::KeyBundle;
/// use crwa_vault::{Cipher, Vault};
///
/// # fn main() -> Result<(), crwa_vault::VaultError> {
/// let vault = Vault::builder().password("correct horse").cipher(Cipher::ChaCha).build()?;
///
/// let mut keys = KeyBundle::new();
/// keys.insert("flask", "secret_key", "s3cr3t");
///
/// let sealed = vault.seal(&keys)?;
/// assert_eq!(vault.unseal(&sealed)?, keys);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Vault {
    pub(crate) inner: Arc<VaultInner>,
}

impl fmt::Debug for Vault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Vault")
            .field("cipher", &self.inner.cipher)
            .field("compression", &self.inner.compression)
            .finish_non_exhaustive()
    }
}

impl Vault {
    #[must_use]
    pub fn builder() -> VaultBuilder {
        VaultBuilder::new()
    }

    /// Serializes `bundle` as JSON and seals it.
    ///
    /// # Errors
    /// * [`VaultError::Serialization`] if the bundle cannot be encoded.
    /// * [`VaultError::Encryption`] if key derivation or the AEAD fails.
    pub fn seal(&self, bundle: &KeyBundle) -> Result<SealedVault, VaultError> {
        let json = Zeroizing::new(serde_json::to_vec(bundle).context("Encoding key bundle")?);
        self.seal_bytes(&json)
    }

    /// Unseals a vault file and decodes the bundle.
    ///
    /// # Errors
    /// * [`VaultError::InvalidPayload`] for truncated or unknown files.
    /// * [`VaultError::Decryption`] for a wrong password or tampered bytes.
    /// * [`VaultError::Decompression`] if the LZ4 stream is corrupt.
    /// * [`VaultError::Serialization`] if the plaintext is not a bundle.
    pub fn unseal(&self, data: &[u8]) -> Result<KeyBundle, VaultError> {
        let plain = self.unseal_bytes(data)?;
        serde_json::from_slice(&plain).context("Decoding key bundle")
    }

    /// Seals raw bytes into the vault file format.
    ///
    /// # Errors
    /// * [`VaultError::Encryption`] if key derivation or the AEAD fails.
    /// * [`VaultError::Internal`] if the system RNG is unavailable.
    pub fn seal_bytes(&self, data: &[u8]) -> Result<SealedVault, VaultError> {
        let cipher = self.inner.cipher;
        let compressed =
            self.inner.compression.then(|| Zeroizing::new(lz4_flex::compress_prepend_size(data)));
        let plain = compressed.as_deref().map_or(data, Vec::as_slice);
        let flags = cipher.flag() | if compressed.is_some() { FLAG_COMPRESSED } else { 0 };

        let mut salt = [0u8; SALT_LEN];
        fill(&mut salt).map_err(|e| VaultError::Internal {
            message: e.to_string().into(),
            context: Some("System RNG unavailable for salt generation".into()),
        })?;

        let mut buf = Vec::with_capacity(HEADER_LEN + SALT_LEN + NONCE_LEN + plain.len() + TAG_LEN);
        buf.extend_from_slice(&[FILE_VERSION_V1, flags]);
        buf.extend_from_slice(&salt);

        let key = derive_key(&self.inner.password, &salt)?;
        match cipher {
            Cipher::Aes => encrypt::<Aes>(&key, plain, &mut buf)?,
            Cipher::ChaCha => encrypt::<ChaCha>(&key, plain, &mut buf)?,
        }

        debug!(%cipher, compressed = compressed.is_some(), len = buf.len(), "Vault sealed");
        Ok(SealedVault::from_sealed(buf))
    }

    /// Unseals a vault file into its raw plaintext.
    ///
    /// # Errors
    /// See [`Vault::unseal`].
    pub fn unseal_bytes(&self, data: &[u8]) -> Result<Zeroizing<Vec<u8>>, VaultError> {
        let sealed = SealedVault::parse(data)?;
        let (header, salt, nonce, ciphertext, tag) = sealed.split();

        let key = derive_key(&self.inner.password, salt)?;
        let aad = associated_data(header);
        let mut buf = Zeroizing::new(ciphertext.to_vec());

        match sealed.cipher() {
            Cipher::Aes => decrypt::<Aes>(&key, nonce, tag, &aad, &mut buf)?,
            Cipher::ChaCha => decrypt::<ChaCha>(&key, nonce, tag, &aad, &mut buf)?,
        }

        if sealed.is_compressed() {
            let inflated = lz4_flex::decompress_size_prepended(&buf).map_err(|e| {
                VaultError::Decompression {
                    message: e.to_string().into(),
                    context: Some("LZ4 stream invalid".into()),
                }
            })?;
            return Ok(Zeroizing::new(inflated));
        }

        Ok(buf)
    }

    /// Reads and unseals the vault file at `path`.
    ///
    /// # Errors
    /// [`VaultError::Io`] when the file cannot be read, otherwise see [`Vault::unseal`].
    pub fn load(&self, path: impl AsRef<Path>) -> Result<KeyBundle, VaultError> {
        let path = path.as_ref();
        let data = fs::read(path).context(format!("Reading {}", path.display()))?;
        self.unseal(&data)
    }

    /// Seals `bundle` and writes it to `path`, owner read/write only on unix.
    ///
    /// # Errors
    /// [`VaultError::Io`] when the file cannot be written, otherwise see [`Vault::seal`].
    pub fn store(&self, path: impl AsRef<Path>, bundle: &KeyBundle) -> Result<(), VaultError> {
        let path = path.as_ref();
        let sealed = self.seal(bundle)?;

        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut file = options.open(path).context(format!("Creating {}", path.display()))?;
        file.write_all(sealed.as_slice()).context(format!("Writing {}", path.display()))?;
        Ok(())
    }
}

fn derive_key(password: &str, salt: &[u8]) -> Result<Zeroizing<[u8; 32]>, VaultError> {
    let (_, hk) = Hkdf::<Sha256>::extract(Some(salt), password.as_bytes());
    let mut key = Zeroizing::new([0u8; 32]);
    hk.expand(KEY_INFO, key.as_mut_slice()).map_err(|_| VaultError::Encryption {
        message: "HKDF expansion failed".into(),
        context: None,
    })?;
    Ok(key)
}

fn associated_data(header: &[u8]) -> Vec<u8> {
    let mut aad = Vec::with_capacity(VAULT_AAD.len() + header.len());
    aad.extend_from_slice(VAULT_AAD);
    aad.extend_from_slice(header);
    aad
}

fn init_cipher<C: VaultCipher>(key: &[u8; 32]) -> Result<C, VaultError> {
    let key = Key::<C>::try_from(&key[..]).map_err(|_| VaultError::InvalidConfiguration {
        message: format!("Invalid key length {}, must be 32 bytes", key.len()).into(),
        context: None,
    })?;
    Ok(C::new(&key))
}

/// Appends `NONCE || CIPHERTEXT || TAG` to `buf`, which must already hold the header and salt.
fn encrypt<C: VaultCipher>(key: &[u8; 32], plain: &[u8], buf: &mut Vec<u8>) -> Result<(), VaultError> {
    let cipher = init_cipher::<C>(key)?;

    let mut nonce = Nonce::<C>::default();
    fill(&mut nonce).map_err(|e| VaultError::Internal {
        message: e.to_string().into(),
        context: Some("System RNG unavailable for nonce generation".into()),
    })?;

    let aad = associated_data(&buf[..HEADER_LEN]);
    buf.extend_from_slice(&nonce);
    let body_start = buf.len();
    buf.extend_from_slice(plain);

    let in_out = InOutBuf::from(&mut buf[body_start..]);
    let tag = cipher.encrypt_inout_detached(&nonce, &aad, in_out).map_err(|_| {
        VaultError::Encryption {
            message: "Encryption failed".into(),
            context: Some("AEAD encryption failed".into()),
        }
    })?;

    buf.extend_from_slice(tag.as_slice());
    Ok(())
}

fn decrypt<C: VaultCipher>(
    key: &[u8; 32],
    nonce: &[u8],
    tag: &[u8],
    aad: &[u8],
    buf: &mut [u8],
) -> Result<(), VaultError> {
    let cipher = init_cipher::<C>(key)?;

    let nonce = nonce.try_into().map_err(|_| VaultError::Decryption {
        message: "Invalid nonce length".into(),
        context: None,
    })?;
    let tag = tag.try_into().map_err(|_| VaultError::Decryption {
        message: "Invalid tag length".into(),
        context: None,
    })?;

    cipher.decrypt_inout_detached(&nonce, aad, InOutBuf::from(buf), &tag).map_err(|_| {
        VaultError::Decryption {
            message: "Decryption failed".into(),
            context: Some("wrong password or tampered vault file".into()),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vault(cipher: Cipher, compression: bool) -> Vault {
        Vault::builder()
            .password("test-password")
            .cipher(cipher)
            .compression(compression)
            .build()
            .expect("vault should build")
    }

    #[test]
    fn empty_password_is_rejected() {
        let err = Vault::builder().password("").build().expect_err("empty password");
        assert!(matches!(err, VaultError::MissingPassword { .. }));
    }

    #[test]
    fn header_records_cipher_and_compression() {
        for (cipher, compression) in
            [(Cipher::Aes, false), (Cipher::Aes, true), (Cipher::ChaCha, false), (Cipher::ChaCha, true)]
        {
            let sealed = vault(cipher, compression).seal_bytes(b"payload").expect("seal");
            assert_eq!(sealed.version(), FILE_VERSION_V1);
            assert_eq!(sealed.cipher(), cipher);
            assert_eq!(sealed.is_compressed(), compression);
        }
    }

    #[test]
    fn sealing_twice_uses_fresh_salt_and_nonce() {
        let vault = vault(Cipher::Aes, false);
        let a = vault.seal_bytes(b"same").expect("seal");
        let b = vault.seal_bytes(b"same").expect("seal");
        assert_ne!(a.split().1, b.split().1);
        assert_ne!(a.split().2, b.split().2);
        assert_ne!(a.as_slice(), b.as_slice());
    }

    #[test]
    fn unseal_follows_header_not_builder_settings() {
        let sealed = vault(Cipher::ChaCha, true).seal_bytes(b"agile").expect("seal");
        let plain = vault(Cipher::Aes, false).unseal_bytes(&sealed).expect("unseal");
        assert_eq!(plain.as_slice(), b"agile");
    }

    #[test]
    fn debug_output_hides_password() {
        let rendered = format!("{:?}", vault(Cipher::Aes, false));
        assert!(!rendered.contains("test-password"));
    }
}
