pub mod fixtures;

use crwa_vault::{Cipher, Vault, VaultError, get_keys, seal_keys, signing_secret, write_keys};
use fixtures::{PASSWORD, sample_keys};
use std::fs;
use tempfile::tempdir;

#[test]
fn write_then_get_keys_returns_the_bundle() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("vault.bin");

    write_keys(&path, &sample_keys(), PASSWORD)?;
    let keys = get_keys(&path, Some(PASSWORD))?;

    assert_eq!(keys, sample_keys());
    assert_eq!(signing_secret(&keys, "flask.secret_key")?.expose(), "flask-signing-secret");
    Ok(())
}

#[cfg(unix)]
#[test]
fn written_vault_is_owner_only() -> Result<(), Box<dyn std::error::Error>> {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir()?;
    let path = dir.path().join("vault.bin");
    write_keys(&path, &sample_keys(), PASSWORD)?;

    assert_eq!(fs::metadata(&path)?.permissions().mode() & 0o777, 0o600);
    Ok(())
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempdir().expect("tempdir");
    let err = get_keys(dir.path().join("absent.bin"), Some(PASSWORD)).expect_err("missing file");
    assert!(matches!(err, VaultError::Io { .. }));
    assert!(err.to_string().contains("absent.bin"));
}

#[test]
fn wrong_password_fails_to_decrypt() {
    let sealed = seal_keys(&sample_keys(), PASSWORD).expect("seal");
    let vault = Vault::builder().password("not the password").build().expect("vault");

    assert!(matches!(vault.unseal(&sealed), Err(VaultError::Decryption { .. })));
}

#[test]
fn truncated_file_is_an_invalid_payload() {
    let sealed = seal_keys(&sample_keys(), PASSWORD).expect("seal");
    let vault = Vault::builder().password(PASSWORD).build().expect("vault");

    assert!(matches!(vault.unseal(&sealed[..20]), Err(VaultError::InvalidPayload { .. })));
    assert!(matches!(vault.unseal(&[]), Err(VaultError::InvalidPayload { .. })));
}

#[test]
fn plaintext_that_is_not_a_bundle_is_a_serialization_error() {
    let vault = Vault::builder().password(PASSWORD).build().expect("vault");
    let sealed = vault.seal_bytes(b"[1, 2, 3]").expect("seal");

    assert!(matches!(vault.unseal(&sealed), Err(VaultError::Serialization { .. })));
}

#[test]
fn chacha_and_compression_round_trip() {
    let vault = Vault::builder()
        .password(PASSWORD)
        .cipher(Cipher::ChaCha)
        .compression(true)
        .build()
        .expect("vault");

    let sealed = vault.seal(&sample_keys()).expect("seal");
    assert_eq!(sealed.cipher(), Cipher::ChaCha);
    assert!(sealed.is_compressed());
    assert_eq!(vault.unseal(&sealed).expect("unseal"), sample_keys());
}

#[test]
fn sealed_bytes_do_not_contain_secrets() {
    let sealed = seal_keys(&sample_keys(), PASSWORD).expect("seal");
    let haystack = String::from_utf8_lossy(&sealed);
    assert!(!haystack.contains("flask-signing-secret"));
    assert!(!haystack.contains("secret_key"));
}
