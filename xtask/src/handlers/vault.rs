use anyhow::{Context, Result};
use crwa_domain::keys::KeyBundle;
use crwa_vault::{Cipher, SealedVault, Vault};
use std::fs;
use std::path::Path;

/// Seals the plaintext JSON keys at `input` into the vault file `output`.
///
/// # Errors
/// Returns an error if the input is not a key bundle or the vault cannot be written.
pub fn seal(input: &Path, output: &Path, password: &str, chacha: bool, compress: bool) -> Result<()> {
    let content = fs::read(input).with_context(|| format!("Reading {}", input.display()))?;
    let keys: KeyBundle = serde_json::from_slice(&content)
        .with_context(|| format!("{} is not a keys file", input.display()))?;

    let cipher = if chacha { Cipher::ChaCha } else { Cipher::Aes };
    Vault::builder()
        .password(password)
        .cipher(cipher)
        .compression(compress)
        .build()?
        .store(output, &keys)
        .with_context(|| format!("Writing {}", output.display()))?;

    println!("🔐 Sealed {} group(s) into {} ({cipher})", keys.len(), output.display());
    Ok(())
}

/// Prints the groups and field names of the vault file at `path`.
///
/// # Errors
/// Returns an error if the vault cannot be read or unsealed with `password`.
pub fn inspect(path: &Path, password: &str) -> Result<()> {
    let data = fs::read(path).with_context(|| format!("Reading {}", path.display()))?;
    let header = SealedVault::parse(data.as_slice())?;
    let keys = Vault::builder().password(password).build()?.unseal(&data)?;

    println!(
        "\n{} (v{}, {}, {}):\n",
        path.display(),
        header.version(),
        header.cipher(),
        if header.is_compressed() { "lz4" } else { "uncompressed" }
    );
    for line in describe(&keys) {
        println!("{line}");
    }
    println!();
    Ok(())
}

/// One line per group listing its field names; values are never included.
#[must_use]
pub fn describe(keys: &KeyBundle) -> Vec<String> {
    keys.groups()
        .map(|(name, group)| {
            let fields: Vec<&str> = group.keys().map(String::as_str).collect();
            format!("{name:<15} {}", fields.join(", "))
        })
        .collect()
}
