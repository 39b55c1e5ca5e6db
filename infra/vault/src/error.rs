//! # Vault Errors
//!
//! Every failure of reading, unsealing or sealing a vault file is a [`VaultError`].
//! Callers that only need "is the vault usable" can treat all variants alike.

use std::borrow::Cow;

#[crwa_derive::crwa_error]
pub enum VaultError {
    /// Neither an explicit password nor `VAULT_PASSWORD` was provided.
    #[error("Vault password not provided{}", format_context(.context))]
    MissingPassword { context: Option<Cow<'static, str>> },

    /// The vault file could not be read or written.
    #[error("Vault I/O error{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    /// The file is too short, has an unknown version or unknown flags.
    #[error("Invalid payload{}: {message}", format_context(.context))]
    InvalidPayload { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Encryption error{}: {message}", format_context(.context))]
    Encryption { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Wrong password, or the file was tampered with.
    #[error("Decryption error{}: {message}", format_context(.context))]
    Decryption { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Decompression error{}: {message}", format_context(.context))]
    Decompression { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The decrypted plaintext is not a valid credential bundle.
    #[error("Serialization error{}: {source}", format_context(.context))]
    Serialization { source: serde_json::Error, context: Option<Cow<'static, str>> },

    /// A `group.field` path is absent from the bundle.
    #[error("Secret '{path}' not found in vault{}", format_context(.context))]
    MissingSecret { path: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Invalid configuration{}: {message}", format_context(.context))]
    InvalidConfiguration { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Internal vault error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
