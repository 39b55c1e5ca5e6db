//! Credential bundle loaded from the vault.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Fields of one credential group (e.g. `secret_key`, `api_token`).
pub type CredentialGroup = BTreeMap<String, String>;

/// Named credential groups, e.g. `{"flask": {"secret_key": "..."}}`.
///
/// `Debug` lists group and field names only; values never reach the logs.
#[derive(Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyBundle(BTreeMap<String, CredentialGroup>);

impl KeyBundle {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `group.field` to `value`, creating the group when needed.
    pub fn insert(
        &mut self,
        group: impl Into<String>,
        field: impl Into<String>,
        value: impl Into<String>,
    ) -> &mut Self {
        self.0.entry(group.into()).or_default().insert(field.into(), value.into());
        self
    }

    #[must_use]
    pub fn group(&self, name: &str) -> Option<&CredentialGroup> {
        self.0.get(name)
    }

    /// Looks up a dotted `group.field` path.
    ///
    /// ```rust
    /// # use crwa_domain::keys::KeyBundle;
    /// let mut keys = KeyBundle::new();
    /// keys.insert("flask", "secret_key", "s3cr3t");
    /// assert_eq!(keys.get("flask.secret_key"), Some("s3cr3t"));
    /// assert_eq!(keys.get("flask.missing"), None);
    /// ```
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&str> {
        let (group, field) = path.split_once('.')?;
        self.0.get(group)?.get(field).map(String::as_str)
    }

    pub fn groups(&self) -> impl Iterator<Item = (&str, &CredentialGroup)> {
        self.0.iter().map(|(name, group)| (name.as_str(), group))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for KeyBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.0.iter().map(|(name, group)| (name, group.keys().collect::<Vec<_>>())))
            .finish()
    }
}

/// Secret the web framework signs sessions and tokens with.
#[derive(Clone, PartialEq, Eq)]
pub struct SigningSecret(String);

impl SigningSecret {
    #[must_use]
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningSecret(***)")
    }
}
