use crwa_domain::keys::KeyBundle;

pub const PASSWORD: &str = "correct horse battery staple";

/// Bundle shaped like the production vault.
#[must_use]
pub fn sample_keys() -> KeyBundle {
    let mut keys = KeyBundle::new();
    keys.insert("flask", "secret_key", "flask-signing-secret")
        .insert("hobolink", "user", "crwa")
        .insert("hobolink", "password", "hobo-pass")
        .insert("twitter", "api_key", "tw-key");
    keys
}
