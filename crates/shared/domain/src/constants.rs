//! `OpenAPI` tags and well-known names.

pub const SYSTEM_TAG: &str = "System";
pub const API_TAG: &str = "API";
pub const FLAGGING_TAG: &str = "Flagging";

/// Field path of the web framework signing secret inside the key bundle.
pub const SIGNING_SECRET_PATH: &str = "flask.secret_key";
