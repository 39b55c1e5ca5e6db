use serde::{Deserialize, Serialize};
use std::fmt;

/// Deployment environment the process runs in.
///
/// Selects the default configuration profile and decides whether missing secrets
/// are fatal ([`Environment::Production`]) or only degrade the service.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Testing,
    #[default]
    Production,
}

impl Environment {
    pub const ALL: [Self; 3] = [Self::Development, Self::Testing, Self::Production];

    /// Parses an environment indicator such as `"production"` or `"dev"`.
    ///
    /// Matching ignores case and surrounding whitespace. Returns `None` for anything
    /// that is not a known indicator, including the empty string.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Some(Self::Development),
            "testing" | "test" => Some(Self::Testing),
            "production" | "prod" => Some(Self::Production),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Testing => "testing",
            Self::Production => "production",
        }
    }

    #[must_use]
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
