//! Provider tag shared by adapters, errors, and configuration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The git-hosting backends this crate can talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// A Gitea (or API-compatible Forgejo) server.
    Gitea,
    /// A GitLab server.
    #[serde(rename = "gitlab")]
    GitLab,
}

impl Provider {
    /// Returns the lowercase identifier used in configuration.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Gitea => "gitea",
            Self::GitLab => "gitlab",
        }
    }

    /// Returns the human-facing product name.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Gitea => "Gitea",
            Self::GitLab => "GitLab",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.display_name())
    }
}

/// Error returned when a provider name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown provider `{0}` (expected `gitea` or `gitlab`)")]
pub struct UnknownProvider(pub String);

impl FromStr for Provider {
    type Err = UnknownProvider;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "gitea" | "forgejo" => Ok(Self::Gitea),
            "gitlab" => Ok(Self::GitLab),
            other => Err(UnknownProvider(other.to_owned())),
        }
    }
}
