//! Access token wrapper shared by both adapters.

use std::fmt;

use super::error::GitServiceError;

/// Personal access token wrapper enforcing presence.
///
/// The `Debug` implementation redacts the value so tokens never end up in
/// logs by accident.
#[derive(Clone, PartialEq, Eq)]
pub struct PersonalAccessToken(String);

impl PersonalAccessToken {
    /// Validates that the token is non-empty and trims whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`GitServiceError::Configuration`] when the supplied string is
    /// blank.
    pub fn new(token: impl AsRef<str>) -> Result<Self, GitServiceError> {
        let trimmed = token.as_ref().trim();
        if trimmed.is_empty() {
            return Err(GitServiceError::Configuration {
                message: "personal access token is required".to_owned(),
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the token value.
    #[must_use]
    pub const fn value(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for PersonalAccessToken {
    fn as_ref(&self) -> &str {
        self.value()
    }
}

impl fmt::Debug for PersonalAccessToken {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("PersonalAccessToken(<redacted>)")
    }
}
