//! Domain wrapper types for the error handling BDD tests.

use std::str::FromStr;
use std::time::Duration;

use forgelink::forge::{ErrorKind, GitServiceError};

/// Duration written in whole milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Millis(u64);

impl Millis {
    pub(crate) const fn duration(self) -> Duration {
        Duration::from_millis(self.0)
    }
}

impl FromStr for Millis {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u64>().map(Self)
    }
}

/// Failure class named in a scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ExpectedFailure {
    Timeout,
    Authentication,
    Permission,
    NotFound,
}

impl ExpectedFailure {
    /// Returns whether `error` belongs to this class.
    pub(crate) const fn matches(self, error: &GitServiceError) -> bool {
        match self {
            Self::Timeout => matches!(error, GitServiceError::Timeout { .. }),
            Self::Authentication => matches!(error.kind(), ErrorKind::Authentication),
            Self::Permission => matches!(error.kind(), ErrorKind::Permission),
            Self::NotFound => matches!(error.kind(), ErrorKind::NotFound),
        }
    }
}

impl FromStr for ExpectedFailure {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "timeout" => Ok(Self::Timeout),
            "authentication" => Ok(Self::Authentication),
            "permission" => Ok(Self::Permission),
            "not found" => Ok(Self::NotFound),
            other => Err(format!("unknown failure class `{other}`")),
        }
    }
}
