//! Error types exposed by the git-hosting layer.
//!
//! Every failure an adapter can produce is folded into [`GitServiceError`].
//! Provider-specific error bodies never escape except through the `body`
//! field of [`GitServiceError::Api`].

use std::time::Duration;

use thiserror::Error;

use super::provider::Provider;

/// Coarse error classes callers are expected to branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Transport, timeout, decoding, or unclassified API failure.
    Service,
    /// Bad or expired credentials (HTTP 401).
    Authentication,
    /// Authenticated but forbidden (HTTP 403).
    Permission,
    /// The requested resource does not exist (HTTP 404).
    NotFound,
}

/// Errors surfaced while talking to a git-hosting provider.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GitServiceError {
    /// The provider rejected the credentials.
    #[error("{provider} rejected the token: {message}")]
    Authentication {
        /// Backend that produced the error.
        provider: Provider,
        /// Message extracted from the response.
        message: String,
    },

    /// The credentials are valid but lack access to the resource.
    #[error("{provider} denied access: {message}")]
    Permission {
        /// Backend that produced the error.
        provider: Provider,
        /// Message extracted from the response.
        message: String,
    },

    /// The requested resource does not exist or is invisible to the caller.
    #[error("{provider} resource not found: {message}")]
    NotFound {
        /// Backend that produced the error.
        provider: Provider,
        /// Message extracted from the response.
        message: String,
    },

    /// Any other non-success HTTP status.
    #[error("{provider} API error (status {status}): {message}")]
    Api {
        /// Backend that produced the error.
        provider: Provider,
        /// HTTP status code returned by the server.
        status: u16,
        /// Message extracted from the response.
        message: String,
        /// Raw response body, kept for callers that need provider detail.
        body: Option<String>,
    },

    /// The request did not complete within the configured timeout.
    #[error("{provider} request timed out after {} ms", timeout.as_millis())]
    Timeout {
        /// Backend that produced the error.
        provider: Provider,
        /// Timeout that elapsed.
        timeout: Duration,
    },

    /// Networking failed before a response was received.
    #[error("network error talking to {provider}: {message}")]
    Network {
        /// Backend that produced the error.
        provider: Provider,
        /// Transport-level error detail.
        message: String,
    },

    /// A success response could not be decoded into the expected shape.
    #[error("{provider} response could not be decoded: {message}")]
    Decode {
        /// Backend that produced the error.
        provider: Provider,
        /// Decoder error detail.
        message: String,
    },

    /// The request was rejected locally before any I/O took place.
    #[error("invalid {provider} request: {message}")]
    InvalidRequest {
        /// Backend the request was aimed at.
        provider: Provider,
        /// Description of the invalid input.
        message: String,
    },

    /// The adapter could not be constructed from the supplied configuration.
    #[error("configuration error: {message}")]
    Configuration {
        /// Details about the configuration failure.
        message: String,
    },
}

impl GitServiceError {
    /// Returns the coarse class of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Authentication { .. } => ErrorKind::Authentication,
            Self::Permission { .. } => ErrorKind::Permission,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Api { .. }
            | Self::Timeout { .. }
            | Self::Network { .. }
            | Self::Decode { .. }
            | Self::InvalidRequest { .. }
            | Self::Configuration { .. } => ErrorKind::Service,
        }
    }

    /// Returns the backend that produced the error, when one was involved.
    #[must_use]
    pub const fn provider(&self) -> Option<Provider> {
        match self {
            Self::Authentication { provider, .. }
            | Self::Permission { provider, .. }
            | Self::NotFound { provider, .. }
            | Self::Api { provider, .. }
            | Self::Timeout { provider, .. }
            | Self::Network { provider, .. }
            | Self::Decode { provider, .. }
            | Self::InvalidRequest { provider, .. } => Some(*provider),
            Self::Configuration { .. } => None,
        }
    }

    /// Returns the HTTP status associated with the error, if any.
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::Authentication { .. } => Some(401),
            Self::Permission { .. } => Some(403),
            Self::NotFound { .. } => Some(404),
            Self::Api { status, .. } => Some(*status),
            Self::Timeout { .. }
            | Self::Network { .. }
            | Self::Decode { .. }
            | Self::InvalidRequest { .. }
            | Self::Configuration { .. } => None,
        }
    }
}
