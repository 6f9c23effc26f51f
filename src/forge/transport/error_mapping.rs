//! Maps HTTP and transport failures into [`GitServiceError`].

use std::time::Duration;

use http::StatusCode;

use crate::forge::error::GitServiceError;
use crate::forge::provider::Provider;

use super::http_utils::{extract_message, status_line, truncate_body};

const MAX_ERROR_BODY_CHARS: usize = 2_000;

/// Maps a non-success status and its body into the shared taxonomy.
pub(super) fn map_http_error(
    provider: Provider,
    operation: &str,
    status: StatusCode,
    body: &str,
) -> GitServiceError {
    let detail = extract_message(body).unwrap_or_else(|| {
        if !body.trim().is_empty() {
            tracing::warn!(%provider, operation, %status, "error body carried no readable message");
        }
        status_line(status)
    });
    let message = format!("{operation} failed: {detail}");

    match status {
        StatusCode::UNAUTHORIZED => GitServiceError::Authentication { provider, message },
        StatusCode::FORBIDDEN => GitServiceError::Permission { provider, message },
        StatusCode::NOT_FOUND => GitServiceError::NotFound { provider, message },
        _ => GitServiceError::Api {
            provider,
            status: status.as_u16(),
            message,
            body: (!body.is_empty()).then(|| truncate_body(body, MAX_ERROR_BODY_CHARS)),
        },
    }
}

/// Maps a reqwest failure raised before a full response was read.
pub(super) fn map_transport_error(
    provider: Provider,
    operation: &str,
    timeout: Duration,
    error: &reqwest::Error,
) -> GitServiceError {
    if error.is_timeout() {
        return GitServiceError::Timeout { provider, timeout };
    }
    if error.is_builder() {
        return GitServiceError::InvalidRequest {
            provider,
            message: format!("{operation} failed: {error}"),
        };
    }
    GitServiceError::Network {
        provider,
        message: format!("{operation} failed: {error}"),
    }
}

/// Maps a JSON decoding failure on a success response.
pub(super) fn map_decode_error(
    provider: Provider,
    operation: &str,
    error: &serde_json::Error,
) -> GitServiceError {
    GitServiceError::Decode {
        provider,
        message: format!("{operation} response deserialisation failed: {error}"),
    }
}
