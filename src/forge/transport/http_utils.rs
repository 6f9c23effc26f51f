//! Response body helpers shared by the transport.

use http::StatusCode;
use serde_json::Value;

/// Extracts a human-readable message from a JSON error body.
///
/// Tries `message` first, then `error`. Non-string values (GitLab reports
/// validation failures as objects) are rendered as compact JSON.
pub(super) fn extract_message(body: &str) -> Option<String> {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return None;
    };
    ["message", "error"]
        .iter()
        .filter_map(|key| value.get(key))
        .find_map(render_message)
}

fn render_message(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) if text.trim().is_empty() => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

/// Formats a status as `404 Not Found`.
pub(super) fn status_line(status: StatusCode) -> String {
    status.canonical_reason().map_or_else(
        || status.as_u16().to_string(),
        |reason| format!("{} {reason}", status.as_u16()),
    )
}

/// Truncates long bodies before they are attached to errors.
pub(super) fn truncate_body(body: &str, max_chars: usize) -> String {
    if body.chars().count() <= max_chars {
        return body.to_owned();
    }
    let prefix: String = body.chars().take(max_chars).collect();
    format!("{prefix}...")
}
