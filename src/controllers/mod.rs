pub mod agents;
pub mod health;
pub mod tts;

use axum::http::HeaderMap;

use crate::infrastructure::http::RequestId;

pub const X_SESSION_ID: &str = "x-session-id";

/// Client session for telemetry: the caller's `x-session-id`, else the request id
pub(crate) fn session_id(headers: &HeaderMap, request_id: &RequestId) -> String {
    headers
        .get(X_SESSION_ID)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| request_id.0.clone())
}
