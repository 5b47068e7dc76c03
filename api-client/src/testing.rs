//! Helpers for building responses without a server.

use crate::response::ApiResponse;
use reqwest::StatusCode;
use std::collections::HashMap;

/// HTTP/1.1 response with the given status, content type and body
pub fn response(status: u16, content_type: Option<&str>, body: &str) -> ApiResponse {
    let reason = StatusCode::from_u16(status)
        .ok()
        .and_then(|code| code.canonical_reason())
        .unwrap_or_default();

    let mut headers = HashMap::new();
    if let Some(content_type) = content_type {
        headers.insert("content-type".to_string(), content_type.to_string());
    }

    ApiResponse {
        status,
        status_line: format!("HTTP/1.1 {status} {reason}").trim_end().to_string(),
        headers,
        content_type: content_type.map(str::to_string),
        body: body.to_string(),
        url: "http://localhost/".to_string(),
    }
}

/// JSON response with the given status
pub fn json_response(status: u16, body: &str) -> ApiResponse {
    response(status, Some("application/json"), body)
}
