//! HTTP utilities for share API REST calls

use super::version::{ApiVersion, VERSION_HEADER};
use crate::error::{ApiError, Result};
use reqwest::header::HeaderMap;
use reqwest::{Client, Method, StatusCode};
use serde_json::Value;
use std::time::Duration;

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

pub const AUTH_TOKEN_HEADER: &str = "X-Auth-Token";
pub const REQUEST_ID_HEADER: &str = "X-OpenStack-Request-ID";

/// Sanitize response body for logging
/// Truncates long responses and strips non-printable characters
fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        let mut end = MAX_LOG_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... [truncated, {} bytes total]", &body[..end], body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// Pull the human readable message out of an error body.
///
/// Faults come back as `{"itemNotFound": {"code": 404, "message": "..."}}`;
/// anything else is passed through as text.
pub fn extract_error_message(status: StatusCode, body: &str) -> String {
    let parsed: Option<Value> = serde_json::from_str(body).ok();

    let message = parsed.as_ref().and_then(|v| {
        v.get("message").and_then(|m| m.as_str()).or_else(|| {
            v.as_object()?
                .values()
                .find_map(|fault| fault.get("message").and_then(|m| m.as_str()))
        })
    });

    match message {
        Some(m) => m.to_string(),
        None if !body.trim().is_empty() => body.trim().to_string(),
        None => status
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_string(),
    }
}

/// A completed HTTP exchange
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl HttpResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// Transport options, fixed when the client is built
#[derive(Debug, Clone)]
pub struct HttpOptions {
    pub timeout: Duration,
    pub insecure: bool,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            insecure: false,
        }
    }
}

/// HTTP client wrapper for share API calls
#[derive(Clone)]
pub struct ShareHttpClient {
    client: Client,
}

impl ShareHttpClient {
    /// Create a new HTTP client
    pub fn new(options: &HttpOptions) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("manila-cli/", env!("CARGO_PKG_VERSION")))
            .timeout(options.timeout)
            .danger_accept_invalid_certs(options.insecure)
            .build()?;

        Ok(Self { client })
    }

    /// Send one request and turn non-success statuses into [`ApiError`]
    pub async fn request(
        &self,
        method: Method,
        url: &str,
        token: Option<&str>,
        version: Option<ApiVersion>,
        body: Option<&Value>,
    ) -> Result<HttpResponse> {
        let request_id = format!("req-{}", uuid::Uuid::new_v4());
        tracing::debug!("{} {} ({})", method, url, request_id);

        let mut request = self
            .client
            .request(method, url)
            .header(REQUEST_ID_HEADER, &request_id)
            .header(reqwest::header::ACCEPT, "application/json");

        if let Some(token) = token {
            request = request.header(AUTH_TOKEN_HEADER, token);
        }
        if let Some(version) = version {
            request = request.header(VERSION_HEADER, version.to_string());
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;

        let status = response.status();
        let headers = response.headers().clone();
        let text = response.text().await?;

        // 300 Multiple Choices is a valid answer from the versions root
        if status.is_client_error() || status.is_server_error() {
            tracing::debug!("API error: {} - {}", status, sanitize_for_log(&text));
            return Err(ApiError::from_status(
                status.as_u16(),
                extract_error_message(status, &text),
            ));
        }

        // Handle empty response
        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).map_err(|e| {
                ApiError::MalformedResponse(format!(
                    "{} ({})",
                    e,
                    sanitize_for_log(&text)
                ))
            })?
        };

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_truncates_long_bodies() {
        let body = "x".repeat(500);
        let sanitized = sanitize_for_log(&body);
        assert!(sanitized.starts_with(&"x".repeat(200)));
        assert!(sanitized.contains("500 bytes total"));
    }

    #[test]
    fn test_sanitize_strips_control_characters() {
        assert_eq!(sanitize_for_log("a\nb\tc"), "abc");
    }

    #[test]
    fn test_extract_fault_message() {
        let body = r#"{"itemNotFound": {"code": 404, "message": "Snapshot s9 could not be found."}}"#;
        assert_eq!(
            extract_error_message(StatusCode::NOT_FOUND, body),
            "Snapshot s9 could not be found."
        );
    }

    #[test]
    fn test_extract_plain_text_message() {
        assert_eq!(
            extract_error_message(StatusCode::BAD_GATEWAY, "upstream down\n"),
            "upstream down"
        );
        assert_eq!(
            extract_error_message(StatusCode::SERVICE_UNAVAILABLE, ""),
            "Service Unavailable"
        );
    }
}
