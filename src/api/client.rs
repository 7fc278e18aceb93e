//! Share API client
//!
//! Combines authentication, the HTTP transport and the negotiated microversion.

use super::auth::{self, Credentials};
use super::http::{HttpOptions, HttpResponse, ShareHttpClient};
use super::version::{self, ApiVersion, VersionsDocument};
use crate::error::{ApiError, Result};
use reqwest::Method;
use serde_json::Value;

/// Main share API client
#[derive(Clone)]
pub struct ShareClient {
    http: ShareHttpClient,
    endpoint: String,
    token: String,
    api_version: ApiVersion,
}

impl ShareClient {
    /// Authenticate and negotiate the microversion with the server
    pub async fn connect(
        credentials: &Credentials,
        requested_version: Option<ApiVersion>,
        options: &HttpOptions,
    ) -> Result<Self> {
        let http = ShareHttpClient::new(options)?;
        let session = auth::authenticate(&http, credentials).await?;

        let server_range = discover_versions(&http, &session.endpoint, &session.token).await?;
        let api_version = version::negotiate(requested_version, server_range)?;
        tracing::info!(
            "Using API version {} against {}",
            api_version,
            session.endpoint
        );

        Ok(Self::with_version(
            http,
            &session.endpoint,
            &session.token,
            api_version,
        ))
    }

    /// Build a client for an already negotiated version
    pub fn with_version(
        http: ShareHttpClient,
        endpoint: &str,
        token: &str,
        api_version: ApiVersion,
    ) -> Self {
        Self {
            http,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            token: token.to_string(),
            api_version,
        }
    }

    /// The negotiated version, fixed for the life of the client
    pub fn api_version(&self) -> ApiVersion {
        self.api_version
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Absolute URL for an API path such as `/snapshots/detail`
    pub fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!("{}{}", self.endpoint, path)
    }

    /// Send one request against the share endpoint
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<HttpResponse> {
        let url = self.url(path);
        self.http
            .request(method, &url, Some(&self.token), Some(self.api_version), body)
            .await
    }

    /// Make a GET request and return the body
    pub async fn get(&self, path: &str) -> Result<Value> {
        Ok(self.request(Method::GET, path, None).await?.body)
    }

    /// Make a POST request and return the body
    pub async fn post(&self, path: &str, body: &Value) -> Result<Value> {
        Ok(self.request(Method::POST, path, Some(body)).await?.body)
    }

    /// Make a PUT request and return the body
    pub async fn put(&self, path: &str, body: &Value) -> Result<Value> {
        Ok(self.request(Method::PUT, path, Some(body)).await?.body)
    }

    /// Make a DELETE request
    pub async fn delete(&self, path: &str) -> Result<()> {
        self.request(Method::DELETE, path, None).await?;
        Ok(())
    }
}

/// `v2`, `v2.0`: the API version segment of an endpoint path
fn is_version_segment(segment: &str) -> bool {
    match segment.strip_prefix('v') {
        Some(rest) if !rest.is_empty() => rest
            .split('.')
            .all(|part| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit())),
        _ => false,
    }
}

/// Root of the endpoint, where the versions document lives: the path up to
/// the version segment, so deployments behind a path prefix keep it
fn version_root(endpoint: &str) -> Result<String> {
    let mut url = url::Url::parse(endpoint)
        .map_err(|e| ApiError::command(format!("Invalid endpoint '{}': {}", endpoint, e)))?;

    let segments: Vec<String> = url
        .path_segments()
        .map(|segs| segs.filter(|s| !s.is_empty()).map(str::to_string).collect())
        .unwrap_or_default();
    let prefix: Vec<String> = match segments.iter().rposition(|s| is_version_segment(s)) {
        Some(idx) => segments[..idx].to_vec(),
        None => segments,
    };

    let path = if prefix.is_empty() {
        "/".to_string()
    } else {
        format!("/{}/", prefix.join("/"))
    };
    url.set_path(&path);
    url.set_query(None);
    Ok(url.to_string())
}

async fn discover_versions(
    http: &ShareHttpClient,
    endpoint: &str,
    token: &str,
) -> Result<Option<(ApiVersion, ApiVersion)>> {
    let root = version_root(endpoint)?;

    let response = match http.request(Method::GET, &root, Some(token), None, None).await {
        Ok(response) => response,
        Err(ApiError::NotFound { .. }) => return Ok(None),
        Err(e) => return Err(e),
    };

    let document: VersionsDocument = match serde_json::from_value(response.body) {
        Ok(doc) => doc,
        Err(e) => {
            tracing::warn!("Unreadable versions document: {}", e);
            return Ok(None);
        }
    };

    Ok(document.v2_range())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ShareClient {
        let http = ShareHttpClient::new(&HttpOptions::default()).unwrap();
        ShareClient::with_version(http, "http://share:8786/v2/abc/", "t", ApiVersion::new(2, 36))
    }

    #[test]
    fn test_url_joins_paths() {
        let client = client();
        assert_eq!(
            client.url("/snapshots/detail"),
            "http://share:8786/v2/abc/snapshots/detail"
        );
        assert_eq!(
            client.url("http://share:8786/v2/abc/snapshots?marker=1"),
            "http://share:8786/v2/abc/snapshots?marker=1"
        );
    }

    #[test]
    fn test_version_root() {
        assert_eq!(
            version_root("http://share:8786/v2/abc").unwrap(),
            "http://share:8786/"
        );
        assert!(version_root("not a url").is_err());
    }

    #[test]
    fn test_version_root_keeps_path_prefix() {
        assert_eq!(
            version_root("https://cloud/share/v2/proj").unwrap(),
            "https://cloud/share/"
        );
        assert_eq!(
            version_root("https://cloud/share/v2.0/").unwrap(),
            "https://cloud/share/"
        );
        assert_eq!(version_root("https://cloud/share").unwrap(), "https://cloud/share/");
    }

    #[test]
    fn test_version_segment() {
        assert!(is_version_segment("v2"));
        assert!(is_version_segment("v2.0"));
        assert!(!is_version_segment("v"));
        assert!(!is_version_segment("volumes"));
        assert!(!is_version_segment("proj"));
    }
}
