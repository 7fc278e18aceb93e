//! Authentication
//!
//! Either uses a pre-issued token against a known endpoint, or logs in to
//! Keystone v3 with password credentials and takes the share endpoint from
//! the returned service catalog.

use super::http::ShareHttpClient;
use crate::error::{ApiError, Result};
use reqwest::Method;
use serde::Deserialize;
use serde_json::{json, Value};

/// Service type of the share v2 API in the catalog
pub const SERVICE_TYPE: &str = "sharev2";

const SUBJECT_TOKEN_HEADER: &str = "X-Subject-Token";

/// How to obtain a token and endpoint
#[derive(Clone)]
pub enum Credentials {
    /// Token issued elsewhere, endpoint given explicitly
    Token { token: String, endpoint: String },
    /// Keystone v3 password login
    Password(PasswordAuth),
}

#[derive(Clone)]
pub struct PasswordAuth {
    pub auth_url: String,
    pub username: String,
    pub password: String,
    pub project_name: String,
    pub user_domain_name: String,
    pub project_domain_name: String,
    pub region_name: Option<String>,
    /// Skip the catalog lookup and use this endpoint
    pub endpoint_override: Option<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print secrets
        match self {
            Credentials::Token { endpoint, .. } => f
                .debug_struct("Token")
                .field("endpoint", endpoint)
                .finish_non_exhaustive(),
            Credentials::Password(auth) => f
                .debug_struct("Password")
                .field("auth_url", &auth.auth_url)
                .field("username", &auth.username)
                .field("project_name", &auth.project_name)
                .finish_non_exhaustive(),
        }
    }
}

/// Authenticated session material
#[derive(Clone)]
pub struct Session {
    pub token: String,
    pub endpoint: String,
}

#[derive(Debug, Deserialize)]
struct TokenBody {
    token: TokenInfo,
}

#[derive(Debug, Deserialize)]
struct TokenInfo {
    #[serde(default)]
    catalog: Vec<CatalogEntry>,
}

#[derive(Debug, Deserialize)]
struct CatalogEntry {
    #[serde(rename = "type")]
    service_type: String,
    #[serde(default)]
    endpoints: Vec<CatalogEndpoint>,
}

#[derive(Debug, Deserialize)]
struct CatalogEndpoint {
    interface: String,
    url: String,
    #[serde(default)]
    region: Option<String>,
    #[serde(default)]
    region_id: Option<String>,
}

/// Resolve credentials into a token and endpoint
pub async fn authenticate(http: &ShareHttpClient, credentials: &Credentials) -> Result<Session> {
    match credentials {
        Credentials::Token { token, endpoint } => Ok(Session {
            token: token.clone(),
            endpoint: endpoint.clone(),
        }),
        Credentials::Password(auth) => password_login(http, auth).await,
    }
}

fn password_request_body(auth: &PasswordAuth) -> Value {
    json!({
        "auth": {
            "identity": {
                "methods": ["password"],
                "password": {
                    "user": {
                        "name": auth.username,
                        "domain": {"name": auth.user_domain_name},
                        "password": auth.password
                    }
                }
            },
            "scope": {
                "project": {
                    "name": auth.project_name,
                    "domain": {"name": auth.project_domain_name}
                }
            }
        }
    })
}

async fn password_login(http: &ShareHttpClient, auth: &PasswordAuth) -> Result<Session> {
    let url = format!("{}/auth/tokens", auth.auth_url.trim_end_matches('/'));
    tracing::info!("Authenticating {} against {}", auth.username, auth.auth_url);

    let body = password_request_body(auth);
    let response = http.request(Method::POST, &url, None, None, Some(&body)).await?;

    let token = response
        .header(SUBJECT_TOKEN_HEADER)
        .ok_or_else(|| {
            ApiError::MalformedResponse(format!("missing {} header", SUBJECT_TOKEN_HEADER))
        })?
        .to_string();

    let endpoint = match &auth.endpoint_override {
        Some(endpoint) => endpoint.clone(),
        None => {
            let parsed: TokenBody = serde_json::from_value(response.body)
                .map_err(|e| ApiError::MalformedResponse(format!("token body: {}", e)))?;
            find_endpoint(&parsed.token.catalog, auth.region_name.as_deref())?
        }
    };

    Ok(Session { token, endpoint })
}

/// Find the public share endpoint in a service catalog
fn find_endpoint(catalog: &[CatalogEntry], region: Option<&str>) -> Result<String> {
    catalog
        .iter()
        .filter(|entry| entry.service_type == SERVICE_TYPE)
        .flat_map(|entry| entry.endpoints.iter())
        .filter(|ep| ep.interface == "public")
        .find(|ep| match region {
            Some(region) => {
                ep.region.as_deref() == Some(region) || ep.region_id.as_deref() == Some(region)
            }
            None => true,
        })
        .map(|ep| ep.url.clone())
        .ok_or_else(|| {
            ApiError::command(format!(
                "No public '{}' endpoint found in the service catalog{}",
                SERVICE_TYPE,
                region.map(|r| format!(" for region {}", r)).unwrap_or_default()
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<CatalogEntry> {
        serde_json::from_value(json!([
            {"type": "compute", "endpoints": [
                {"interface": "public", "url": "http://nova", "region": "r1"}
            ]},
            {"type": "sharev2", "endpoints": [
                {"interface": "internal", "url": "http://internal:8786/v2", "region": "r1"},
                {"interface": "public", "url": "http://r1:8786/v2", "region": "r1"},
                {"interface": "public", "url": "http://r2:8786/v2", "region_id": "r2"}
            ]}
        ]))
        .unwrap()
    }

    #[test]
    fn test_find_endpoint_any_region() {
        assert_eq!(find_endpoint(&catalog(), None).unwrap(), "http://r1:8786/v2");
    }

    #[test]
    fn test_find_endpoint_by_region() {
        assert_eq!(
            find_endpoint(&catalog(), Some("r2")).unwrap(),
            "http://r2:8786/v2"
        );
        assert!(find_endpoint(&catalog(), Some("r3")).is_err());
    }

    #[test]
    fn test_password_body_shape() {
        let auth = PasswordAuth {
            auth_url: "http://keystone/v3".into(),
            username: "demo".into(),
            password: "secret".into(),
            project_name: "demo-project".into(),
            user_domain_name: "Default".into(),
            project_domain_name: "Default".into(),
            region_name: None,
            endpoint_override: None,
        };
        let body = password_request_body(&auth);
        assert_eq!(body["auth"]["identity"]["password"]["user"]["name"], "demo");
        assert_eq!(body["auth"]["scope"]["project"]["name"], "demo-project");
    }

    #[test]
    fn test_debug_hides_secrets() {
        let creds = Credentials::Token {
            token: "very-secret".into(),
            endpoint: "http://share".into(),
        };
        assert!(!format!("{:?}", creds).contains("very-secret"));
    }
}
