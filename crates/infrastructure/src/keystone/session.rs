use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use servizor_domain::config::AuthConfig;
use servizor_domain::DomainError;
use std::time::Duration;
use tracing::{debug, info};

use super::wire::{
    AuthBody, AuthRequest, DomainRef, ErrorEnvelope, Identity, PasswordMethod, ProjectRef, Scope,
    TokenCatalogEntry, TokenEnvelope, User,
};

const SUBJECT_TOKEN_HEADER: &str = "X-Subject-Token";
const AUTH_TOKEN_HEADER: &str = "X-Auth-Token";
const DEFAULT_DOMAIN_ID: &str = "default";

/// An authenticated connection to the identity service.
#[derive(Debug, Clone)]
pub struct KeystoneSession {
    http: reqwest::Client,
    identity_url: String,
    token: String,
}

impl KeystoneSession {
    /// Builds a session from an already issued token, talking to `identity_url`.
    pub fn with_token(
        auth: &AuthConfig,
        identity_url: &str,
        token: &str,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            http: build_client(auth)?,
            identity_url: normalize_identity_url(identity_url),
            token: token.to_string(),
        })
    }

    /// Authenticates with the configured token or password.
    pub async fn authenticate(auth: &AuthConfig) -> Result<Self, DomainError> {
        let auth_url = auth
            .auth_url
            .as_deref()
            .filter(|u| !u.is_empty())
            .map(normalize_identity_url)
            .ok_or_else(|| DomainError::ConfigError("No auth URL configured".to_string()))?;

        if let Some(token) = auth.token.as_deref().filter(|t| !t.is_empty()) {
            info!(auth_url = %auth_url, "Using pre-issued token");
            return Self::with_token(auth, &auth_url, token);
        }

        let password = auth
            .password
            .as_deref()
            .ok_or_else(|| DomainError::ConfigError("No password configured".to_string()))?;

        let http = build_client(auth)?;
        let request = password_request(auth, password);
        let url = format!("{}/auth/tokens", auth_url);
        debug!(url = %url, "Requesting token");

        let response = http
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| DomainError::Authentication(format!("{}: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            let message = error_message(response).await;
            return Err(DomainError::Authentication(format!(
                "HTTP {}: {}",
                status.as_u16(),
                message
            )));
        }

        let token = response
            .headers()
            .get(SUBJECT_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| {
                DomainError::Authentication(format!("No {} in response", SUBJECT_TOKEN_HEADER))
            })?;

        let body: TokenEnvelope = response
            .json()
            .await
            .map_err(|e| DomainError::Authentication(format!("Invalid token response: {}", e)))?;

        let identity_url = identity_url_from_catalog(
            &body.token.catalog,
            &auth.endpoint_type,
            auth.region_name.as_deref(),
        )
        .unwrap_or(auth_url);
        info!(identity_url = %identity_url, "Authenticated");

        Ok(Self {
            http,
            identity_url,
            token,
        })
    }

    pub fn identity_url(&self) -> &str {
        &self.identity_url
    }

    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, DomainError> {
        let url = self.url(path);
        debug!(url = %url, ?query, "GET");
        let request = self
            .http
            .get(&url)
            .header(AUTH_TOKEN_HEADER, &self.token)
            .query(query);
        Self::execute(Method::GET, &url, request).await
    }

    pub(crate) async fn send<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T, DomainError> {
        let url = self.url(path);
        debug!(url = %url, %method, "Sending request");
        let request = self
            .http
            .request(method.clone(), &url)
            .header(AUTH_TOKEN_HEADER, &self.token)
            .json(body);
        Self::execute(method, &url, request).await
    }

    async fn execute<T: DeserializeOwned>(
        method: Method,
        url: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<T, DomainError> {
        let response = request
            .send()
            .await
            .map_err(|e| DomainError::Remote(format!("{} {} failed: {}", method, url, e)))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(DomainError::RemoteNotFound(error_message(response).await));
        }
        if !status.is_success() {
            let message = error_message(response).await;
            return Err(DomainError::Remote(format!(
                "{} {} returned HTTP {}: {}",
                method,
                url,
                status.as_u16(),
                message
            )));
        }

        response.json().await.map_err(|e| {
            DomainError::Remote(format!("Invalid response from {} {}: {}", method, url, e))
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.identity_url, path.trim_start_matches('/'))
    }
}

/// Trims trailing slashes and makes sure the URL points at the v3 API.
pub fn normalize_identity_url(url: &str) -> String {
    let trimmed = url.trim().trim_end_matches('/');
    if trimmed.ends_with("/v3") {
        trimmed.to_string()
    } else {
        format!("{}/v3", trimmed)
    }
}

fn build_client(auth: &AuthConfig) -> Result<reqwest::Client, DomainError> {
    reqwest::Client::builder()
        .use_rustls_tls()
        .timeout(Duration::from_secs(auth.timeout_secs))
        .danger_accept_invalid_certs(auth.insecure)
        .build()
        .map_err(|e| DomainError::ConfigError(format!("Failed to build HTTP client: {}", e)))
}

fn password_request<'a>(auth: &'a AuthConfig, password: &'a str) -> AuthRequest<'a> {
    let user = match auth.user_id.as_deref() {
        Some(id) => User {
            id: Some(id),
            name: None,
            domain: None,
            password,
        },
        None => User {
            id: None,
            name: auth.username.as_deref(),
            domain: Some(domain_ref(
                auth.user_domain_id.as_deref(),
                auth.user_domain_name.as_deref(),
            )),
            password,
        },
    };

    let scope = match (auth.project_id.as_deref(), auth.project_name.as_deref()) {
        (Some(id), _) => Some(Scope {
            project: ProjectRef {
                id: Some(id),
                name: None,
                domain: None,
            },
        }),
        (None, Some(name)) => Some(Scope {
            project: ProjectRef {
                id: None,
                name: Some(name),
                domain: Some(domain_ref(
                    auth.project_domain_id.as_deref(),
                    auth.project_domain_name.as_deref(),
                )),
            },
        }),
        (None, None) => None,
    };

    AuthRequest {
        auth: AuthBody {
            identity: Identity {
                methods: vec!["password"],
                password: PasswordMethod { user },
            },
            scope,
        },
    }
}

fn domain_ref<'a>(id: Option<&'a str>, name: Option<&'a str>) -> DomainRef<'a> {
    match (id, name) {
        (Some(id), _) => DomainRef {
            id: Some(id),
            name: None,
        },
        (None, Some(name)) => DomainRef {
            id: None,
            name: Some(name),
        },
        (None, None) => DomainRef {
            id: Some(DEFAULT_DOMAIN_ID),
            name: None,
        },
    }
}

/// Picks the identity endpoint matching the interface and, when given, region.
fn identity_url_from_catalog(
    catalog: &[TokenCatalogEntry],
    interface: &str,
    region: Option<&str>,
) -> Option<String> {
    catalog
        .iter()
        .filter(|entry| entry.service_type == "identity")
        .flat_map(|entry| entry.endpoints.iter())
        .find(|ep| {
            ep.interface == interface
                && region.is_none_or(|r| {
                    ep.region_id.as_deref() == Some(r) || ep.region.as_deref() == Some(r)
                })
        })
        .map(|ep| normalize_identity_url(&ep.url))
}

async fn error_message(response: reqwest::Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    match serde_json::from_str::<ErrorEnvelope>(&body) {
        Ok(envelope) => envelope
            .error
            .message
            .or(envelope.error.title)
            .unwrap_or_else(|| status.to_string()),
        Err(_) if body.is_empty() => status.to_string(),
        Err(_) => body,
    }
}
