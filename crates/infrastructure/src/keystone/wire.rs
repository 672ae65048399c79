//! JSON bodies exchanged with the Keystone v3 API.

use serde::{Deserialize, Serialize};
use servizor_domain::{CatalogEndpoint, CatalogService, DomainError, Interface};

// ── Authentication ────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub(crate) struct AuthRequest<'a> {
    pub auth: AuthBody<'a>,
}

#[derive(Debug, Serialize)]
pub(crate) struct AuthBody<'a> {
    pub identity: Identity<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<Scope<'a>>,
}

#[derive(Debug, Serialize)]
pub(crate) struct Identity<'a> {
    pub methods: Vec<&'static str>,
    pub password: PasswordMethod<'a>,
}

#[derive(Debug, Serialize)]
pub(crate) struct PasswordMethod<'a> {
    pub user: User<'a>,
}

#[derive(Debug, Serialize)]
pub(crate) struct User<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<DomainRef<'a>>,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct DomainRef<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub(crate) struct Scope<'a> {
    pub project: ProjectRef<'a>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ProjectRef<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<DomainRef<'a>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TokenEnvelope {
    pub token: TokenBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TokenBody {
    #[serde(default)]
    pub catalog: Vec<TokenCatalogEntry>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TokenCatalogEntry {
    #[serde(rename = "type")]
    pub service_type: String,
    #[serde(default)]
    pub endpoints: Vec<TokenCatalogEndpoint>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TokenCatalogEndpoint {
    pub url: String,
    pub interface: String,
    #[serde(default)]
    pub region_id: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
}

// ── Services ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub(crate) struct ServiceRecord {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub service_type: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ServicesEnvelope {
    pub services: Vec<ServiceRecord>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ServiceEnvelope {
    pub service: ServiceRecord,
}

#[derive(Debug, Serialize)]
pub(crate) struct ServiceWrite<'a> {
    pub service: ServiceFields<'a>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ServiceFields<'a> {
    pub name: &'a str,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub service_type: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

impl From<ServiceRecord> for CatalogService {
    fn from(record: ServiceRecord) -> Self {
        Self {
            id: record.id,
            name: record.name.unwrap_or_default(),
            service_type: record.service_type,
            description: record.description,
        }
    }
}

// ── Endpoints ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub(crate) struct EndpointRecord {
    pub id: String,
    pub service_id: String,
    pub url: String,
    pub interface: String,
    #[serde(default)]
    pub region_id: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EndpointsEnvelope {
    pub endpoints: Vec<EndpointRecord>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EndpointEnvelope {
    pub endpoint: EndpointRecord,
}

#[derive(Debug, Serialize)]
pub(crate) struct EndpointWrite<'a> {
    pub endpoint: EndpointFields<'a>,
}

#[derive(Debug, Serialize)]
pub(crate) struct EndpointFields<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_id: Option<&'a str>,
    pub url: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interface: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region_id: Option<&'a str>,
}

impl EndpointRecord {
    /// Region of the endpoint; older deployments only fill in `region`.
    pub fn region(&self) -> &str {
        self.region_id
            .as_deref()
            .or(self.region.as_deref())
            .unwrap_or_default()
    }
}

impl TryFrom<EndpointRecord> for CatalogEndpoint {
    type Error = DomainError;

    fn try_from(record: EndpointRecord) -> Result<Self, Self::Error> {
        let interface: Interface = record.interface.parse().map_err(|_| {
            DomainError::Remote(format!(
                "Endpoint {} has unknown interface {}",
                record.id, record.interface
            ))
        })?;
        let region = record.region().to_string();
        Ok(Self {
            id: record.id,
            service_id: record.service_id,
            url: record.url,
            interface,
            region,
        })
    }
}

// ── Errors ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}
