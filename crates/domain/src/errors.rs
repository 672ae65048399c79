use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("{0} is a non-existent definition file")]
    DefinitionFileNotFound(String),

    #[error("Definition file(s) found multiple times: {}", .0.join(", "))]
    DuplicateDefinitionFile(Vec<String>),

    #[error("Failed to read definition file {path}: {reason}")]
    DefinitionFileRead { path: String, reason: String },

    #[error("Invalid definition: {0}")]
    Schema(String),

    #[error("Don't know how to handle key {0}")]
    UnrecognizedKey(String),

    #[error("Endpoint {interface}/{region} is not unique for {service_type}")]
    EndpointNotUnique {
        interface: String,
        region: String,
        service_type: String,
    },

    #[error("Params {params} not sufficient to format url {url} (missing: {})", .missing.join(", "))]
    MissingParameter {
        missing: Vec<String>,
        url: String,
        params: String,
    },

    #[error("Invalid url template {url}: {reason}")]
    InvalidTemplate { url: String, reason: String },

    #[error("Environment {0} is not defined")]
    UnknownEnvironment(String),

    #[error("Resource not found in catalog: {0}")]
    RemoteNotFound(String),

    #[error("Catalog request failed: {0}")]
    Remote(String),

    #[error(
        "Found {count} {interface} endpoints in region {region} for {service_type}, refusing to guess"
    )]
    AmbiguousEndpoint {
        service_type: String,
        interface: String,
        region: String,
        count: usize,
    },

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl DomainError {
    /// Whether this error is the catalog's "not found" answer, which the
    /// reconciler turns into a create.
    pub fn is_remote_not_found(&self) -> bool {
        matches!(self, DomainError::RemoteNotFound(_))
    }
}
