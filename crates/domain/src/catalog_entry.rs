use crate::Interface;

/// A service record as held by the remote catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogService {
    pub id: String,
    pub name: String,
    pub service_type: String,
    pub description: Option<String>,
}

/// An endpoint record as held by the remote catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEndpoint {
    pub id: String,
    pub service_id: String,
    pub url: String,
    pub interface: Interface,
    pub region: String,
}
