use async_trait::async_trait;
use servizor_domain::{CatalogEndpoint, CatalogService, DomainError, Interface};

/// The remote service catalog being reconciled against.
///
/// Implementations report a missing resource as [`DomainError::RemoteNotFound`]
/// and every other failure as [`DomainError::Remote`].
#[async_trait]
pub trait CatalogPort: Send + Sync {
    /// Looks up the single service registered under `service_type`.
    /// More than one match is a [`DomainError::Remote`] error.
    async fn find_service(&self, service_type: &str) -> Result<CatalogService, DomainError>;

    async fn create_service(
        &self,
        name: &str,
        service_type: &str,
        description: Option<&str>,
    ) -> Result<CatalogService, DomainError>;

    async fn update_service(
        &self,
        service: &CatalogService,
        name: &str,
        description: Option<&str>,
    ) -> Result<CatalogService, DomainError>;

    async fn list_endpoints(
        &self,
        service_id: &str,
        region: &str,
        interface: Interface,
    ) -> Result<Vec<CatalogEndpoint>, DomainError>;

    async fn create_endpoint(
        &self,
        service_id: &str,
        url: &str,
        interface: Interface,
        region: &str,
    ) -> Result<CatalogEndpoint, DomainError>;

    async fn update_endpoint(
        &self,
        endpoint: &CatalogEndpoint,
        url: &str,
    ) -> Result<CatalogEndpoint, DomainError>;
}
