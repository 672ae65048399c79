use async_trait::async_trait;
use reqwest::Method;
use servizor_application::ports::CatalogPort;
use servizor_domain::{CatalogEndpoint, CatalogService, DomainError, Interface};
use tracing::{debug, info, instrument};

use super::session::KeystoneSession;
use super::wire::{
    EndpointEnvelope, EndpointFields, EndpointWrite, EndpointsEnvelope, ServiceEnvelope,
    ServiceFields, ServiceWrite, ServicesEnvelope,
};

/// [`CatalogPort`] backed by the Keystone v3 REST API.
pub struct KeystoneCatalog {
    session: KeystoneSession,
}

impl KeystoneCatalog {
    pub fn new(session: KeystoneSession) -> Self {
        Self { session }
    }
}

#[async_trait]
impl CatalogPort for KeystoneCatalog {
    #[instrument(skip(self))]
    async fn find_service(&self, service_type: &str) -> Result<CatalogService, DomainError> {
        let envelope: ServicesEnvelope = self
            .session
            .get("services", &[("type", service_type)])
            .await?;

        // Older deployments ignore the type filter.
        let mut matches: Vec<CatalogService> = envelope
            .services
            .into_iter()
            .filter(|s| s.service_type == service_type)
            .map(CatalogService::from)
            .collect();

        match matches.len() {
            0 => Err(DomainError::RemoteNotFound(format!(
                "No service of type {}",
                service_type
            ))),
            1 => Ok(matches.remove(0)),
            n => Err(DomainError::Remote(format!(
                "{} services of type {} registered",
                n, service_type
            ))),
        }
    }

    #[instrument(skip(self, description))]
    async fn create_service(
        &self,
        name: &str,
        service_type: &str,
        description: Option<&str>,
    ) -> Result<CatalogService, DomainError> {
        let body = ServiceWrite {
            service: ServiceFields {
                name,
                service_type: Some(service_type),
                description,
                enabled: Some(true),
            },
        };
        let envelope: ServiceEnvelope = self.session.send(Method::POST, "services", &body).await?;
        info!(id = %envelope.service.id, "Service created");
        Ok(envelope.service.into())
    }

    #[instrument(skip(self, service, description), fields(id = %service.id))]
    async fn update_service(
        &self,
        service: &CatalogService,
        name: &str,
        description: Option<&str>,
    ) -> Result<CatalogService, DomainError> {
        let body = ServiceWrite {
            service: ServiceFields {
                name,
                service_type: None,
                description,
                enabled: None,
            },
        };
        let path = format!("services/{}", service.id);
        let envelope: ServiceEnvelope = self.session.send(Method::PATCH, &path, &body).await?;
        debug!("Service updated");
        Ok(envelope.service.into())
    }

    #[instrument(skip(self))]
    async fn list_endpoints(
        &self,
        service_id: &str,
        region: &str,
        interface: Interface,
    ) -> Result<Vec<CatalogEndpoint>, DomainError> {
        let envelope: EndpointsEnvelope = self
            .session
            .get(
                "endpoints",
                &[
                    ("service_id", service_id),
                    ("interface", interface.as_str()),
                    ("region_id", region),
                ],
            )
            .await?;

        envelope
            .endpoints
            .into_iter()
            .filter(|e| {
                e.service_id == service_id
                    && e.interface.eq_ignore_ascii_case(interface.as_str())
                    && e.region() == region
            })
            .map(CatalogEndpoint::try_from)
            .collect()
    }

    #[instrument(skip(self))]
    async fn create_endpoint(
        &self,
        service_id: &str,
        url: &str,
        interface: Interface,
        region: &str,
    ) -> Result<CatalogEndpoint, DomainError> {
        let body = EndpointWrite {
            endpoint: EndpointFields {
                service_id: Some(service_id),
                url,
                interface: Some(interface.as_str()),
                region_id: Some(region),
            },
        };
        let envelope: EndpointEnvelope =
            self.session.send(Method::POST, "endpoints", &body).await?;
        info!(id = %envelope.endpoint.id, "Endpoint created");
        envelope.endpoint.try_into()
    }

    #[instrument(skip(self, endpoint), fields(id = %endpoint.id))]
    async fn update_endpoint(
        &self,
        endpoint: &CatalogEndpoint,
        url: &str,
    ) -> Result<CatalogEndpoint, DomainError> {
        let body = EndpointWrite {
            endpoint: EndpointFields {
                service_id: None,
                url,
                interface: None,
                region_id: None,
            },
        };
        let path = format!("endpoints/{}", endpoint.id);
        let envelope: EndpointEnvelope = self.session.send(Method::PATCH, &path, &body).await?;
        debug!("Endpoint updated");
        envelope.endpoint.try_into()
    }
}
