use servizor_domain::{
    CatalogEndpoint, CatalogService, DefinitionSet, DomainError, Endpoint, Service,
};
use std::sync::Arc;
use tracing::{info, info_span, instrument, warn, Instrument};

use crate::ports::CatalogPort;
use crate::services::ParameterResolver;

/// What a reconciliation run changed in the catalog.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReconcileReport {
    pub services_created: usize,
    pub services_updated: usize,
    pub services_without_endpoints: usize,
    pub endpoints_created: usize,
    pub endpoints_updated: usize,
}

/// A service together with the rendered URL of each of its endpoints.
struct ServicePlan<'a> {
    service: &'a Service,
    endpoints: Vec<(&'a Endpoint, String)>,
}

/// Creates or updates every loaded service and endpoint in the catalog.
///
/// All endpoint URLs are rendered before the first catalog call, so a
/// missing parameter never leaves the catalog half-updated. Catalog failures
/// other than "not found" abort the run; changes already made are kept.
pub struct ReconcileCatalogUseCase {
    catalog: Arc<dyn CatalogPort>,
    resolver: ParameterResolver,
}

impl ReconcileCatalogUseCase {
    pub fn new(catalog: Arc<dyn CatalogPort>) -> Self {
        Self {
            catalog,
            resolver: ParameterResolver::new(),
        }
    }

    #[instrument(skip(self, defs))]
    pub async fn execute(
        &self,
        defs: &DefinitionSet,
        environment: &str,
    ) -> Result<ReconcileReport, DomainError> {
        let plans = self.plan(defs, environment)?;
        info!(environment, services = plans.len(), "Using environment settings");

        let mut report = ReconcileReport::default();
        for plan in plans {
            let span = info_span!(
                "service",
                service_type = %plan.service.service_type,
                name = %plan.service.name
            );
            self.apply(plan, &mut report).instrument(span).await?;
        }

        info!(
            services_created = report.services_created,
            services_updated = report.services_updated,
            endpoints_created = report.endpoints_created,
            endpoints_updated = report.endpoints_updated,
            "Catalog reconciled"
        );
        Ok(report)
    }

    /// Resolves parameters and renders every endpoint URL, without touching
    /// the catalog.
    fn plan<'a>(
        &self,
        defs: &'a DefinitionSet,
        environment: &str,
    ) -> Result<Vec<ServicePlan<'a>>, DomainError> {
        let env = defs.environment(environment)?;

        defs.services
            .iter()
            .map(|service| {
                let endpoints = service
                    .endpoints()
                    .iter()
                    .map(|endpoint| {
                        let url = self.resolver.render(env, service, endpoint)?;
                        Ok((endpoint, url))
                    })
                    .collect::<Result<Vec<_>, DomainError>>()?;
                Ok(ServicePlan { service, endpoints })
            })
            .collect()
    }

    async fn apply(
        &self,
        plan: ServicePlan<'_>,
        report: &mut ReconcileReport,
    ) -> Result<(), DomainError> {
        info!("--== {} ==--", plan.service);
        let remote = self.sync_service(plan.service, report).await?;

        if plan.endpoints.is_empty() {
            warn!("Service {} doesn't have endpoints", plan.service);
            report.services_without_endpoints += 1;
            return Ok(());
        }

        for (endpoint, url) in plan.endpoints {
            self.sync_endpoint(plan.service, &remote, endpoint, &url, report)
                .await?;
        }
        Ok(())
    }

    async fn sync_service(
        &self,
        service: &Service,
        report: &mut ReconcileReport,
    ) -> Result<CatalogService, DomainError> {
        let description = service.description.as_deref();

        match self.catalog.find_service(&service.service_type).await {
            Ok(existing) => {
                info!(id = %existing.id, "Updating existing service {}", service);
                let updated = self
                    .catalog
                    .update_service(&existing, &service.name, description)
                    .await?;
                report.services_updated += 1;
                Ok(updated)
            }
            Err(e) if e.is_remote_not_found() => {
                info!(
                    "Service {}/{} doesn't exist, creating it",
                    service.service_type, service.name
                );
                let created = self
                    .catalog
                    .create_service(&service.name, &service.service_type, description)
                    .await?;
                report.services_created += 1;
                Ok(created)
            }
            Err(e) => Err(e),
        }
    }

    async fn sync_endpoint(
        &self,
        service: &Service,
        remote: &CatalogService,
        endpoint: &Endpoint,
        url: &str,
        report: &mut ReconcileReport,
    ) -> Result<CatalogEndpoint, DomainError> {
        let mut existing = self
            .catalog
            .list_endpoints(&remote.id, &endpoint.region, endpoint.interface)
            .await?;

        match existing.len() {
            0 => {
                info!("Creating {} endpoint for {}", endpoint, service);
                let created = self
                    .catalog
                    .create_endpoint(&remote.id, url, endpoint.interface, &endpoint.region)
                    .await?;
                report.endpoints_created += 1;
                Ok(created)
            }
            1 => {
                let current = existing.remove(0);
                info!(
                    id = %current.id,
                    current = %current.url,
                    new = %url,
                    "Updating existing {} endpoint",
                    endpoint
                );
                let updated = self.catalog.update_endpoint(&current, url).await?;
                report.endpoints_updated += 1;
                Ok(updated)
            }
            count => Err(DomainError::AmbiguousEndpoint {
                service_type: service.service_type.to_string(),
                interface: endpoint.interface.to_string(),
                region: endpoint.region.to_string(),
                count,
            }),
        }
    }
}
