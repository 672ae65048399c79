use crate::{DomainError, Endpoint, Parameters};
use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Identity of a service in the registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServiceKey {
    pub service_type: Arc<str>,
    pub name: Arc<str>,
}

/// A typed, named catalog entry and the endpoints it exposes.
///
/// Equality and hashing only consider `(service_type, name)`.
#[derive(Debug, Clone)]
pub struct Service {
    pub service_type: Arc<str>,
    pub name: Arc<str>,
    pub description: Option<Arc<str>>,
    pub parameters: Parameters,
    endpoints: Vec<Endpoint>,
}

impl Service {
    pub fn new(service_type: &str, name: &str) -> Self {
        Self {
            service_type: Arc::from(service_type),
            name: Arc::from(name),
            description: None,
            parameters: Parameters::new(),
            endpoints: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: Option<&str>) -> Self {
        self.description = description.map(Arc::from);
        self
    }

    pub fn with_parameters(mut self, parameters: Parameters) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn key(&self) -> ServiceKey {
        ServiceKey {
            service_type: Arc::clone(&self.service_type),
            name: Arc::clone(&self.name),
        }
    }

    pub fn endpoints(&self) -> &[Endpoint] {
        &self.endpoints
    }

    pub fn has_endpoints(&self) -> bool {
        !self.endpoints.is_empty()
    }

    /// Adds an endpoint, rejecting a second one with the same interface and region.
    pub fn add_endpoint(&mut self, endpoint: Endpoint) -> Result<(), DomainError> {
        if self.endpoints.iter().any(|e| *e == endpoint) {
            return Err(DomainError::EndpointNotUnique {
                interface: endpoint.interface.to_string(),
                region: endpoint.region.to_string(),
                service_type: self.service_type.to_string(),
            });
        }
        self.endpoints.push(endpoint);
        Ok(())
    }

    /// Adds every endpoint in order, stopping at the first duplicate.
    pub fn add_endpoints<I>(&mut self, endpoints: I) -> Result<(), DomainError>
    where
        I: IntoIterator<Item = Endpoint>,
    {
        let mut seen: HashSet<_> = self.endpoints.iter().map(Endpoint::key).collect();
        for endpoint in endpoints {
            if seen.contains(&endpoint.key()) {
                return Err(DomainError::EndpointNotUnique {
                    interface: endpoint.interface.to_string(),
                    region: endpoint.region.to_string(),
                    service_type: self.service_type.to_string(),
                });
            }
            seen.insert(endpoint.key());
            self.endpoints.push(endpoint);
        }
        Ok(())
    }
}

impl PartialEq for Service {
    fn eq(&self, other: &Self) -> bool {
        self.service_type == other.service_type && self.name == other.name
    }
}

impl Eq for Service {}

impl Hash for Service {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.service_type.hash(state);
        self.name.hash(state);
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Service: {}:{}>", self.service_type, self.name)
    }
}
