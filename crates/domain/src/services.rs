use crate::{Service, ServiceKey};
use indexmap::map::Values;
use indexmap::IndexMap;
use std::sync::Arc;

/// Registry holding one [`Service`] per `(type, name)`, iterated in
/// registration order.
#[derive(Debug, Default)]
pub struct Services {
    services: IndexMap<ServiceKey, Service>,
}

impl Services {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, service_type: &str, name: &str) -> Option<&Service> {
        let key = ServiceKey {
            service_type: Arc::from(service_type),
            name: Arc::from(name),
        };
        self.services.get(&key)
    }

    pub fn contains(&self, key: &ServiceKey) -> bool {
        self.services.contains_key(key)
    }

    /// Returns the registered service with the same identity as `service`,
    /// registering `service` first if there is none. An existing entry is
    /// returned untouched.
    pub fn get_or_create(&mut self, service: Service) -> &mut Service {
        self.services.entry(service.key()).or_insert(service)
    }

    /// First registered service of the given type.
    pub fn first_of_type_mut(&mut self, service_type: &str) -> Option<&mut Service> {
        self.services
            .values_mut()
            .find(|s| s.service_type.as_ref() == service_type)
    }

    pub fn iter(&self) -> Values<'_, ServiceKey, Service> {
        self.services.values()
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

impl<'a> IntoIterator for &'a Services {
    type Item = &'a Service;
    type IntoIter = Values<'a, ServiceKey, Service>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
