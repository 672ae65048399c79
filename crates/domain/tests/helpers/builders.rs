#![allow(dead_code)]
use servizor_domain::{Endpoint, Interface, Parameters, Service};

pub struct ServiceBuilder {
    service_type: String,
    name: String,
    description: Option<String>,
    parameters: Parameters,
    endpoints: Vec<Endpoint>,
}

impl ServiceBuilder {
    pub fn new() -> Self {
        Self {
            service_type: "dns".to_string(),
            name: "designate".to_string(),
            description: None,
            parameters: Parameters::new(),
            endpoints: Vec::new(),
        }
    }

    pub fn service_type(mut self, service_type: &str) -> Self {
        self.service_type = service_type.to_string();
        self
    }

    pub fn name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn parameter(mut self, key: &str, value: &str) -> Self {
        self.parameters.insert(key.to_string(), value.to_string());
        self
    }

    pub fn endpoint(mut self, url: &str, interface: Interface, region: &str) -> Self {
        self.endpoints.push(Endpoint::new(url, interface, region));
        self
    }

    pub fn build(self) -> Service {
        let mut service = Service::new(&self.service_type, &self.name)
            .with_description(self.description.as_deref())
            .with_parameters(self.parameters);
        service
            .add_endpoints(self.endpoints)
            .expect("builder endpoints must be unique");
        service
    }
}
