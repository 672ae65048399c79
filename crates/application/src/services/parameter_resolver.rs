use servizor_domain::{
    render_url, DomainError, Endpoint, ParameterTree, Parameters, Service,
};
use tracing::debug;

/// Keys an environment is allowed to override.
pub const OVERRIDABLE_KEYS: [&str; 3] = ["proto", "addr", "port"];

/// Computes the parameters used to render an endpoint URL.
///
/// Layers, lowest precedence first:
/// service parameters, environment, environment.<interface>,
/// environment.<service type>, environment.<service type>.<interface>.
#[derive(Debug, Default, Clone, Copy)]
pub struct ParameterResolver;

impl ParameterResolver {
    pub fn new() -> Self {
        Self
    }

    /// Service parameters with the environment's top level applied.
    pub fn service_parameters(&self, env: &ParameterTree, service: &Service) -> Parameters {
        let mut params = service.parameters.clone();
        overlay(env, &mut params);
        params
    }

    pub fn resolve(&self, env: &ParameterTree, service: &Service, endpoint: &Endpoint) -> Parameters {
        let mut params = self.service_parameters(env, service);
        self.apply_endpoint_overrides(env, service, endpoint, &mut params);
        params
    }

    fn apply_endpoint_overrides(
        &self,
        env: &ParameterTree,
        service: &Service,
        endpoint: &Endpoint,
        params: &mut Parameters,
    ) {
        let interface = endpoint.interface.as_str();

        if let Some(interface_params) = env.child(interface) {
            debug!(interface, "Overrides found for interface");
            overlay(interface_params, params);
        }

        if let Some(type_params) = env.child(&service.service_type) {
            debug!(service_type = %service.service_type, "Overrides found for service type");
            overlay(type_params, params);

            if let Some(type_interface_params) = type_params.child(interface) {
                debug!(
                    service_type = %service.service_type,
                    interface,
                    "Found interface overrides for service type"
                );
                overlay(type_interface_params, params);
            }
        }
    }

    /// Resolves parameters and renders the endpoint URL with them.
    pub fn render(
        &self,
        env: &ParameterTree,
        service: &Service,
        endpoint: &Endpoint,
    ) -> Result<String, DomainError> {
        let params = self.resolve(env, service, endpoint);
        render_url(&endpoint.url, &params)
    }
}

fn overlay(source: &ParameterTree, target: &mut Parameters) {
    for key in OVERRIDABLE_KEYS {
        if let Some(value) = source.value(key) {
            target.insert(key.to_string(), value.to_string());
        }
    }
}
