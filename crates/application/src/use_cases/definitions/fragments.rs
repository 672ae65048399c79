//! Raw shapes of the definition documents, before they become model types.

use serde::Deserialize;
use serde_yaml::{Mapping, Value};
use servizor_domain::{DomainError, Endpoint, Interface, ParameterTree, Parameters, Service, DEFAULT_REGION};
use tracing::debug;

#[derive(Debug, Deserialize)]
pub(crate) struct ServiceFragment {
    #[serde(rename = "type")]
    pub service_type: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub parameters: Option<Mapping>,
    #[serde(default)]
    pub endpoints: Vec<EndpointFragment>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EndpointFragment {
    pub url: String,
    #[serde(default)]
    pub interface: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
}

/// The `service` field of an endpoints block: either a bare service type or
/// a full service fragment.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ServiceRef {
    Type(String),
    Fragment(ServiceFragment),
}

#[derive(Debug, Deserialize)]
pub(crate) struct EndpointsBlock {
    #[serde(default)]
    pub service: Option<ServiceRef>,
    #[serde(default)]
    pub entries: Vec<EndpointFragment>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EnvBlock {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub parameters: Option<Value>,
}

impl ServiceFragment {
    /// Splits the fragment into the service itself and its inline endpoints.
    pub fn into_parts(self) -> Result<(Service, Vec<Endpoint>), DomainError> {
        let parameters = match &self.parameters {
            Some(mapping) => flat_parameters(mapping)?,
            None => Parameters::new(),
        };
        let service = Service::new(&self.service_type, &self.name)
            .with_description(self.description.as_deref())
            .with_parameters(parameters);
        let endpoints = self
            .endpoints
            .into_iter()
            .map(EndpointFragment::into_endpoint)
            .collect::<Result<Vec<_>, _>>()?;
        Ok((service, endpoints))
    }
}

impl EndpointFragment {
    pub fn into_endpoint(self) -> Result<Endpoint, DomainError> {
        let interface = match self.interface.as_deref() {
            Some(raw) => raw.parse::<Interface>()?,
            None => Interface::default(),
        };
        let region = self.region.as_deref().unwrap_or(DEFAULT_REGION);
        Ok(Endpoint::new(&self.url, interface, region))
    }
}

/// Converts a mapping of scalars into parameters. Nested values are skipped.
pub(crate) fn flat_parameters(mapping: &Mapping) -> Result<Parameters, DomainError> {
    let mut params = Parameters::new();
    for (key, value) in mapping {
        let key = parameter_key(key)?;
        match scalar(value) {
            Some(v) => {
                params.insert(key, v);
            }
            None => debug!(key = %key, "Ignoring non-scalar service parameter"),
        }
    }
    Ok(params)
}

/// Converts environment parameters into a tree: scalars become values,
/// mappings become named children.
pub(crate) fn parameter_tree(value: &Value) -> Result<ParameterTree, DomainError> {
    let mapping = match value {
        Value::Null => return Ok(ParameterTree::new()),
        Value::Mapping(mapping) => mapping,
        other => {
            return Err(DomainError::Schema(format!(
                "Environment parameters must be a mapping, got {}",
                kind(other)
            )))
        }
    };

    let mut tree = ParameterTree::new();
    for (key, value) in mapping {
        let key = parameter_key(key)?;
        match value {
            Value::Mapping(_) => tree.insert_child(&key, parameter_tree(value)?),
            _ => match scalar(value) {
                Some(v) => tree.insert_value(&key, &v),
                None => debug!(key = %key, kind = kind(value), "Ignoring environment parameter"),
            },
        }
    }
    Ok(tree)
}

fn parameter_key(key: &Value) -> Result<String, DomainError> {
    scalar(key).ok_or_else(|| {
        DomainError::Schema(format!("Parameter keys must be scalars, got {}", kind(key)))
    })
}

fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

pub(crate) fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
