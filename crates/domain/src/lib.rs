//! Servizor Domain Layer
pub mod catalog_entry;
pub mod config;
pub mod definition_set;
pub mod endpoint;
pub mod errors;
pub mod parameters;
pub mod service;
pub mod services;
pub mod url_template;

pub use catalog_entry::{CatalogEndpoint, CatalogService};
pub use config::{CliOverrides, Config};
pub use definition_set::DefinitionSet;
pub use endpoint::{Endpoint, EndpointKey, Interface, DEFAULT_REGION};
pub use errors::DomainError;
pub use parameters::{ParameterTree, Parameters};
pub use service::{Service, ServiceKey};
pub use services::Services;
pub use url_template::render_url;
