use serde::de::DeserializeOwned;
use serde_yaml::{Mapping, Value};
use servizor_domain::{DefinitionSet, DomainError, Endpoint, Service};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

use super::fragments::{
    kind, parameter_tree, EndpointsBlock, EnvBlock, ServiceFragment, ServiceRef,
};

/// Builds a [`DefinitionSet`] from YAML definition files.
///
/// Each file holds a sequence of single-key documents. The key selects the
/// handler: `service`/`svc`, `endpoints`/`endpoint`, or `env`/`environmnt`.
/// An endpoints block naming its service by type attaches to the first
/// service of that type declared so far, so declare the service first.
/// Loading is purely local; no catalog calls happen here.
#[derive(Debug, Default)]
pub struct LoadDefinitionsUseCase;

impl LoadDefinitionsUseCase {
    pub fn new() -> Self {
        Self
    }

    #[instrument(skip(self))]
    pub fn execute(&self, files: &[PathBuf]) -> Result<DefinitionSet, DomainError> {
        let duplicates = duplicate_paths(files);
        if !duplicates.is_empty() {
            return Err(DomainError::DuplicateDefinitionFile(duplicates));
        }

        let mut defs = DefinitionSet::new();
        for file in files {
            let documents = read_documents(file)?;
            info!(file = %file.display(), documents = documents.len(), "Loading definitions");
            for document in documents {
                self.load_document(&mut defs, file, document)?;
            }
        }

        info!(
            services = defs.services.len(),
            environments = defs.environments.len(),
            "Definitions loaded"
        );
        Ok(defs)
    }

    fn load_document(
        &self,
        defs: &mut DefinitionSet,
        file: &Path,
        document: Value,
    ) -> Result<(), DomainError> {
        let (key, value) = single_entry(file, document)?;

        match key.as_str() {
            "service" | "svc" => {
                let fragment: ServiceFragment = parse_block(file, &key, value)?;
                debug!(service_type = %fragment.service_type, name = %fragment.name, "Loading service");
                load_service(defs, fragment)
            }
            "endpoints" | "endpoint" => {
                let block: EndpointsBlock = parse_block(file, &key, value)?;
                load_endpoints(defs, block)
            }
            "env" | "environmnt" => {
                let block: EnvBlock = parse_block(file, &key, value)?;
                load_environment(defs, block)
            }
            other => Err(DomainError::UnrecognizedKey(other.to_string())),
        }
    }
}

fn load_service(defs: &mut DefinitionSet, fragment: ServiceFragment) -> Result<(), DomainError> {
    let (service, endpoints) = fragment.into_parts()?;
    register(defs, service, endpoints)?;
    Ok(())
}

fn load_endpoints(defs: &mut DefinitionSet, block: EndpointsBlock) -> Result<(), DomainError> {
    let service = match block.service {
        None => {
            return Err(DomainError::Schema(
                "Endpoint needs to belong to a service".to_string(),
            ))
        }
        Some(ServiceRef::Fragment(fragment)) => {
            let (service, inline) = fragment.into_parts()?;
            register(defs, service, inline)?
        }
        Some(ServiceRef::Type(service_type)) => {
            if defs.services.first_of_type_mut(&service_type).is_none() {
                warn!(
                    service_type = %service_type,
                    "Endpoints reference a service type not declared yet, registering a service named after the type"
                );
                defs.services
                    .get_or_create(Service::new(&service_type, &service_type));
            }
            defs.services
                .first_of_type_mut(&service_type)
                .ok_or_else(|| DomainError::Schema(format!("No service of type {}", service_type)))?
        }
    };

    debug!(service = %service, entries = block.entries.len(), "Loading endpoints");
    for entry in block.entries {
        service.add_endpoint(entry.into_endpoint()?)?;
    }
    Ok(())
}

fn load_environment(defs: &mut DefinitionSet, block: EnvBlock) -> Result<(), DomainError> {
    let name = block
        .name
        .ok_or_else(|| DomainError::Schema("Environment needs a name".to_string()))?;
    let tree = match &block.parameters {
        Some(value) => parameter_tree(value)?,
        None => Default::default(),
    };

    if defs.environments.insert(name.clone(), tree).is_some() {
        debug!(environment = %name, "Environment redefined, later definition wins");
    }
    Ok(())
}

/// Registers `service` together with its inline endpoints. When a service
/// with the same type and name exists it is returned as it is, and the new
/// declaration, endpoints included, is ignored.
fn register(
    defs: &mut DefinitionSet,
    service: Service,
    inline: Vec<Endpoint>,
) -> Result<&mut Service, DomainError> {
    if let Some(existing) = defs.services.get(&service.service_type, &service.name) {
        let endpoints_differ = inline.iter().any(|endpoint| {
            !existing
                .endpoints()
                .iter()
                .any(|e| e == endpoint && e.url == endpoint.url)
        });
        if existing.description != service.description
            || existing.parameters != service.parameters
            || endpoints_differ
        {
            warn!(
                service = %existing,
                ignored_endpoints = inline.len(),
                "Service redeclared with different description, parameters or endpoints, keeping the first declaration"
            );
        }
        return Ok(defs.services.get_or_create(service));
    }

    let registered = defs.services.get_or_create(service);
    registered.add_endpoints(inline)?;
    Ok(registered)
}

fn duplicate_paths(files: &[PathBuf]) -> Vec<String> {
    let mut counts: HashMap<&PathBuf, usize> = HashMap::new();
    let mut order = Vec::new();
    for file in files {
        let count = counts.entry(file).or_insert(0);
        *count += 1;
        if *count == 2 {
            order.push(file.display().to_string());
        }
    }
    order
}

fn read_documents(file: &Path) -> Result<Vec<Value>, DomainError> {
    if !file.exists() {
        return Err(DomainError::DefinitionFileNotFound(file.display().to_string()));
    }

    let contents =
        std::fs::read_to_string(file).map_err(|e| DomainError::DefinitionFileRead {
            path: file.display().to_string(),
            reason: e.to_string(),
        })?;

    let root: Value = serde_yaml::from_str(&contents).map_err(|e| {
        DomainError::Schema(format!("{}: invalid YAML: {}", file.display(), e))
    })?;

    match root {
        Value::Null => Ok(Vec::new()),
        Value::Sequence(documents) => Ok(documents),
        other => Err(DomainError::Schema(format!(
            "{}: expected a sequence of definitions, got {}",
            file.display(),
            kind(&other)
        ))),
    }
}

fn single_entry(file: &Path, document: Value) -> Result<(String, Value), DomainError> {
    let mapping: Mapping = match document {
        Value::Mapping(mapping) => mapping,
        other => {
            return Err(DomainError::Schema(format!(
                "{}: each definition must be a mapping, got {}",
                file.display(),
                kind(&other)
            )))
        }
    };

    if mapping.len() != 1 {
        return Err(DomainError::Schema(format!(
            "{}: each definition must have exactly one key, got {}",
            file.display(),
            mapping.len()
        )));
    }

    let Some((key, value)) = mapping.into_iter().next() else {
        return Err(DomainError::Schema(format!("{}: empty definition", file.display())));
    };
    match key {
        Value::String(key) => Ok((key, value)),
        other => Err(DomainError::Schema(format!(
            "{}: definition keys must be strings, got {}",
            file.display(),
            kind(&other)
        ))),
    }
}

fn parse_block<T: DeserializeOwned>(file: &Path, key: &str, value: Value) -> Result<T, DomainError> {
    serde_yaml::from_value(value).map_err(|e| {
        DomainError::Schema(format!("{}: invalid '{}' definition: {}", file.display(), key, e))
    })
}
