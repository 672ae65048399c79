use crate::{DomainError, ParameterTree, Services};
use std::collections::HashMap;

/// Everything loaded from the definition files: the service registry and
/// the named environments.
#[derive(Debug, Default)]
pub struct DefinitionSet {
    pub services: Services,
    pub environments: HashMap<String, ParameterTree>,
}

impl DefinitionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn environment(&self, name: &str) -> Result<&ParameterTree, DomainError> {
        self.environments
            .get(name)
            .ok_or_else(|| DomainError::UnknownEnvironment(name.to_string()))
    }
}
