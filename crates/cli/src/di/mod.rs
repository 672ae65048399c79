use servizor_application::use_cases::{LoadDefinitionsUseCase, ReconcileCatalogUseCase};
use servizor_domain::config::AuthConfig;
use servizor_infrastructure::keystone::{KeystoneCatalog, KeystoneSession};
use std::sync::Arc;
use tracing::info;

/// Use cases that need no remote connection.
pub struct LocalUseCases {
    pub load_definitions: LoadDefinitionsUseCase,
}

impl LocalUseCases {
    pub fn new() -> Self {
        Self {
            load_definitions: LoadDefinitionsUseCase::new(),
        }
    }
}

/// Use cases backed by the identity service.
pub struct RemoteUseCases {
    pub reconcile_catalog: ReconcileCatalogUseCase,
}

impl RemoteUseCases {
    pub async fn connect(auth: &AuthConfig) -> anyhow::Result<Self> {
        let session = KeystoneSession::authenticate(auth).await?;
        info!(identity_url = %session.identity_url(), "Connected to identity service");
        let catalog = Arc::new(KeystoneCatalog::new(session));

        Ok(Self {
            reconcile_catalog: ReconcileCatalogUseCase::new(catalog),
        })
    }
}
