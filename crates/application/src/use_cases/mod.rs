pub mod catalog;
pub mod definitions;

// Re-export use cases
pub use catalog::{ReconcileCatalogUseCase, ReconcileReport};
pub use definitions::LoadDefinitionsUseCase;
