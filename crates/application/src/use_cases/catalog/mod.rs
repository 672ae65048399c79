mod reconcile_catalog;

pub use reconcile_catalog::{ReconcileCatalogUseCase, ReconcileReport};
