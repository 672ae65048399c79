#![allow(unused_imports)]

mod definitions;
mod log_capture;

pub use definitions::DefinitionFiles;
pub use log_capture::CapturedLogs;
pub use mock_catalog::{CatalogCall, MockCatalog};
