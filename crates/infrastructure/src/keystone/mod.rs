//! Keystone v3 adapter for the service catalog.
//!
//! [`KeystoneSession`] authenticates and locates the identity endpoint;
//! [`KeystoneCatalog`] implements the catalog port on top of it.

mod catalog;
mod session;
mod wire;

pub use catalog::KeystoneCatalog;
pub use session::{normalize_identity_url, KeystoneSession};
