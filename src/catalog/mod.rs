//! Index catalog subsystem
//!
//! Describes which composite indexes physically exist for a collection.
//! Catalogs are loaded once (built in, or from an index-definition file)
//! and shared read-only for the life of the process.

mod catalog;
mod descriptor;
mod errors;

pub use catalog::IndexCatalog;
pub use descriptor::IndexDescriptor;
pub use errors::{CatalogError, CatalogResult};
