mod error;
mod models;
mod schema;
mod store;
mod trait_def;
pub mod validation;

pub use error::{StoreError, StoreResult};
pub use models::*;
pub use schema::CATALOG_VERSIONED_SCHEMAS;
pub use store::SqliteCatalogStore;
pub use trait_def::CatalogStore;
