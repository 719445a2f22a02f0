//! Database adapters: SQLite pool, schema bootstrap and the catalog store.

pub mod schema;
pub mod sqlite;

pub use sqlite::SqliteCatalogStore;
