//! Infrastructure layer: SQLite persistence and store configuration.

pub mod config;
pub mod db;


pub use config::StoreConfig;
pub use db::SqliteCatalogStore;
