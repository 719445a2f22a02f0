//! Inventory business rules.
//!
//! This crate owns the typed records, input validation, product identifier
//! minting and the [`Inventory`] service. Persistence is reached only through
//! the [`CatalogStore`] trait; concrete stores live in `stockroom-infra`.

pub mod category;
pub mod minter;
pub mod product;
pub mod service;
pub mod store;

pub use category::{Category, NewCategory};
pub use minter::IdMinter;
pub use product::{NewProduct, ProductRecord, ProductRow, ProductUpdate};
pub use service::{Inventory, InventoryError, InventoryResult, InventorySummary};
pub use store::{CatalogStore, StoreError};
