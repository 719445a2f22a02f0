//! Persistence port for the inventory service.

use async_trait::async_trait;

use stockroom_core::{CategoryId, ProductId};

use crate::category::Category;
use crate::product::{ProductRecord, ProductRow, ProductUpdate};

/// Store error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write.
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("storage error: {0}")]
    Database(String),
}

/// Catalog storage abstraction.
///
/// Every method is a single statement against the backing store; callers get
/// `Option`/`bool` for "absent" and reserve `Err` for store failures.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Insert a category unless one with the same name exists.
    /// Returns `true` if a row was created.
    async fn insert_category_if_absent(
        &self,
        name: &str,
        description: Option<&str>,
    ) -> Result<bool, StoreError>;

    async fn find_category(&self, name: &str) -> Result<Option<Category>, StoreError>;

    /// All categories ordered by id.
    async fn list_categories(&self) -> Result<Vec<Category>, StoreError>;

    /// Delete a category (its products go with it). Returns `true` if a row was removed.
    async fn delete_category(&self, name: &str) -> Result<bool, StoreError>;

    /// Insert a product row. A duplicate id yields [`StoreError::Conflict`].
    async fn insert_product(&self, row: &ProductRow) -> Result<(), StoreError>;

    async fn find_product(&self, id: &ProductId) -> Result<Option<ProductRecord>, StoreError>;

    /// All products in insertion order.
    async fn list_products(&self) -> Result<Vec<ProductRecord>, StoreError>;

    async fn list_products_in_category(
        &self,
        category_id: CategoryId,
    ) -> Result<Vec<ProductRecord>, StoreError>;

    /// Apply the present fields of `update`. Returns `false` if no such product exists.
    async fn update_product(
        &self,
        id: &ProductId,
        update: &ProductUpdate,
    ) -> Result<bool, StoreError>;

    async fn delete_product(&self, id: &ProductId) -> Result<bool, StoreError>;

    /// Highest stored `P<digits>` identifier by numeric suffix.
    async fn max_product_id(&self) -> Result<Option<ProductId>, StoreError>;

    async fn count_products(&self) -> Result<u64, StoreError>;

    async fn count_categories(&self) -> Result<u64, StoreError>;
}
