//! Inventory service: business rules on top of a [`CatalogStore`].
//!
//! Shells (HTTP, desktop) construct one `Inventory` around an explicitly built
//! store and share it; there is no process-wide database handle.

use stockroom_core::{DomainError, ProductId};

use crate::category::{Category, NewCategory};
use crate::minter::IdMinter;
use crate::product::{NewProduct, ProductRecord, ProductRow, ProductUpdate};
use crate::store::{CatalogStore, StoreError};

/// Attempts at inserting a freshly minted id before giving up.
pub const MAX_MINT_ATTEMPTS: usize = 3;

pub type InventoryResult<T> = Result<T, InventoryError>;

/// Inventory service error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InventoryError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<DomainError> for InventoryError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::Validation(msg) => Self::Validation(msg),
            DomainError::InvalidId(msg) => Self::Validation(format!("invalid identifier: {msg}")),
            DomainError::NotFound(what) => Self::NotFound(what),
        }
    }
}

/// Row counts for the whole inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct InventorySummary {
    pub products: u64,
    pub categories: u64,
}

impl core::fmt::Display for InventorySummary {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "Inventory with {} products and {} categories.",
            self.products, self.categories
        )
    }
}

#[derive(Debug)]
pub struct Inventory<S> {
    store: S,
    minter: IdMinter,
}

impl<S: CatalogStore> Inventory<S> {
    /// Wrap `store`, seeding the id minter from the identifiers already stored.
    pub async fn open(store: S) -> InventoryResult<Self> {
        let max = store.max_product_id().await?;
        let minter = IdMinter::seeded(max.as_ref());
        tracing::info!(
            max_product_id = max.as_ref().map(ProductId::as_str),
            last_suffix = minter.last_suffix(),
            "inventory opened"
        );
        Ok(Self { store, minter })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Hand out the next product id without inserting anything.
    pub fn mint_product_id(&self) -> InventoryResult<ProductId> {
        self.minter.next().ok_or_else(|| {
            StoreError::Conflict(format!(
                "product id space exhausted (P{} already issued)",
                ProductId::MAX_SUFFIX
            ))
            .into()
        })
    }

    /// Idempotent: an existing category with the same name is left untouched.
    #[tracing::instrument(skip(self, description))]
    pub async fn add_category(&self, name: &str, description: Option<&str>) -> InventoryResult<()> {
        let input = NewCategory::new(name, description.map(str::to_string)).normalized()?;
        let created = self
            .store
            .insert_category_if_absent(&input.name, input.description.as_deref())
            .await?;
        if created {
            tracing::info!(category = %input.name, "category created");
        }
        Ok(())
    }

    /// Add a product, creating its category on first reference.
    ///
    /// Returns the product id (the supplied one, or a freshly minted one).
    #[tracing::instrument(skip(self, input), fields(category = %input.category_name))]
    pub async fn add_product(&self, input: NewProduct) -> InventoryResult<ProductId> {
        let input = input.normalized()?;

        self.add_category(&input.category_name, input.description.as_deref())
            .await?;
        let category = self
            .store
            .find_category(&input.category_name)
            .await?
            .ok_or_else(|| InventoryError::NotFound(format!("category {}", input.category_name)))?;

        let mut row = ProductRow {
            id: ProductId::minted(0),
            name: input.name,
            price: input.price,
            quantity: input.quantity,
            category_id: category.id,
        };

        if let Some(id) = input.id {
            self.minter.observe(&id);
            row.id = id;
            self.store.insert_product(&row).await?;
            tracing::info!(product_id = %row.id, "product added");
            return Ok(row.id);
        }

        for attempt in 1..=MAX_MINT_ATTEMPTS {
            row.id = self.mint_product_id()?;
            match self.store.insert_product(&row).await {
                Ok(()) => {
                    tracing::info!(product_id = %row.id, "product added with minted id");
                    return Ok(row.id);
                }
                Err(StoreError::Conflict(msg)) => {
                    tracing::warn!(
                        product_id = %row.id,
                        attempt,
                        "minted id already taken, reseeding: {msg}"
                    );
                    let max = self.store.max_product_id().await?;
                    self.minter.reseed(max.as_ref());
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(StoreError::Conflict(format!(
            "could not mint a unique product id after {MAX_MINT_ATTEMPTS} attempts"
        ))
        .into())
    }

    /// Returns `true` if a product was removed; absent ids are not an error.
    #[tracing::instrument(skip(self))]
    pub async fn remove_product(&self, id: &ProductId) -> InventoryResult<bool> {
        let removed = self.store.delete_product(id).await?;
        if removed {
            tracing::info!(product_id = %id, "product removed");
        }
        Ok(removed)
    }

    /// Remove a category together with all of its products.
    #[tracing::instrument(skip(self))]
    pub async fn remove_category(&self, name: &str) -> InventoryResult<bool> {
        let removed = self.store.delete_category(name.trim()).await?;
        if removed {
            tracing::info!(category = %name.trim(), "category removed");
        }
        Ok(removed)
    }

    pub async fn get_product(&self, id: &ProductId) -> InventoryResult<Option<ProductRecord>> {
        Ok(self.store.find_product(id).await?)
    }

    pub async fn get_all_products(&self) -> InventoryResult<Vec<ProductRecord>> {
        Ok(self.store.list_products().await?)
    }

    /// Products of the named category; empty when the category does not exist.
    pub async fn get_products_by_category(&self, name: &str) -> InventoryResult<Vec<ProductRecord>> {
        match self.store.find_category(name.trim()).await? {
            Some(category) => Ok(self.store.list_products_in_category(category.id).await?),
            None => {
                tracing::debug!(category = %name, "no such category");
                Ok(Vec::new())
            }
        }
    }

    pub async fn get_category(&self, name: &str) -> InventoryResult<Option<Category>> {
        Ok(self.store.find_category(name.trim()).await?)
    }

    pub async fn get_all_categories(&self) -> InventoryResult<Vec<Category>> {
        Ok(self.store.list_categories().await?)
    }

    /// Update price and/or quantity; untouched fields keep their values.
    #[tracing::instrument(skip(self))]
    pub async fn update_product(&self, id: &ProductId, update: ProductUpdate) -> InventoryResult<()> {
        update.validate()?;
        if !self.store.update_product(id, &update).await? {
            return Err(InventoryError::NotFound(format!("product {id}")));
        }
        tracing::info!(product_id = %id, "product updated");
        Ok(())
    }

    pub async fn summary(&self) -> InventoryResult<InventorySummary> {
        Ok(InventorySummary {
            products: self.store.count_products().await?,
            categories: self.store.count_categories().await?,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use stockroom_core::CategoryId;

    use super::*;

    /// Vec-backed store mirroring the relational semantics the service relies on.
    #[derive(Default)]
    struct FakeStore {
        state: Mutex<FakeState>,
    }

    #[derive(Default)]
    struct FakeState {
        next_category_id: i64,
        categories: Vec<Category>,
        products: Vec<ProductRow>,
        fail_writes: bool,
    }

    impl FakeStore {
        fn seed_product(&self, raw_id: &str) {
            let mut s = self.state.lock().unwrap();
            s.products.push(ProductRow {
                id: ProductId::parse(raw_id).unwrap(),
                name: "seeded".to_string(),
                price: 1.0,
                quantity: 1,
                category_id: CategoryId::new(0),
            });
        }

        fn record(s: &FakeState, row: &ProductRow) -> ProductRecord {
            ProductRecord {
                id: row.id.clone(),
                name: row.name.clone(),
                price: row.price,
                quantity: row.quantity,
                category: s
                    .categories
                    .iter()
                    .find(|c| c.id == row.category_id)
                    .map(|c| c.name.clone()),
            }
        }
    }

    #[async_trait]
    impl CatalogStore for FakeStore {
        async fn insert_category_if_absent(
            &self,
            name: &str,
            description: Option<&str>,
        ) -> Result<bool, StoreError> {
            let mut s = self.state.lock().unwrap();
            if s.fail_writes {
                return Err(StoreError::Database("disk full".to_string()));
            }
            if s.categories.iter().any(|c| c.name == name) {
                return Ok(false);
            }
            s.next_category_id += 1;
            let id = CategoryId::new(s.next_category_id);
            s.categories.push(Category {
                id,
                name: name.to_string(),
                description: description.map(str::to_string),
            });
            Ok(true)
        }

        async fn find_category(&self, name: &str) -> Result<Option<Category>, StoreError> {
            let s = self.state.lock().unwrap();
            Ok(s.categories.iter().find(|c| c.name == name).cloned())
        }

        async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
            Ok(self.state.lock().unwrap().categories.clone())
        }

        async fn delete_category(&self, name: &str) -> Result<bool, StoreError> {
            let mut s = self.state.lock().unwrap();
            let Some(pos) = s.categories.iter().position(|c| c.name == name) else {
                return Ok(false);
            };
            let removed = s.categories.remove(pos);
            s.products.retain(|p| p.category_id != removed.id);
            Ok(true)
        }

        async fn insert_product(&self, row: &ProductRow) -> Result<(), StoreError> {
            let mut s = self.state.lock().unwrap();
            if s.products.iter().any(|p| p.id == row.id) {
                return Err(StoreError::Conflict(format!("product {} exists", row.id)));
            }
            s.products.push(row.clone());
            Ok(())
        }

        async fn find_product(&self, id: &ProductId) -> Result<Option<ProductRecord>, StoreError> {
            let s = self.state.lock().unwrap();
            Ok(s.products
                .iter()
                .find(|p| &p.id == id)
                .map(|p| Self::record(&s, p)))
        }

        async fn list_products(&self) -> Result<Vec<ProductRecord>, StoreError> {
            let s = self.state.lock().unwrap();
            Ok(s.products.iter().map(|p| Self::record(&s, p)).collect())
        }

        async fn list_products_in_category(
            &self,
            category_id: CategoryId,
        ) -> Result<Vec<ProductRecord>, StoreError> {
            let s = self.state.lock().unwrap();
            Ok(s.products
                .iter()
                .filter(|p| p.category_id == category_id)
                .map(|p| Self::record(&s, p))
                .collect())
        }

        async fn update_product(
            &self,
            id: &ProductId,
            update: &ProductUpdate,
        ) -> Result<bool, StoreError> {
            let mut s = self.state.lock().unwrap();
            let Some(p) = s.products.iter_mut().find(|p| &p.id == id) else {
                return Ok(false);
            };
            if let Some(price) = update.price {
                p.price = price;
            }
            if let Some(quantity) = update.quantity {
                p.quantity = quantity;
            }
            Ok(true)
        }

        async fn delete_product(&self, id: &ProductId) -> Result<bool, StoreError> {
            let mut s = self.state.lock().unwrap();
            let before = s.products.len();
            s.products.retain(|p| &p.id != id);
            Ok(s.products.len() != before)
        }

        async fn max_product_id(&self) -> Result<Option<ProductId>, StoreError> {
            let s = self.state.lock().unwrap();
            Ok(s.products
                .iter()
                .filter(|p| p.id.suffix().is_some())
                .max_by_key(|p| p.id.suffix())
                .map(|p| p.id.clone()))
        }

        async fn count_products(&self) -> Result<u64, StoreError> {
            Ok(self.state.lock().unwrap().products.len() as u64)
        }

        async fn count_categories(&self) -> Result<u64, StoreError> {
            Ok(self.state.lock().unwrap().categories.len() as u64)
        }
    }

    async fn open() -> Inventory<FakeStore> {
        Inventory::open(FakeStore::default()).await.unwrap()
    }

    fn laptop() -> NewProduct {
        NewProduct::new("Laptop", 1500.0, 10, "Electronics").with_description("Gadgets")
    }

    #[tokio::test]
    async fn minted_ids_follow_the_baseline() {
        let inv = open().await;
        inv.add_category("Electronics", Some("Gadgets")).await.unwrap();

        let first = inv.add_product(laptop()).await.unwrap();
        let second = inv
            .add_product(NewProduct::new("Phone", 800.0, 25, "Electronics"))
            .await
            .unwrap();

        assert_eq!(first.as_str(), "P100001");
        assert_eq!(second.as_str(), "P100002");
    }

    #[tokio::test]
    async fn open_seeds_from_existing_products() {
        let store = FakeStore::default();
        store.seed_product("P100007");
        store.seed_product("PXYZ");
        let inv = Inventory::open(store).await.unwrap();

        assert_eq!(inv.mint_product_id().unwrap().as_str(), "P100008");
    }

    #[tokio::test]
    async fn unknown_category_is_created_on_first_reference() {
        let inv = open().await;
        inv.add_product(laptop()).await.unwrap();

        let cat = inv.get_category("Electronics").await.unwrap().unwrap();
        assert_eq!(cat.description.as_deref(), Some("Gadgets"));
    }

    #[tokio::test]
    async fn adding_existing_category_keeps_original_description() {
        let inv = open().await;
        inv.add_category("Books", Some("Educational")).await.unwrap();
        inv.add_category("Books", Some("Other")).await.unwrap();

        let all = inv.get_all_categories().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].description.as_deref(), Some("Educational"));
    }

    #[tokio::test]
    async fn blank_category_name_is_a_validation_error() {
        let inv = open().await;
        let err = inv.add_category("  ", None).await.unwrap_err();
        assert!(matches!(err, InventoryError::Validation(_)));
    }

    #[tokio::test]
    async fn explicit_id_is_kept_and_advances_the_minter() {
        let inv = open().await;
        let id = ProductId::parse("P300000").unwrap();
        let got = inv.add_product(laptop().with_id(id.clone())).await.unwrap();
        assert_eq!(got, id);

        let next = inv.add_product(laptop()).await.unwrap();
        assert_eq!(next.as_str(), "P300001");
    }

    #[tokio::test]
    async fn oversized_explicit_id_leaves_minting_alone() {
        let inv = open().await;
        let huge = ProductId::parse("P18446744073709551615").unwrap();
        inv.add_product(laptop().with_id(huge)).await.unwrap();

        let next = inv.add_product(laptop()).await.unwrap();
        assert_eq!(next.as_str(), "P100001");
    }

    #[tokio::test]
    async fn exhausted_id_space_is_a_conflict_not_a_panic() {
        let inv = open().await;
        let last = ProductId::minted(ProductId::MAX_SUFFIX);
        inv.add_product(laptop().with_id(last)).await.unwrap();

        let err = inv.add_product(laptop()).await.unwrap_err();
        assert!(matches!(err, InventoryError::Store(StoreError::Conflict(_))));
        assert!(inv.mint_product_id().is_err());
    }

    #[tokio::test]
    async fn duplicate_explicit_id_is_a_store_conflict() {
        let inv = open().await;
        let id = ProductId::parse("P001").unwrap();
        inv.add_product(laptop().with_id(id.clone())).await.unwrap();

        let err = inv.add_product(laptop().with_id(id)).await.unwrap_err();
        assert!(matches!(err, InventoryError::Store(StoreError::Conflict(_))));
    }

    #[tokio::test]
    async fn minting_retries_after_foreign_writer() {
        let inv = open().await;
        // Another writer inserted ids the minter has not seen.
        inv.store().seed_product("P100001");
        inv.store().seed_product("P100002");

        let id = inv.add_product(laptop()).await.unwrap();
        assert_eq!(id.as_str(), "P100003");
    }

    #[tokio::test]
    async fn update_rules() {
        let inv = open().await;
        let id = inv.add_product(laptop()).await.unwrap();

        let err = inv.update_product(&id, ProductUpdate::default()).await.unwrap_err();
        assert!(matches!(err, InventoryError::Validation(_)));

        inv.update_product(&id, ProductUpdate::quantity(3)).await.unwrap();
        let p = inv.get_product(&id).await.unwrap().unwrap();
        assert_eq!(p.quantity, 3);
        assert_eq!(p.price, 1500.0);

        let missing = ProductId::parse("P999999").unwrap();
        let err = inv
            .update_product(&missing, ProductUpdate::price(1.0))
            .await
            .unwrap_err();
        assert!(matches!(err, InventoryError::NotFound(_)));
    }

    #[tokio::test]
    async fn removing_category_cascades_to_products() {
        let inv = open().await;
        inv.add_product(laptop()).await.unwrap();
        inv.add_product(NewProduct::new("Blender", 50.0, 20, "Kitchen")).await.unwrap();

        assert!(inv.remove_category("Electronics").await.unwrap());
        assert!(!inv.remove_category("Electronics").await.unwrap());

        let rest = inv.get_all_products().await.unwrap();
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].name, "Blender");
        assert!(inv.get_products_by_category("Electronics").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn store_failures_propagate() {
        let inv = open().await;
        inv.store().state.lock().unwrap().fail_writes = true;

        let err = inv.add_product(laptop()).await.unwrap_err();
        assert!(matches!(err, InventoryError::Store(StoreError::Database(_))));
    }

    #[tokio::test]
    async fn summary_counts_rows() {
        let inv = open().await;
        inv.add_product(laptop()).await.unwrap();
        inv.add_category("Books", None).await.unwrap();

        let summary = inv.summary().await.unwrap();
        assert_eq!(summary, InventorySummary { products: 1, categories: 2 });
        assert_eq!(summary.to_string(), "Inventory with 1 products and 2 categories.");
    }
}
