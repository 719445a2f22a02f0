//! SQLite-backed catalog store.
//!
//! Every operation acquires a pooled connection, runs one auto-committed
//! statement and returns the connection. Foreign keys are switched on for each
//! connection so deleting a category cascades to its products.

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};

use stockroom_core::{CategoryId, ProductId};
use stockroom_inventory::{
    CatalogStore, Category, ProductRecord, ProductRow, ProductUpdate, StoreError,
};

use super::schema;
use crate::config::StoreConfig;

const PRODUCT_PROJECTION: &str = r#"
    SELECT p.id, p.name, p.price, p.quantity, c.name AS category
    FROM products p
    LEFT JOIN categories c ON p.category_id = c.id
"#;

/// Catalog store over an sqlx SQLite pool.
#[derive(Debug, Clone)]
pub struct SqliteCatalogStore {
    pool: SqlitePool,
}

impl SqliteCatalogStore {
    /// Open (creating if missing) the database described by `config` and
    /// make sure the schema exists.
    pub async fn connect(config: &StoreConfig) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(&config.database_url)
            .map_err(|e| StoreError::Database(format!("invalid database url: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(config.busy_timeout);

        let mut pool_options = SqlitePoolOptions::new()
            .max_connections(config.max_connections.max(1))
            .acquire_timeout(config.acquire_timeout);
        if config.is_in_memory() {
            // An in-memory database lives and dies with its connection.
            pool_options = pool_options
                .max_connections(1)
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>);
        }

        let pool = pool_options.connect_with(options).await.map_err(|e| {
            StoreError::Database(format!(
                "failed to open SQLite database at {}: {e}",
                config.database_url
            ))
        })?;

        Self::from_pool(pool).await
    }

    /// Wrap an existing pool, creating the schema if needed.
    pub async fn from_pool(pool: SqlitePool) -> Result<Self, StoreError> {
        schema::ensure_schema(&pool).await.map_err(store_error)?;
        tracing::debug!("catalog schema ready");
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn store_error(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            return StoreError::Conflict(db.message().to_string());
        }
    }
    StoreError::Database(err.to_string())
}

fn category_from_row(row: &SqliteRow) -> Result<Category, sqlx::Error> {
    Ok(Category {
        id: CategoryId::new(row.try_get("id")?),
        name: row.try_get("name")?,
        description: row.try_get("description")?,
    })
}

fn product_from_row(row: &SqliteRow) -> Result<ProductRecord, StoreError> {
    let raw_id: String = row.try_get("id").map_err(store_error)?;
    let id = ProductId::parse(&raw_id)
        .map_err(|e| StoreError::Database(format!("stored product id {raw_id:?}: {e}")))?;

    Ok(ProductRecord {
        id,
        name: row.try_get("name").map_err(store_error)?,
        price: row.try_get("price").map_err(store_error)?,
        quantity: row.try_get("quantity").map_err(store_error)?,
        category: row.try_get("category").map_err(store_error)?,
    })
}

#[async_trait]
impl CatalogStore for SqliteCatalogStore {
    async fn insert_category_if_absent(
        &self,
        name: &str,
        description: Option<&str>,
    ) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT OR IGNORE INTO categories (name, description)
            VALUES (?1, ?2)
            "#,
        )
        .bind(name)
        .bind(description)
        .execute(&self.pool)
        .await
        .map_err(store_error)?;

        Ok(result.rows_affected() == 1)
    }

    async fn find_category(&self, name: &str) -> Result<Option<Category>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, name, description
            FROM categories
            WHERE name = ?1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?;

        row.as_ref()
            .map(category_from_row)
            .transpose()
            .map_err(store_error)
    }

    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        let rows = sqlx::query("SELECT id, name, description FROM categories ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(store_error)?;

        rows.iter()
            .map(category_from_row)
            .collect::<Result<_, _>>()
            .map_err(store_error)
    }

    async fn delete_category(&self, name: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM categories WHERE name = ?1")
            .bind(name)
            .execute(&self.pool)
            .await
            .map_err(store_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn insert_product(&self, row: &ProductRow) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO products (id, name, price, quantity, category_id)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(row.id.as_str())
        .bind(&row.name)
        .bind(row.price)
        .bind(row.quantity)
        .bind(row.category_id.get())
        .execute(&self.pool)
        .await
        .map_err(store_error)?;

        Ok(())
    }

    async fn find_product(&self, id: &ProductId) -> Result<Option<ProductRecord>, StoreError> {
        let row = sqlx::query(&format!("{PRODUCT_PROJECTION} WHERE p.id = ?1"))
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(store_error)?;

        row.as_ref().map(product_from_row).transpose()
    }

    async fn list_products(&self) -> Result<Vec<ProductRecord>, StoreError> {
        let rows = sqlx::query(&format!("{PRODUCT_PROJECTION} ORDER BY p.rowid"))
            .fetch_all(&self.pool)
            .await
            .map_err(store_error)?;

        rows.iter().map(product_from_row).collect()
    }

    async fn list_products_in_category(
        &self,
        category_id: CategoryId,
    ) -> Result<Vec<ProductRecord>, StoreError> {
        let rows = sqlx::query(&format!(
            "{PRODUCT_PROJECTION} WHERE p.category_id = ?1 ORDER BY p.rowid"
        ))
        .bind(category_id.get())
        .fetch_all(&self.pool)
        .await
        .map_err(store_error)?;

        rows.iter().map(product_from_row).collect()
    }

    async fn update_product(
        &self,
        id: &ProductId,
        update: &ProductUpdate,
    ) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE products
            SET price = COALESCE(?1, price),
                quantity = COALESCE(?2, quantity)
            WHERE id = ?3
            "#,
        )
        .bind(update.price)
        .bind(update.quantity)
        .bind(id.as_str())
        .execute(&self.pool)
        .await
        .map_err(store_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_product(&self, id: &ProductId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .map_err(store_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn max_product_id(&self) -> Result<Option<ProductId>, StoreError> {
        // Only `P` followed by up to 18 digits takes part; ordering is numeric, not lexical.
        let row = sqlx::query(
            r#"
            SELECT id
            FROM products
            WHERE id GLOB 'P[0-9]*'
              AND SUBSTR(id, 2) NOT GLOB '*[^0-9]*'
              AND LENGTH(id) <= ?1
            ORDER BY CAST(SUBSTR(id, 2) AS INTEGER) DESC
            LIMIT 1
            "#,
        )
        .bind((ProductId::MAX_SUFFIX_DIGITS + 1) as i64)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?;

        let Some(row) = row else {
            return Ok(None);
        };
        let raw: String = row.try_get("id").map_err(store_error)?;
        Ok(ProductId::parse(&raw).ok())
    }

    async fn count_products(&self) -> Result<u64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await
            .map_err(store_error)?;
        Ok(count as u64)
    }

    async fn count_categories(&self) -> Result<u64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categories")
            .fetch_one(&self.pool)
            .await
            .map_err(store_error)?;
        Ok(count as u64)
    }
}
