//! Table definitions, applied idempotently on startup.

use sqlx::SqlitePool;

const CREATE_CATEGORIES: &str = r#"
    CREATE TABLE IF NOT EXISTS categories (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        name        TEXT UNIQUE NOT NULL,
        description TEXT
    )
"#;

const CREATE_PRODUCTS: &str = r#"
    CREATE TABLE IF NOT EXISTS products (
        id          TEXT PRIMARY KEY,
        name        TEXT NOT NULL,
        price       REAL NOT NULL,
        quantity    INTEGER NOT NULL,
        category_id INTEGER,
        FOREIGN KEY (category_id) REFERENCES categories (id) ON DELETE CASCADE
    )
"#;

const CREATE_PRODUCTS_CATEGORY_INDEX: &str = r#"
    CREATE INDEX IF NOT EXISTS idx_products_category_id ON products (category_id)
"#;

/// Create the catalog tables if they do not exist yet.
pub async fn ensure_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for statement in [
        CREATE_CATEGORIES,
        CREATE_PRODUCTS,
        CREATE_PRODUCTS_CATEGORY_INDEX,
    ] {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}
