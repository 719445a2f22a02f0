use std::sync::Arc;

use anyhow::Context;

use stockroom_infra::{SqliteCatalogStore, StoreConfig};
use stockroom_inventory::Inventory;

/// Inventory service as wired for the HTTP shell.
pub type AppServices = Inventory<SqliteCatalogStore>;

/// Open the SQLite store and seed the inventory service from it.
pub async fn build_services(config: &StoreConfig) -> anyhow::Result<Arc<AppServices>> {
    let store = SqliteCatalogStore::connect(config)
        .await
        .with_context(|| format!("failed to open store at {}", config.database_url))?;

    let inventory = Inventory::open(store)
        .await
        .context("failed to initialize inventory")?;

    Ok(Arc::new(inventory))
}
