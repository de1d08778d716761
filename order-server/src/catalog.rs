//! Menu catalog
//!
//! Menu CRUD lives outside this service; the order engine only needs
//! `get_item(tenant_id, item_id)` to re-price lines. [`InMemoryCatalog`]
//! backs the server with a seed-loaded menu.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use shared::models::MenuItem;

/// Menu lookup used for server-side pricing
pub trait MenuCatalog: Send + Sync + std::fmt::Debug {
    /// Current state of an item of `tenant_id`
    fn get_item(&self, tenant_id: &str, item_id: &str) -> Option<MenuItem>;

    /// Items of a tenant, in display order
    fn list_items(&self, tenant_id: &str) -> Vec<MenuItem>;
}

/// In-memory catalog keyed by `(tenant_id, item_id)`
#[derive(Clone, Default)]
pub struct InMemoryCatalog {
    items: Arc<RwLock<HashMap<(String, String), MenuItem>>>,
}

impl std::fmt::Debug for InMemoryCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryCatalog")
            .field("items", &self.items.read().len())
            .finish()
    }
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an item
    pub fn upsert(&self, item: MenuItem) {
        self.items
            .write()
            .insert((item.tenant_id.clone(), item.id.clone()), item);
    }

    /// Flip availability; returns false when the item does not exist
    pub fn set_available(&self, tenant_id: &str, item_id: &str, available: bool) -> bool {
        let mut items = self.items.write();
        match items.get_mut(&(tenant_id.to_string(), item_id.to_string())) {
            Some(item) => {
                item.available = available;
                true
            }
            None => false,
        }
    }
}

impl MenuCatalog for InMemoryCatalog {
    fn get_item(&self, tenant_id: &str, item_id: &str) -> Option<MenuItem> {
        self.items
            .read()
            .get(&(tenant_id.to_string(), item_id.to_string()))
            .cloned()
    }

    fn list_items(&self, tenant_id: &str) -> Vec<MenuItem> {
        let mut items: Vec<MenuItem> = self
            .items
            .read()
            .values()
            .filter(|i| i.tenant_id == tenant_id)
            .cloned()
            .collect();
        items.sort_by(|a, b| a.name.cmp(&b.name));
        items
    }
}
