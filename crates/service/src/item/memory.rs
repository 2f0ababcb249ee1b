use std::collections::BTreeMap;

use async_trait::async_trait;
use models::item;
use tokio::sync::RwLock;

use crate::errors::ServiceError;
use crate::item::store::ItemStore;

struct Inner {
    // Keyed by id; ids are assigned monotonically so iteration order is
    // creation order.
    items: BTreeMap<i64, item::Model>,
    next_id: i64,
}

/// In-memory store. The id counter lives under the same lock as the map, so
/// every operation, including the read-modify-write ones, runs under a single
/// lock acquisition.
pub struct MemoryItemStore {
    inner: RwLock<Inner>,
}

impl MemoryItemStore {
    pub fn new() -> Self {
        Self { inner: RwLock::new(Inner { items: BTreeMap::new(), next_id: 1 }) }
    }
}

impl Default for MemoryItemStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ItemStore for MemoryItemStore {
    async fn find_all(&self) -> Result<Vec<item::Model>, ServiceError> {
        let inner = self.inner.read().await;
        Ok(inner.items.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<item::Model>, ServiceError> {
        let inner = self.inner.read().await;
        Ok(inner.items.get(&id).cloned())
    }

    async fn find_by_name_containing(&self, fragment: &str) -> Result<Vec<item::Model>, ServiceError> {
        let needle = fragment.to_lowercase();
        let inner = self.inner.read().await;
        Ok(inner
            .items
            .values()
            .filter(|m| m.name.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn exists_by_id(&self, id: i64) -> Result<bool, ServiceError> {
        let inner = self.inner.read().await;
        Ok(inner.items.contains_key(&id))
    }

    async fn count(&self) -> Result<u64, ServiceError> {
        let inner = self.inner.read().await;
        Ok(inner.items.len() as u64)
    }

    async fn insert(&self, name: &str, description: Option<&str>) -> Result<item::Model, ServiceError> {
        let mut inner = self.inner.write().await;
        let id = inner.next_id;
        inner.next_id += 1;
        let model = item::Model {
            id,
            name: name.to_string(),
            description: description.map(str::to_string),
            processed: false,
        };
        inner.items.insert(id, model.clone());
        Ok(model)
    }

    async fn update(&self, id: i64, name: &str, description: Option<&str>) -> Result<Option<item::Model>, ServiceError> {
        let mut inner = self.inner.write().await;
        Ok(inner.items.get_mut(&id).map(|m| {
            m.name = name.to_string();
            m.description = description.map(str::to_string);
            m.clone()
        }))
    }

    async fn toggle_processed(&self, id: i64) -> Result<Option<item::Model>, ServiceError> {
        let mut inner = self.inner.write().await;
        Ok(inner.items.get_mut(&id).map(|m| {
            m.processed = !m.processed;
            m.clone()
        }))
    }

    async fn delete(&self, id: i64) -> Result<bool, ServiceError> {
        let mut inner = self.inner.write().await;
        Ok(inner.items.remove(&id).is_some())
    }
}
