use std::sync::Arc;

use models::item;
use tracing::{info, instrument};

use crate::errors::ServiceError;
use crate::item::store::ItemStore;

/// Resource operations for items on top of an [`ItemStore`].
///
/// Absent ids come back as `None` (or `false` from delete), never as errors;
/// the HTTP layer turns those into 404s. Create and update perform no field
/// validation, matching the original contract: an empty name is accepted.
pub struct ItemService {
    store: Arc<dyn ItemStore>,
}

impl ItemService {
    pub fn new(store: Arc<dyn ItemStore>) -> Self {
        Self { store }
    }

    pub async fn get_all_items(&self) -> Result<Vec<item::Model>, ServiceError> {
        self.store.find_all().await
    }

    pub async fn get_item_by_id(&self, id: i64) -> Result<Option<item::Model>, ServiceError> {
        self.store.find_by_id(id).await
    }

    pub async fn search_items_by_name(&self, fragment: &str) -> Result<Vec<item::Model>, ServiceError> {
        self.store.find_by_name_containing(fragment).await
    }

    #[instrument(skip(self, description))]
    pub async fn create_item(&self, name: &str, description: Option<&str>) -> Result<item::Model, ServiceError> {
        let created = self.store.insert(name, description).await?;
        info!(id = created.id, "created item");
        Ok(created)
    }

    #[instrument(skip(self, description))]
    pub async fn update_item(&self, id: i64, name: &str, description: Option<&str>) -> Result<Option<item::Model>, ServiceError> {
        let updated = self.store.update(id, name, description).await?;
        if updated.is_some() {
            info!(id, "updated item");
        }
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete_item(&self, id: i64) -> Result<bool, ServiceError> {
        let deleted = self.store.delete(id).await?;
        if deleted {
            info!(id, "deleted item");
        }
        Ok(deleted)
    }

    pub async fn exists_by_id(&self, id: i64) -> Result<bool, ServiceError> {
        self.store.exists_by_id(id).await
    }

    pub async fn count_items(&self) -> Result<u64, ServiceError> {
        self.store.count().await
    }

    #[instrument(skip(self))]
    pub async fn toggle_processed(&self, id: i64) -> Result<Option<item::Model>, ServiceError> {
        let toggled = self.store.toggle_processed(id).await?;
        if let Some(m) = &toggled {
            info!(id, processed = m.processed, "toggled item");
        }
        Ok(toggled)
    }
}
