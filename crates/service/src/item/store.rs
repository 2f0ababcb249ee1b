use async_trait::async_trait;
use models::item::{self, Entity as ItemEntity};
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};

use crate::errors::ServiceError;

/// Storage contract for item records, chosen at startup via configuration.
///
/// `update` and `toggle_processed` are read-modify-write operations and must
/// execute atomically with respect to the single record they touch: two
/// concurrent writers to the same id may race (last write wins) but neither
/// write may be silently lost mid-sequence. The memory backend holds its write
/// lock across the whole operation; the SQL backend takes a row lock inside a
/// transaction.
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// All live items in creation order.
    async fn find_all(&self) -> Result<Vec<item::Model>, ServiceError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<item::Model>, ServiceError>;
    /// Case-insensitive substring match on `name`; an empty fragment matches all.
    async fn find_by_name_containing(&self, fragment: &str) -> Result<Vec<item::Model>, ServiceError>;
    async fn exists_by_id(&self, id: i64) -> Result<bool, ServiceError>;
    async fn count(&self) -> Result<u64, ServiceError>;
    /// Assigns a fresh id and inserts with `processed = false`.
    async fn insert(&self, name: &str, description: Option<&str>) -> Result<item::Model, ServiceError>;
    /// Overwrites `name` and `description`, leaving `id` and `processed`
    /// untouched. `None` when the id is absent.
    async fn update(&self, id: i64, name: &str, description: Option<&str>) -> Result<Option<item::Model>, ServiceError>;
    /// Flips the `processed` flag. `None` when the id is absent.
    async fn toggle_processed(&self, id: i64) -> Result<Option<item::Model>, ServiceError>;
    /// `false` when the id is absent, `true` after removal.
    async fn delete(&self, id: i64) -> Result<bool, ServiceError>;
}

/// SeaORM-backed store implementation (Postgres).
pub struct SeaOrmItemStore {
    db: DatabaseConnection,
}

impl SeaOrmItemStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// `%fragment%` with LIKE wildcards escaped, lowercased for the lower() match.
fn like_pattern(fragment: &str) -> String {
    let escaped = fragment.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_");
    format!("%{}%", escaped.to_lowercase())
}

#[async_trait]
impl ItemStore for SeaOrmItemStore {
    async fn find_all(&self) -> Result<Vec<item::Model>, ServiceError> {
        ItemEntity::find()
            .order_by_asc(item::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<item::Model>, ServiceError> {
        ItemEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn find_by_name_containing(&self, fragment: &str) -> Result<Vec<item::Model>, ServiceError> {
        ItemEntity::find()
            .filter(Expr::expr(Func::lower(Expr::col(item::Column::Name))).like(like_pattern(fragment)))
            .order_by_asc(item::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn exists_by_id(&self, id: i64) -> Result<bool, ServiceError> {
        Ok(self.find_by_id(id).await?.is_some())
    }

    async fn count(&self) -> Result<u64, ServiceError> {
        ItemEntity::find()
            .count(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn insert(&self, name: &str, description: Option<&str>) -> Result<item::Model, ServiceError> {
        let am = item::ActiveModel {
            name: Set(name.to_string()),
            description: Set(description.map(str::to_string)),
            processed: Set(false),
            ..Default::default()
        };
        am.insert(&self.db).await.map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn update(&self, id: i64, name: &str, description: Option<&str>) -> Result<Option<item::Model>, ServiceError> {
        let txn = self.db.begin().await.map_err(|e| ServiceError::Db(e.to_string()))?;
        let found = ItemEntity::find_by_id(id)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?;
        let Some(existing) = found else {
            txn.rollback().await.map_err(|e| ServiceError::Db(e.to_string()))?;
            return Ok(None);
        };
        let mut am: item::ActiveModel = existing.into();
        am.name = Set(name.to_string());
        am.description = Set(description.map(str::to_string));
        let updated = am.update(&txn).await.map_err(|e| ServiceError::Db(e.to_string()))?;
        txn.commit().await.map_err(|e| ServiceError::Db(e.to_string()))?;
        Ok(Some(updated))
    }

    async fn toggle_processed(&self, id: i64) -> Result<Option<item::Model>, ServiceError> {
        let txn = self.db.begin().await.map_err(|e| ServiceError::Db(e.to_string()))?;
        let found = ItemEntity::find_by_id(id)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?;
        let Some(existing) = found else {
            txn.rollback().await.map_err(|e| ServiceError::Db(e.to_string()))?;
            return Ok(None);
        };
        let flipped = !existing.processed;
        let mut am: item::ActiveModel = existing.into();
        am.processed = Set(flipped);
        let updated = am.update(&txn).await.map_err(|e| ServiceError::Db(e.to_string()))?;
        txn.commit().await.map_err(|e| ServiceError::Db(e.to_string()))?;
        Ok(Some(updated))
    }

    async fn delete(&self, id: i64) -> Result<bool, ServiceError> {
        let res = ItemEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?;
        Ok(res.rows_affected > 0)
    }
}
