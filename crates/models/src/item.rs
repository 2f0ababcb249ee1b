use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// The single managed resource: id is store-assigned and immutable, `name` and
/// `description` are mutable via update, `processed` only via toggle.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "item")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    #[sea_orm(nullable)]
    pub description: Option<String>,
    pub processed: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
