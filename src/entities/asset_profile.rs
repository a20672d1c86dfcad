//! Asset profile entity - template for assets created from entry lines.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Asset profile database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "asset_profiles")]
pub struct Model {
    /// Unique identifier for the profile
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Profile name (e.g., "Computer hardware")
    #[sea_orm(unique)]
    pub name: String,
    /// Depreciation method: `"linear"` or `"degressive"`
    pub method: String,
    /// Number of depreciation periods
    pub method_number: i32,
    /// Length of one period in months
    pub method_period: i32,
    /// Create one asset per unit instead of one per line
    pub asset_product_item: bool,
}

/// Defines relationships between `AssetProfile` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One profile has many assets
    #[sea_orm(has_many = "super::asset::Entity")]
    Assets,
}

impl Related<super::asset::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assets.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
