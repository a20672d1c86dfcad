//! Account entity - chart of accounts entries.
//!
//! Fixed-asset accounts can name a default asset profile that is proposed
//! whenever a line is booked on them.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Account database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    /// Unique identifier for the account
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Account code (e.g., "2400")
    #[sea_orm(unique)]
    pub code: String,
    /// Account name
    pub name: String,
    /// Default asset profile for lines booked on this account
    pub asset_profile_id: Option<i64>,
}

/// Defines relationships between Account and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Optional default asset profile
    #[sea_orm(
        belongs_to = "super::asset_profile::Entity",
        from = "Column::AssetProfileId",
        to = "super::asset_profile::Column::Id"
    )]
    AssetProfile,
}

impl Related<super::asset_profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AssetProfile.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
