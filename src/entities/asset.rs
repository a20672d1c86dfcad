//! Asset entity - a depreciable item created from a posted entry line.
//!
//! Value fields (`depreciation_base`, `value_depreciated`, `value_residual`) are
//! stored and refreshed by `core::asset::recompute_asset_values`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Asset database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "assets")]
pub struct Model {
    /// Unique identifier for the asset
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Asset name, taken from the originating line
    pub name: String,
    /// Asset code, taken from the originating entry's name
    pub code: Option<String>,
    /// Profile the asset was created from
    pub profile_id: i64,
    /// Purchase value
    pub purchase_value: f64,
    /// Value left at the end of the depreciation
    pub salvage_value: f64,
    /// `purchase_value - salvage_value`
    pub depreciation_base: f64,
    /// Sum of posted depreciations
    pub value_depreciated: f64,
    /// `depreciation_base - value_depreciated`
    pub value_residual: f64,
    /// Supplier
    pub partner_id: Option<i64>,
    /// Start of the depreciation
    pub date_start: Date,
    /// Analytic account
    pub account_analytic_id: Option<i64>,
    /// Owning company
    pub company_id: Option<i64>,
}

/// Defines relationships between Asset and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each asset belongs to one profile
    #[sea_orm(
        belongs_to = "super::asset_profile::Entity",
        from = "Column::ProfileId",
        to = "super::asset_profile::Column::Id"
    )]
    Profile,
    /// One asset has many depreciation lines
    #[sea_orm(has_many = "super::depreciation_line::Entity")]
    DepreciationLines,
}

impl Related<super::asset_profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Profile.def()
    }
}

impl Related<super::depreciation_line::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DepreciationLines.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
