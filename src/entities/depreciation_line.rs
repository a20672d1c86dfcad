//! Depreciation line entity - a scheduled depreciation or removal event of an asset.
//!
//! A line is "posted" once it references the journal entry it was booked through.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Kind of depreciation board event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum LineType {
    /// Periodic depreciation
    #[sea_orm(string_value = "depreciate")]
    Depreciate,
    /// Asset removal
    #[sea_orm(string_value = "remove")]
    Remove,
}

/// Depreciation line database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "depreciation_lines")]
pub struct Model {
    /// Unique identifier for the line
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Asset being depreciated
    pub asset_id: i64,
    /// Entry the line was posted through, if any
    pub entry_id: Option<i64>,
    /// Scheduled date
    pub line_date: Date,
    /// Event kind
    pub line_type: LineType,
    /// Amount depreciated or removed
    pub amount: f64,
    /// Whether `entry_id` is set
    pub move_check: bool,
}

/// Defines relationships between `DepreciationLine` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each line belongs to one asset
    #[sea_orm(
        belongs_to = "super::asset::Entity",
        from = "Column::AssetId",
        to = "super::asset::Column::Id"
    )]
    Asset,
    /// Optional posting entry
    #[sea_orm(
        belongs_to = "super::journal_entry::Entity",
        from = "Column::EntryId",
        to = "super::journal_entry::Column::Id"
    )]
    Entry,
}

impl Related<super::asset::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Asset.def()
    }
}

impl Related<super::journal_entry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Entry.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
