//! Entry line entity - a single debit/credit row within a journal entry.
//!
//! Lines optionally carry an asset profile (the template used to create an asset
//! when the entry is posted) and the asset that posting created from them.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Entry line database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "entry_lines")]
pub struct Model {
    /// Unique identifier for the line
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Entry this line belongs to
    pub entry_id: i64,
    /// Label of the line, also used as the name of created assets
    pub name: String,
    /// Account the amount is booked on
    pub account_id: i64,
    /// Journal (mirrors the entry)
    pub journal_id: i64,
    /// Accounting date (mirrors the entry)
    pub date: Date,
    /// Debit amount
    pub debit: f64,
    /// Credit amount
    pub credit: f64,
    /// Number of units
    pub quantity: f64,
    /// Price per unit
    pub price_unit: f64,
    /// `price_unit * quantity`
    pub price_subtotal: f64,
    /// Business partner
    pub partner_id: Option<i64>,
    /// Analytic account
    pub analytic_account_id: Option<i64>,
    /// Asset profile used to create an asset on posting
    pub asset_profile_id: Option<i64>,
    /// Asset created from this line
    pub asset_id: Option<i64>,
}

/// Defines relationships between `EntryLine` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each line belongs to one entry
    #[sea_orm(
        belongs_to = "super::journal_entry::Entity",
        from = "Column::EntryId",
        to = "super::journal_entry::Column::Id"
    )]
    Entry,
    /// Each line is booked on one account
    #[sea_orm(
        belongs_to = "super::account::Entity",
        from = "Column::AccountId",
        to = "super::account::Column::Id"
    )]
    Account,
    /// Optional asset profile
    #[sea_orm(
        belongs_to = "super::asset_profile::Entity",
        from = "Column::AssetProfileId",
        to = "super::asset_profile::Column::Id"
    )]
    AssetProfile,
    /// Optional asset created from the line
    #[sea_orm(
        belongs_to = "super::asset::Entity",
        from = "Column::AssetId",
        to = "super::asset::Column::Id"
    )]
    Asset,
}

impl Related<super::journal_entry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Entry.def()
    }
}

impl Related<super::account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Account.def()
    }
}

impl Related<super::asset_profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AssetProfile.def()
    }
}

impl Related<super::asset::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Asset.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
