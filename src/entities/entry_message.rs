//! Entry message entity - audit trail messages posted on journal entries.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Entry message database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "entry_messages")]
pub struct Model {
    /// Unique identifier for the message
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Entry the message is posted on
    pub entry_id: i64,
    /// Message body, may contain record links
    pub body: String,
    /// When the message was posted
    pub created_at: DateTimeUtc,
}

/// Defines relationships between `EntryMessage` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each message belongs to one entry
    #[sea_orm(
        belongs_to = "super::journal_entry::Entity",
        from = "Column::EntryId",
        to = "super::journal_entry::Column::Id"
    )]
    Entry,
}

impl Related<super::journal_entry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Entry.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
