//! Journal entry entity - the header grouping entry lines that are posted together.
//!
//! Entries carry a document type (`move_type`) that decides whether the asset
//! rules apply: customer invoices and refunds are sale documents and are exempt.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Accounting document classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum MoveType {
    /// Miscellaneous journal entry
    #[sea_orm(string_value = "entry")]
    Entry,
    /// Customer invoice
    #[sea_orm(string_value = "out_invoice")]
    OutInvoice,
    /// Customer credit note
    #[sea_orm(string_value = "out_refund")]
    OutRefund,
    /// Vendor bill
    #[sea_orm(string_value = "in_invoice")]
    InInvoice,
    /// Vendor credit note
    #[sea_orm(string_value = "in_refund")]
    InRefund,
    /// Sales receipt
    #[sea_orm(string_value = "out_receipt")]
    OutReceipt,
    /// Purchase receipt
    #[sea_orm(string_value = "in_receipt")]
    InReceipt,
}

impl MoveType {
    /// Customer invoices and refunds are sale documents.
    #[must_use]
    pub const fn is_sale_document(self) -> bool {
        matches!(self, Self::OutInvoice | Self::OutRefund)
    }

    /// Document type of the entry that reverses this one.
    #[must_use]
    pub const fn reversed(self) -> Self {
        match self {
            Self::OutInvoice => Self::OutRefund,
            Self::OutRefund => Self::OutInvoice,
            Self::InInvoice => Self::InRefund,
            Self::InRefund => Self::InInvoice,
            other => other,
        }
    }
}

/// Posting state of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum EntryState {
    /// Editable, not yet in the books
    #[sea_orm(string_value = "draft")]
    Draft,
    /// Posted to the books
    #[sea_orm(string_value = "posted")]
    Posted,
    /// Cancelled
    #[sea_orm(string_value = "cancel")]
    Cancel,
}

impl std::fmt::Display for EntryState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Draft => "draft",
            Self::Posted => "posted",
            Self::Cancel => "cancel",
        })
    }
}

/// Journal entry database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "journal_entries")]
pub struct Model {
    /// Unique identifier for the entry
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Document number (e.g., "BILL/2026/0001"), used as the code of created assets
    pub name: String,
    /// Free-form reference
    pub reference: Option<String>,
    /// Journal the entry is recorded in
    pub journal_id: i64,
    /// Accounting date
    pub date: Date,
    /// Document type
    pub move_type: MoveType,
    /// Posting state
    pub state: EntryState,
    /// Sum of debit over all lines, maintained by `recompute_entry_totals`
    pub amount_total: f64,
    /// Entry this one reverses, if any
    pub reversed_entry_id: Option<i64>,
    /// Owning company
    pub company_id: Option<i64>,
}

impl Model {
    /// Whether the asset rules are skipped for this entry.
    #[must_use]
    pub const fn is_sale_document(&self) -> bool {
        self.move_type.is_sale_document()
    }
}

/// Defines relationships between `JournalEntry` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One entry has many lines
    #[sea_orm(has_many = "super::entry_line::Entity")]
    Lines,
    /// One entry has many audit messages
    #[sea_orm(has_many = "super::entry_message::Entity")]
    Messages,
}

impl Related<super::entry_line::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Lines.def()
    }
}

impl Related<super::entry_message::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Messages.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
