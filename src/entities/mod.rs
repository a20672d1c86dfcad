//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod account;
pub mod asset;
pub mod asset_profile;
pub mod depreciation_line;
pub mod entry_line;
pub mod entry_message;
pub mod journal_entry;

// Re-export specific types to avoid conflicts
pub use account::{Column as AccountColumn, Entity as Account, Model as AccountModel};
pub use asset::{Column as AssetColumn, Entity as Asset, Model as AssetModel};
pub use asset_profile::{
    Column as AssetProfileColumn, Entity as AssetProfile, Model as AssetProfileModel,
};
pub use depreciation_line::{
    Column as DepreciationLineColumn, Entity as DepreciationLine, LineType,
    Model as DepreciationLineModel,
};
pub use entry_line::{Column as EntryLineColumn, Entity as EntryLine, Model as EntryLineModel};
pub use entry_message::{
    Column as EntryMessageColumn, Entity as EntryMessage, Model as EntryMessageModel,
};
pub use journal_entry::{
    Column as JournalEntryColumn, Entity as JournalEntry, EntryState, Model as JournalEntryModel,
    MoveType,
};
