//! Core business logic - framework-agnostic asset guard operations.
//!
//! The entry guard ([`entry`]) and entry-line guard ([`entry_line`]) are the
//! public surface. The remaining modules are the record operations they build on.

/// Asset creation, deletion and stored value recomputation
pub mod asset;
/// Explicit capability token replacing ambient permission flags
pub mod capability;
/// Typed change-sets for entries and lines
pub mod changes;
/// Depreciation line lookup and detachment
pub mod depreciation;
/// Entry guard: delete, modify, post, reset to draft, reversal
pub mod entry;
/// Entry-line guard: create, modify, per-unit expansion, account onchange
pub mod entry_line;
/// Audit messages on entries
pub mod message;

pub use capability::Capabilities;
pub use changes::{EntryChanges, LineChanges};
