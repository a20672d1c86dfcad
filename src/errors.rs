//! Unified error types for the asset ledger.
//!
//! Guard rejections are all reported through [`Error::Permission`]; persistence
//! failures from `SeaORM` pass through untouched via [`Error::Database`].

use thiserror::Error;

/// Reason a guard refused an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    /// Deleting an entry that still has depreciate/remove lines attached.
    LinkedEntryRemoval,
    /// Changing journal or date of an entry attached to a depreciation line.
    LinkedEntryChange,
    /// Changing a protected field of a line that is linked to an asset.
    LinkedItemChange,
    /// Setting `asset_id` on a line outside the asset creation workflow.
    AssetLinkNotAllowed,
    /// Deleting an asset whose depreciation lines are already posted.
    PostedDepreciation,
}

impl std::fmt::Display for Denial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let message = match self {
            Self::LinkedEntryRemoval => {
                "You are not allowed to remove an accounting entry linked to an asset. \
                 You should remove such entries from the asset."
            }
            Self::LinkedEntryChange => {
                "You cannot change an accounting entry linked to an asset depreciation line."
            }
            Self::LinkedItemChange => {
                "You cannot change an accounting item linked to an asset depreciation line."
            }
            Self::AssetLinkNotAllowed => {
                "You are not allowed to link an accounting entry to an asset. \
                 You should generate such entries from the asset."
            }
            Self::PostedDepreciation => {
                "You cannot delete an asset that contains posted depreciation lines."
            }
        };
        f.write_str(message)
    }
}

/// Errors returned by the asset ledger.
#[derive(Debug, Error)]
pub enum Error {
    /// A guard refused the operation.
    #[error("Permission denied: {denial}")]
    Permission {
        /// Which guard rule refused it
        denial: Denial,
    },

    /// Posting a profiled line that carries both debit and credit.
    #[error("Line {line_id} has both debit ({debit}) and credit ({credit}); cannot derive a depreciation base")]
    AmbiguousDepreciationBase {
        /// Offending line
        line_id: i64,
        /// Its debit
        debit: f64,
        /// Its credit
        credit: f64,
    },

    /// Non-finite or out-of-range amount or quantity.
    #[error("Invalid {field}: {amount}")]
    InvalidAmount {
        /// Name of the rejected field
        field: &'static str,
        /// The rejected value
        amount: f64,
    },

    /// Debits and credits of an entry differ at posting.
    #[error("Entry {entry_id} is unbalanced: debit {debit} != credit {credit}")]
    Unbalanced {
        /// Entry being posted
        entry_id: i64,
        /// Sum of debits
        debit: f64,
        /// Sum of credits
        credit: f64,
    },

    /// Operation not allowed in the entry's current state.
    #[error("Cannot {action} entry {entry_id} in state '{state}'")]
    InvalidState {
        /// Entry in the wrong state
        entry_id: i64,
        /// Its current state
        state: String,
        /// What was attempted
        action: &'static str,
    },

    /// A referenced record does not exist.
    #[error("{entity} {id} not found")]
    NotFound {
        /// Kind of record
        entity: &'static str,
        /// Missing ID
        id: i64,
    },

    /// Seed file could not be loaded or applied.
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// Persistence failure from `SeaORM`.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Missing or malformed environment variable.
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),
}

impl Error {
    /// Shorthand for a guard rejection.
    #[must_use]
    pub const fn permission(denial: Denial) -> Self {
        Self::Permission { denial }
    }

    /// Returns the denial reason if this is a permission error.
    #[must_use]
    pub const fn denial(&self) -> Option<Denial> {
        match self {
            Self::Permission { denial } => Some(*denial),
            _ => None,
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_message_is_user_facing() {
        let err = Error::permission(Denial::LinkedItemChange);
        assert_eq!(err.denial(), Some(Denial::LinkedItemChange));
        assert!(err.to_string().contains("linked to an asset depreciation line"));
    }

    #[test]
    fn test_non_permission_has_no_denial() {
        let err = Error::NotFound {
            entity: "asset",
            id: 7,
        };
        assert_eq!(err.denial(), None);
        assert_eq!(err.to_string(), "asset 7 not found");
    }
}
