//! Typed change-sets for journal entries and entry lines.
//!
//! A field left at `None` is untouched. Nullable columns use `Option<Option<T>>`,
//! where `Some(None)` clears the value. Guards inspect which fields are present
//! instead of probing a loose key/value map.

use crate::entities::{entry_line, journal_entry};
use chrono::NaiveDate;
use sea_orm::{IntoActiveModel, Set};

/// Update of a journal entry header.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryChanges {
    /// New label
    pub name: Option<String>,
    /// New reference; `Some(None)` clears it
    pub reference: Option<Option<String>>,
    /// New journal (protected)
    pub journal_id: Option<i64>,
    /// New accounting date (protected)
    pub date: Option<NaiveDate>,
}

impl EntryChanges {
    /// Journal or date is changing; both are frozen by depreciation postings.
    #[must_use]
    pub const fn touches_protected(&self) -> bool {
        self.journal_id.is_some() || self.date.is_some()
    }

    /// Builds the active model that persists this change on `entry`.
    #[must_use]
    pub fn apply(&self, entry: journal_entry::Model) -> journal_entry::ActiveModel {
        let mut active = entry.into_active_model();
        if let Some(name) = &self.name {
            active.name = Set(name.clone());
        }
        if let Some(reference) = &self.reference {
            active.reference = Set(reference.clone());
        }
        if let Some(journal_id) = self.journal_id {
            active.journal_id = Set(journal_id);
        }
        if let Some(date) = self.date {
            active.date = Set(date);
        }
        active
    }
}

/// Update of one or more entry lines.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineChanges {
    /// New label
    pub name: Option<String>,
    /// New account (protected)
    pub account_id: Option<i64>,
    /// New journal (protected)
    pub journal_id: Option<i64>,
    /// New date (protected)
    pub date: Option<NaiveDate>,
    /// New debit (protected)
    pub debit: Option<f64>,
    /// New credit (protected)
    pub credit: Option<f64>,
    /// New quantity; may trigger per-unit expansion
    pub quantity: Option<f64>,
    /// New unit price
    pub price_unit: Option<f64>,
    /// New partner
    pub partner_id: Option<Option<i64>>,
    /// New analytic account
    pub analytic_account_id: Option<Option<i64>>,
    /// New asset profile (protected)
    pub asset_profile_id: Option<Option<i64>>,
    /// New asset link (protected)
    pub asset_id: Option<Option<i64>>,
}

impl LineChanges {
    /// Change that links the lines to `asset_id`.
    #[must_use]
    pub fn link_asset(asset_id: i64) -> Self {
        Self {
            asset_id: Some(Some(asset_id)),
            ..Self::default()
        }
    }

    /// Change that only clears `asset_id`.
    #[must_use]
    pub fn clear_asset() -> Self {
        Self {
            asset_id: Some(None),
            ..Self::default()
        }
    }

    /// Any field that is frozen once a line is linked to an asset is present.
    #[must_use]
    pub const fn touches_protected(&self) -> bool {
        self.credit.is_some()
            || self.debit.is_some()
            || self.account_id.is_some()
            || self.journal_id.is_some()
            || self.date.is_some()
            || self.asset_profile_id.is_some()
            || self.asset_id.is_some()
    }

    /// The change clears `asset_id` and touches nothing else.
    #[must_use]
    pub fn is_asset_removal(&self) -> bool {
        *self == Self::clear_asset()
    }

    /// The change sets a non-empty `asset_id`.
    #[must_use]
    pub const fn links_asset(&self) -> bool {
        matches!(self.asset_id, Some(Some(_)))
    }

    /// Quantity or profile changed, so per-unit expansion must be re-evaluated.
    #[must_use]
    pub const fn triggers_expansion(&self) -> bool {
        self.quantity.is_some() || self.asset_profile_id.is_some()
    }

    /// Builds the active model that persists this change on `line`.
    ///
    /// `price_subtotal` follows `quantity` and `price_unit`.
    #[must_use]
    pub fn apply(&self, line: entry_line::Model) -> entry_line::ActiveModel {
        let quantity = self.quantity.unwrap_or(line.quantity);
        let price_unit = self.price_unit.unwrap_or(line.price_unit);
        let mut active = line.into_active_model();

        if let Some(name) = &self.name {
            active.name = Set(name.clone());
        }
        if let Some(account_id) = self.account_id {
            active.account_id = Set(account_id);
        }
        if let Some(journal_id) = self.journal_id {
            active.journal_id = Set(journal_id);
        }
        if let Some(date) = self.date {
            active.date = Set(date);
        }
        if let Some(debit) = self.debit {
            active.debit = Set(debit);
        }
        if let Some(credit) = self.credit {
            active.credit = Set(credit);
        }
        if self.quantity.is_some() || self.price_unit.is_some() {
            active.quantity = Set(quantity);
            active.price_unit = Set(price_unit);
            active.price_subtotal = Set(price_unit * quantity);
        }
        if let Some(partner_id) = self.partner_id {
            active.partner_id = Set(partner_id);
        }
        if let Some(analytic_account_id) = self.analytic_account_id {
            active.analytic_account_id = Set(analytic_account_id);
        }
        if let Some(asset_profile_id) = self.asset_profile_id {
            active.asset_profile_id = Set(asset_profile_id);
        }
        if let Some(asset_id) = self.asset_id {
            active.asset_id = Set(asset_id);
        }
        active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_protected_fields() {
        let journal = EntryChanges {
            journal_id: Some(2),
            ..EntryChanges::default()
        };
        let date = EntryChanges {
            date: NaiveDate::from_ymd_opt(2026, 1, 31),
            ..EntryChanges::default()
        };
        let reference = EntryChanges {
            reference: Some(Some("PO-42".to_string())),
            ..EntryChanges::default()
        };
        assert!(journal.touches_protected());
        assert!(date.touches_protected());
        assert!(!reference.touches_protected());
    }

    #[test]
    fn test_line_protected_fields() {
        assert!(LineChanges::link_asset(1).touches_protected());
        assert!(
            LineChanges {
                debit: Some(10.0),
                ..LineChanges::default()
            }
            .touches_protected()
        );
        assert!(
            !LineChanges {
                name: Some("Desk".to_string()),
                quantity: Some(2.0),
                partner_id: Some(Some(4)),
                ..LineChanges::default()
            }
            .touches_protected()
        );
    }

    #[test]
    fn test_asset_removal_must_be_alone() {
        assert!(LineChanges::clear_asset().is_asset_removal());
        assert!(!LineChanges::link_asset(5).is_asset_removal());

        let mixed = LineChanges {
            name: Some("renamed".to_string()),
            ..LineChanges::clear_asset()
        };
        assert!(!mixed.is_asset_removal());
    }

    #[test]
    fn test_expansion_trigger() {
        assert!(
            LineChanges {
                quantity: Some(3.0),
                ..LineChanges::default()
            }
            .triggers_expansion()
        );
        assert!(
            LineChanges {
                asset_profile_id: Some(None),
                ..LineChanges::default()
            }
            .triggers_expansion()
        );
        assert!(!LineChanges::link_asset(1).triggers_expansion());
    }
}
