//! Entry-line guard - gates asset linkage on individual lines and expands
//! multi-quantity asset lines into one line per unit.
//!
//! Lines of sale documents are exempt from the asset rules. For every other
//! line, `asset_id` can only be set under [`Capabilities::allow_asset`] and, once
//! set, the amounts, account, journal, date, profile and asset stay frozen until
//! the asset is removed through the dedicated removal path.

use crate::{
    core::{capability::Capabilities, changes::LineChanges, entry::recompute_entry_totals},
    entities::{
        Account, AssetProfile, EntryLine, JournalEntry, entry_line, journal_entry,
    },
    errors::{Denial, Error, Result},
};
use sea_orm::{IntoActiveModel, QueryOrder, Set, TransactionTrait, prelude::*};
use std::collections::HashSet;
use tracing::{debug, info, instrument, warn};

/// Upper bound on the number of per-unit lines a single line may expand into.
pub const MAX_EXPANSION_UNITS: f64 = 10_000.0;

/// Values for a new entry line.
///
/// Journal and date are taken from the owning entry.
#[derive(Debug, Clone, PartialEq)]
pub struct LineDraft {
    /// Owning entry
    pub entry_id: i64,
    /// Label
    pub name: String,
    /// General ledger account
    pub account_id: i64,
    /// Debit amount
    pub debit: f64,
    /// Credit amount
    pub credit: f64,
    /// Number of units; defaults to 1
    pub quantity: f64,
    /// Price per unit
    pub price_unit: f64,
    /// Business partner
    pub partner_id: Option<i64>,
    /// Analytic account
    pub analytic_account_id: Option<i64>,
    /// Asset profile; asset creation is driven by it when the entry is posted
    pub asset_profile_id: Option<i64>,
    /// Linked asset; only settable under [`Capabilities::allow_asset`]
    pub asset_id: Option<i64>,
}

impl Default for LineDraft {
    fn default() -> Self {
        Self {
            entry_id: 0,
            name: String::new(),
            account_id: 0,
            debit: 0.0,
            credit: 0.0,
            quantity: 1.0,
            price_unit: 0.0,
            partner_id: None,
            analytic_account_id: None,
            asset_profile_id: None,
            asset_id: None,
        }
    }
}

/// Creates lines, rejecting asset links made outside the asset workflow, then
/// expands every new line per unit where its profile asks for it.
///
/// Returns all resulting lines, including the per-unit copies.
#[instrument(skip(db, drafts), fields(count = drafts.len()))]
pub async fn create_lines(
    db: &DatabaseConnection,
    drafts: Vec<LineDraft>,
    caps: &Capabilities,
) -> Result<Vec<entry_line::Model>> {
    let txn = db.begin().await?;
    let lines = create_lines_in(&txn, drafts, caps).await?;
    txn.commit().await?;
    Ok(lines)
}

/// [`create_lines`] on an existing connection or transaction.
pub async fn create_lines_in<C>(
    conn: &C,
    drafts: Vec<LineDraft>,
    caps: &Capabilities,
) -> Result<Vec<entry_line::Model>>
where
    C: ConnectionTrait,
{
    let mut entries = Vec::with_capacity(drafts.len());
    for draft in &drafts {
        check_amounts([
            ("debit", Some(draft.debit)),
            ("credit", Some(draft.credit)),
            ("quantity", Some(draft.quantity)),
            ("price_unit", Some(draft.price_unit)),
        ])?;
        let entry = JournalEntry::find_by_id(draft.entry_id)
            .one(conn)
            .await?
            .ok_or(Error::NotFound {
                entity: "journal entry",
                id: draft.entry_id,
            })?;
        if !entry.is_sale_document() && draft.asset_id.is_some() && !caps.allow_asset {
            warn!("Line '{}' tried to link asset {:?}", draft.name, draft.asset_id);
            return Err(Error::permission(Denial::AssetLinkNotAllowed));
        }
        entries.push(entry);
    }

    let mut inserted = Vec::with_capacity(drafts.len());
    for (draft, entry) in drafts.into_iter().zip(entries) {
        let line = entry_line::ActiveModel {
            entry_id: Set(entry.id),
            name: Set(draft.name),
            account_id: Set(draft.account_id),
            journal_id: Set(entry.journal_id),
            date: Set(entry.date),
            debit: Set(draft.debit),
            credit: Set(draft.credit),
            quantity: Set(draft.quantity),
            price_unit: Set(draft.price_unit),
            price_subtotal: Set(draft.price_unit * draft.quantity),
            partner_id: Set(draft.partner_id),
            analytic_account_id: Set(draft.analytic_account_id),
            asset_profile_id: Set(draft.asset_profile_id),
            asset_id: Set(draft.asset_id),
            ..Default::default()
        }
        .insert(conn)
        .await?;
        inserted.push(line);
    }

    let mut result = Vec::with_capacity(inserted.len());
    for line in inserted {
        result.extend(expand_asset_line(conn, line.id).await?);
    }
    Ok(result)
}

/// Applies `changes` to the given lines.
///
/// # Errors
/// - [`Denial::LinkedItemChange`] when a protected field changes on an asset-linked
///   line of a non-sale entry, unless the change is a pure `asset_id` removal under
///   [`Capabilities::allow_asset_removal`].
/// - [`Denial::AssetLinkNotAllowed`] when a non-sale line gets an `asset_id`
///   without [`Capabilities::allow_asset`].
#[instrument(skip(db))]
pub async fn modify_lines(
    db: &DatabaseConnection,
    line_ids: &[i64],
    changes: &LineChanges,
    caps: &Capabilities,
) -> Result<Vec<entry_line::Model>> {
    let txn = db.begin().await?;
    let lines = modify_lines_in(&txn, line_ids, changes, caps).await?;
    txn.commit().await?;
    Ok(lines)
}

/// [`modify_lines`] on an existing connection or transaction.
pub async fn modify_lines_in<C>(
    conn: &C,
    line_ids: &[i64],
    changes: &LineChanges,
    caps: &Capabilities,
) -> Result<Vec<entry_line::Model>>
where
    C: ConnectionTrait,
{
    check_amounts([
        ("debit", changes.debit),
        ("credit", changes.credit),
        ("quantity", changes.quantity),
        ("price_unit", changes.price_unit),
    ])?;

    let lines = find_lines(conn, line_ids).await?;
    let sale_entries = sale_entry_ids(conn, &lines).await?;
    let guarded: Vec<&entry_line::Model> = lines
        .iter()
        .filter(|line| !sale_entries.contains(&line.entry_id))
        .collect();

    let removal_allowed = caps.allow_asset_removal && changes.is_asset_removal();
    if changes.touches_protected() && !removal_allowed {
        if let Some(line) = guarded.iter().find(|line| line.asset_id.is_some()) {
            warn!(
                "Line {} is linked to asset {:?}; refusing {:?}",
                line.id, line.asset_id, changes
            );
            return Err(Error::permission(Denial::LinkedItemChange));
        }
    }

    if changes.links_asset() && !caps.allow_asset && !guarded.is_empty() {
        warn!("Refusing to link lines {:?} to {:?}", line_ids, changes.asset_id);
        return Err(Error::permission(Denial::AssetLinkNotAllowed));
    }

    let mut updated = Vec::with_capacity(lines.len());
    for line in lines {
        updated.push(changes.apply(line).update(conn).await?);
    }

    if changes.triggers_expansion() {
        for line in &updated {
            expand_asset_line(conn, line.id).await?;
        }
        return find_lines(conn, line_ids).await;
    }
    Ok(updated)
}

/// Splits a line into one line per unit when its asset profile tracks items individually.
///
/// No-op unless the line has a profile with `asset_product_item` set and a
/// quantity above one. The original line becomes `"<name> 1"` with quantity 1 and
/// copies `"<name> 2"` .. `"<name> n"` follow, where `n` is the whole part of the
/// quantity. Debit, credit and subtotal are spread over the units in cents, the
/// last unit taking the rounding remainder, so the entry totals do not move.
/// Copies never inherit `asset_id`.
///
/// Returns the original line followed by its copies.
///
/// # Errors
/// - [`Denial::LinkedItemChange`] when the line belongs to a non-sale entry and
///   is already linked to an asset, since expansion rewrites its amounts.
/// - [`Error::InvalidAmount`] when the quantity exceeds [`MAX_EXPANSION_UNITS`].
pub async fn expand_asset_line<C>(conn: &C, line_id: i64) -> Result<Vec<entry_line::Model>>
where
    C: ConnectionTrait,
{
    let line = EntryLine::find_by_id(line_id)
        .one(conn)
        .await?
        .ok_or(Error::NotFound {
            entity: "entry line",
            id: line_id,
        })?;

    let Some(profile_id) = line.asset_profile_id else {
        return Ok(vec![line]);
    };
    if line.quantity <= 1.0 {
        return Ok(vec![line]);
    }
    let profile = AssetProfile::find_by_id(profile_id)
        .one(conn)
        .await?
        .ok_or(Error::NotFound {
            entity: "asset profile",
            id: profile_id,
        })?;
    if !profile.asset_product_item {
        return Ok(vec![line]);
    }
    if line.quantity > MAX_EXPANSION_UNITS {
        warn!("Line {} quantity {} is too large to expand", line.id, line.quantity);
        return Err(Error::InvalidAmount {
            field: "quantity",
            amount: line.quantity,
        });
    }
    if line.asset_id.is_some() {
        let entry = JournalEntry::find_by_id(line.entry_id)
            .one(conn)
            .await?
            .ok_or(Error::NotFound {
                entity: "journal entry",
                id: line.entry_id,
            })?;
        if !entry.is_sale_document() {
            warn!(
                "Line {} is linked to asset {:?}; refusing to expand it",
                line.id, line.asset_id
            );
            return Err(Error::permission(Denial::LinkedItemChange));
        }
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let units = line.quantity.trunc() as usize;
    let debits = split_amount(line.debit, units);
    let credits = split_amount(line.credit, units);
    let subtotals = split_amount(line.price_unit * line.quantity.trunc(), units);
    let base_name = line.name.clone();
    let entry_id = line.entry_id;
    debug!("Expanding line {} '{}' into {} units", line.id, base_name, units);

    let template = line.clone();
    let mut first = line.into_active_model();
    first.name = Set(format!("{base_name} 1"));
    first.quantity = Set(1.0);
    first.debit = Set(debits[0]);
    first.credit = Set(credits[0]);
    first.price_subtotal = Set(subtotals[0]);
    let mut result = vec![first.update(conn).await?];

    for index in 1..units {
        let copy = entry_line::ActiveModel {
            entry_id: Set(template.entry_id),
            name: Set(format!("{base_name} {}", index + 1)),
            account_id: Set(template.account_id),
            journal_id: Set(template.journal_id),
            date: Set(template.date),
            debit: Set(debits[index]),
            credit: Set(credits[index]),
            quantity: Set(1.0),
            price_unit: Set(template.price_unit),
            price_subtotal: Set(subtotals[index]),
            partner_id: Set(template.partner_id),
            analytic_account_id: Set(template.analytic_account_id),
            asset_profile_id: Set(template.asset_profile_id),
            asset_id: Set(None),
            ..Default::default()
        }
        .insert(conn)
        .await?;
        result.push(copy);
    }

    recompute_entry_totals(conn, entry_id).await?;
    info!("Expanded line '{}' into {} per-unit lines", base_name, result.len());
    Ok(result)
}

/// Proposes the account's default asset profile when the account of a draft changes.
///
/// An empty label is filled with the account name.
pub async fn onchange_account<C>(conn: &C, draft: &mut LineDraft, account_id: i64) -> Result<()>
where
    C: ConnectionTrait,
{
    let account = Account::find_by_id(account_id)
        .one(conn)
        .await?
        .ok_or(Error::NotFound {
            entity: "account",
            id: account_id,
        })?;

    draft.account_id = account.id;
    draft.asset_profile_id = account.asset_profile_id;
    if draft.name.trim().is_empty() {
        draft.name = account.name;
    }
    Ok(())
}

/// Retrieves the lines of an entry in creation order.
pub async fn get_lines_for_entry<C>(conn: &C, entry_id: i64) -> Result<Vec<entry_line::Model>>
where
    C: ConnectionTrait,
{
    EntryLine::find()
        .filter(entry_line::Column::EntryId.eq(entry_id))
        .order_by_asc(entry_line::Column::Id)
        .all(conn)
        .await
        .map_err(Into::into)
}

async fn find_lines<C>(conn: &C, line_ids: &[i64]) -> Result<Vec<entry_line::Model>>
where
    C: ConnectionTrait,
{
    EntryLine::find()
        .filter(entry_line::Column::Id.is_in(line_ids.iter().copied()))
        .order_by_asc(entry_line::Column::Id)
        .all(conn)
        .await
        .map_err(Into::into)
}

async fn sale_entry_ids<C>(conn: &C, lines: &[entry_line::Model]) -> Result<HashSet<i64>>
where
    C: ConnectionTrait,
{
    let entry_ids: HashSet<i64> = lines.iter().map(|line| line.entry_id).collect();
    Ok(JournalEntry::find()
        .filter(journal_entry::Column::Id.is_in(entry_ids))
        .all(conn)
        .await?
        .into_iter()
        .filter(journal_entry::Model::is_sale_document)
        .map(|entry| entry.id)
        .collect())
}

/// Rejects NaN and infinite amounts before anything is written.
fn check_amounts<const N: usize>(amounts: [(&'static str, Option<f64>); N]) -> Result<()> {
    for (field, amount) in amounts {
        if let Some(amount) = amount.filter(|amount| !amount.is_finite()) {
            return Err(Error::InvalidAmount { field, amount });
        }
    }
    Ok(())
}

/// Spreads `total` over `units` cent-rounded parts; the last part absorbs the remainder.
fn split_amount(total: f64, units: usize) -> Vec<f64> {
    if units == 0 {
        return Vec::new();
    }
    #[allow(clippy::cast_precision_loss)]
    let share = round_cents(total / units as f64);
    let mut parts = vec![share; units];
    #[allow(clippy::cast_precision_loss)]
    let allotted = share * (units - 1) as f64;
    parts[units - 1] = round_cents(total - allotted);
    parts
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
