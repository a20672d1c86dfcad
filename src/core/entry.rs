//! Entry guard - protects journal entries that take part in an asset's
//! depreciation schedule and creates assets when entries are posted.
//!
//! Every public function runs inside a single database transaction. A rejected
//! guard returns early, the transaction is dropped, and nothing is written.

use crate::{
    core::{
        asset::{NewAsset, create_asset, delete_assets, depreciation_base},
        capability::Capabilities,
        changes::{EntryChanges, LineChanges},
        depreciation::{detach_from_entries, find_lines_for_entries},
        entry_line::{LineDraft, create_lines_in, get_lines_for_entry, modify_lines_in},
        message::{asset_creation_body, post_message},
    },
    entities::{
        EntryLine, EntryMessage, EntryState, JournalEntry, LineType, MoveType, asset,
        entry_line, entry_message, journal_entry,
    },
    errors::{Denial, Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{IntoActiveModel, QueryOrder, Set, TransactionTrait, prelude::*, sea_query::Expr};
use tracing::{debug, info, instrument, warn};

const BALANCE_TOLERANCE: f64 = 0.005;

/// Values for a new journal entry header.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryDraft {
    /// Entry number
    pub name: String,
    /// Free reference
    pub reference: Option<String>,
    /// Journal
    pub journal_id: i64,
    /// Accounting date
    pub date: NaiveDate,
    /// Document type
    pub move_type: MoveType,
    /// Owning company
    pub company_id: Option<i64>,
    /// Entry this one reverses
    pub reversed_entry_id: Option<i64>,
}

/// Overrides applied to a reversal.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReversalDefaults {
    /// Accounting date of the reversal; the original date when absent
    pub date: Option<NaiveDate>,
    /// Journal of the reversal; the original journal when absent
    pub journal_id: Option<i64>,
    /// Reference; `"Reversal of: <name>"` when absent
    pub reference: Option<String>,
}

/// Everything needed to create the entry that reverses another one.
///
/// `lines[*].entry_id` is filled in once the reversal header exists.
#[derive(Debug, Clone, PartialEq)]
pub struct ReversalDraft {
    /// Header of the reversal
    pub entry: EntryDraft,
    /// Lines with debit and credit swapped
    pub lines: Vec<LineDraft>,
    /// Post the reversal right away
    pub cancel: bool,
}

/// Creates a draft entry without lines.
pub async fn create_entry<C>(conn: &C, draft: EntryDraft) -> Result<journal_entry::Model>
where
    C: ConnectionTrait,
{
    journal_entry::ActiveModel {
        name: Set(draft.name),
        reference: Set(draft.reference),
        journal_id: Set(draft.journal_id),
        date: Set(draft.date),
        move_type: Set(draft.move_type),
        state: Set(EntryState::Draft),
        amount_total: Set(0.0),
        reversed_entry_id: Set(draft.reversed_entry_id),
        company_id: Set(draft.company_id),
        ..Default::default()
    }
    .insert(conn)
    .await
    .map_err(Into::into)
}

/// Finds an entry by its unique ID.
pub async fn get_entry_by_id<C>(conn: &C, entry_id: i64) -> Result<Option<journal_entry::Model>>
where
    C: ConnectionTrait,
{
    JournalEntry::find_by_id(entry_id)
        .one(conn)
        .await
        .map_err(Into::into)
}

async fn require_entry<C>(conn: &C, entry_id: i64) -> Result<journal_entry::Model>
where
    C: ConnectionTrait,
{
    get_entry_by_id(conn, entry_id)
        .await?
        .ok_or(Error::NotFound {
            entity: "journal entry",
            id: entry_id,
        })
}

/// Recomputes `amount_total` from the entry's lines.
///
/// Balance itself is validated when the entry is posted.
pub async fn recompute_entry_totals<C>(conn: &C, entry_id: i64) -> Result<journal_entry::Model>
where
    C: ConnectionTrait,
{
    let entry = require_entry(conn, entry_id).await?;
    let amount_total: f64 = get_lines_for_entry(conn, entry_id)
        .await?
        .iter()
        .map(|line| line.debit)
        .sum();

    let mut active = entry.into_active_model();
    active.amount_total = Set(amount_total);
    active.update(conn).await.map_err(Into::into)
}

/// Deletes entries together with their lines and messages.
///
/// # Errors
/// Returns [`Denial::LinkedEntryRemoval`] when a depreciate or remove line points
/// at one of the entries and `caps` lacks [`Capabilities::unlink_from_asset`].
/// With the capability those lines are detached and their assets recomputed first.
#[instrument(skip(db))]
pub async fn delete_entries(
    db: &DatabaseConnection,
    entry_ids: &[i64],
    caps: &Capabilities,
) -> Result<()> {
    let txn = db.begin().await?;

    let deprs =
        find_lines_for_entries(&txn, entry_ids, &[LineType::Depreciate, LineType::Remove]).await?;
    if !deprs.is_empty() && !caps.unlink_from_asset {
        warn!(
            "Entries {:?} are referenced by {} depreciation line(s)",
            entry_ids,
            deprs.len()
        );
        return Err(Error::permission(Denial::LinkedEntryRemoval));
    }
    detach_from_entries(&txn, deprs).await?;

    EntryMessage::delete_many()
        .filter(entry_message::Column::EntryId.is_in(entry_ids.iter().copied()))
        .exec(&txn)
        .await?;
    EntryLine::delete_many()
        .filter(entry_line::Column::EntryId.is_in(entry_ids.iter().copied()))
        .exec(&txn)
        .await?;
    JournalEntry::delete_many()
        .filter(journal_entry::Column::Id.is_in(entry_ids.iter().copied()))
        .exec(&txn)
        .await?;

    txn.commit().await?;
    info!("Deleted entries {:?}", entry_ids);
    Ok(())
}

/// Applies `changes` to the given entries; journal and date also move on their lines.
///
/// # Errors
/// Returns [`Denial::LinkedEntryChange`] when journal or date changes while a
/// depreciate line points at one of the entries.
#[instrument(skip(db))]
pub async fn modify_entries(
    db: &DatabaseConnection,
    entry_ids: &[i64],
    changes: &EntryChanges,
) -> Result<Vec<journal_entry::Model>> {
    let txn = db.begin().await?;

    if changes.touches_protected() {
        let deprs = find_lines_for_entries(&txn, entry_ids, &[LineType::Depreciate]).await?;
        if !deprs.is_empty() {
            warn!("Entries {:?} are posted depreciations; refusing {:?}", entry_ids, changes);
            return Err(Error::permission(Denial::LinkedEntryChange));
        }
    }

    let entries = JournalEntry::find()
        .filter(journal_entry::Column::Id.is_in(entry_ids.iter().copied()))
        .order_by_asc(journal_entry::Column::Id)
        .all(&txn)
        .await?;
    let mut updated = Vec::with_capacity(entries.len());
    for entry in entries {
        updated.push(changes.apply(entry).update(&txn).await?);
    }

    if let Some(journal_id) = changes.journal_id {
        EntryLine::update_many()
            .col_expr(entry_line::Column::JournalId, Expr::value(journal_id))
            .filter(entry_line::Column::EntryId.is_in(entry_ids.iter().copied()))
            .exec(&txn)
            .await?;
    }
    if let Some(date) = changes.date {
        EntryLine::update_many()
            .col_expr(entry_line::Column::Date, Expr::value(date))
            .filter(entry_line::Column::EntryId.is_in(entry_ids.iter().copied()))
            .exec(&txn)
            .await?;
    }

    txn.commit().await?;
    Ok(updated)
}

/// Posts the entries and creates one asset per profiled line of non-sale entries.
///
/// Each created asset is linked back to its line through the guarded line
/// write, and one message listing the new assets is posted per entry.
/// `caps.company_override` is assigned to every created asset.
///
/// Returns the created assets in posting order.
#[instrument(skip(db))]
pub async fn post_entries(
    db: &DatabaseConnection,
    entry_ids: &[i64],
    caps: &Capabilities,
) -> Result<Vec<asset::Model>> {
    let txn = db.begin().await?;
    let mut created = Vec::new();
    for &entry_id in entry_ids {
        created.extend(post_entry_in(&txn, entry_id, caps).await?);
    }
    txn.commit().await?;
    Ok(created)
}

async fn post_entry_in<C>(conn: &C, entry_id: i64, caps: &Capabilities) -> Result<Vec<asset::Model>>
where
    C: ConnectionTrait,
{
    let entry = require_entry(conn, entry_id).await?;
    if entry.state != EntryState::Draft {
        return Err(Error::InvalidState {
            entry_id,
            state: entry.state.to_string(),
            action: "post",
        });
    }

    let lines = get_lines_for_entry(conn, entry_id).await?;
    let debit: f64 = lines.iter().map(|line| line.debit).sum();
    let credit: f64 = lines.iter().map(|line| line.credit).sum();
    if (debit - credit).abs() >= BALANCE_TOLERANCE {
        return Err(Error::Unbalanced {
            entry_id,
            debit,
            credit,
        });
    }

    let mut active = entry.into_active_model();
    active.state = Set(EntryState::Posted);
    active.amount_total = Set(debit);
    let entry = active.update(conn).await?;
    info!("Posted entry {} '{}'", entry.id, entry.name);

    if entry.is_sale_document() {
        return Ok(Vec::new());
    }

    let link_caps = caps.with_allow_asset();
    let mut assets = Vec::new();
    for line in lines
        .iter()
        .filter(|line| line.asset_profile_id.is_some() && line.asset_id.is_none())
    {
        let Some(profile_id) = line.asset_profile_id else {
            continue;
        };
        let asset = create_asset(
            conn,
            NewAsset {
                name: line.name.clone(),
                code: Some(entry.name.clone()),
                profile_id,
                purchase_value: depreciation_base(line)?,
                partner_id: line.partner_id,
                date_start: entry.date,
                account_analytic_id: line.analytic_account_id,
                company_id: caps.company_override.or(entry.company_id),
            },
        )
        .await?;
        modify_lines_in(conn, &[line.id], &LineChanges::link_asset(asset.id), &link_caps).await?;
        assets.push(asset);
    }

    if !assets.is_empty() {
        post_message(conn, entry.id, asset_creation_body(&assets)).await?;
    }
    Ok(assets)
}

/// Sets posted entries back to draft.
///
/// Assets created from the lines of non-sale entries are deleted first.
#[instrument(skip(db))]
pub async fn reset_to_draft(db: &DatabaseConnection, entry_ids: &[i64]) -> Result<()> {
    let txn = db.begin().await?;

    for &entry_id in entry_ids {
        let entry = require_entry(&txn, entry_id).await?;
        if entry.state == EntryState::Draft {
            return Err(Error::InvalidState {
                entry_id,
                state: entry.state.to_string(),
                action: "reset",
            });
        }

        if !entry.is_sale_document() {
            let mut asset_ids: Vec<i64> = get_lines_for_entry(&txn, entry_id)
                .await?
                .into_iter()
                .filter_map(|line| line.asset_id)
                .collect();
            asset_ids.dedup();
            debug!("Entry {} back to draft drops assets {:?}", entry_id, asset_ids);
            delete_assets(&txn, &asset_ids).await?;
        }

        let mut active = entry.into_active_model();
        active.state = Set(EntryState::Draft);
        active.update(&txn).await?;
    }

    txn.commit().await?;
    info!("Reset entries {:?} to draft", entry_ids);
    Ok(())
}

/// Computes the entry that reverses `entry`.
///
/// Lines swap debit and credit. Unless the reversal is a sale document, the
/// asset behind each original line is deleted and the reversal line loses its
/// profile and asset, so reversing a vendor bill also drops its assets.
pub async fn build_reversal<C>(
    conn: &C,
    entry: &journal_entry::Model,
    defaults: &ReversalDefaults,
    cancel: bool,
) -> Result<ReversalDraft>
where
    C: ConnectionTrait,
{
    let move_type = entry.move_type.reversed();
    let header = EntryDraft {
        name: format!("{}/R", entry.name),
        reference: Some(
            defaults
                .reference
                .clone()
                .unwrap_or_else(|| format!("Reversal of: {}", entry.name)),
        ),
        journal_id: defaults.journal_id.unwrap_or(entry.journal_id),
        date: defaults.date.unwrap_or(entry.date),
        move_type,
        company_id: entry.company_id,
        reversed_entry_id: Some(entry.id),
    };

    let mut lines = Vec::new();
    for line in get_lines_for_entry(conn, entry.id).await? {
        let mut draft = LineDraft {
            entry_id: 0,
            name: line.name,
            account_id: line.account_id,
            debit: line.credit,
            credit: line.debit,
            quantity: line.quantity,
            price_unit: line.price_unit,
            partner_id: line.partner_id,
            analytic_account_id: line.analytic_account_id,
            asset_profile_id: line.asset_profile_id,
            asset_id: line.asset_id,
        };
        if !move_type.is_sale_document() {
            if let Some(asset_id) = line.asset_id {
                delete_assets(conn, &[asset_id]).await?;
            }
            draft.asset_profile_id = None;
            draft.asset_id = None;
        }
        lines.push(draft);
    }

    Ok(ReversalDraft {
        entry: header,
        lines,
        cancel,
    })
}

/// Creates the reversals of posted entries; with `cancel` they are posted immediately.
#[instrument(skip(db))]
pub async fn reverse_entries(
    db: &DatabaseConnection,
    entry_ids: &[i64],
    defaults: &ReversalDefaults,
    cancel: bool,
) -> Result<Vec<journal_entry::Model>> {
    let txn = db.begin().await?;
    let mut reversals = Vec::with_capacity(entry_ids.len());

    for &entry_id in entry_ids {
        let entry = require_entry(&txn, entry_id).await?;
        if entry.state != EntryState::Posted {
            return Err(Error::InvalidState {
                entry_id,
                state: entry.state.to_string(),
                action: "reverse",
            });
        }

        let draft = build_reversal(&txn, &entry, defaults, cancel).await?;
        let reversal = create_entry(&txn, draft.entry).await?;
        let lines = draft
            .lines
            .into_iter()
            .map(|line| LineDraft {
                entry_id: reversal.id,
                ..line
            })
            .collect();
        create_lines_in(&txn, lines, &Capabilities::none()).await?;

        if draft.cancel {
            post_entry_in(&txn, reversal.id, &Capabilities::none()).await?;
        }
        info!("Entry {} reversed by {}", entry_id, reversal.id);
        reversals.push(require_entry(&txn, reversal.id).await?);
    }

    txn.commit().await?;
    Ok(reversals)
}
