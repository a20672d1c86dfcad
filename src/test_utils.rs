//! Shared test utilities for the asset ledger.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test records with sensible defaults.

use crate::{
    core::{
        asset::{NewAsset, create_asset},
        capability::Capabilities,
        entry::{EntryDraft, create_entry, post_entries},
        entry_line::{LineDraft, create_lines},
    },
    entities::{EntryLine, MoveType, account, asset, asset_profile, entry_line, journal_entry},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{DatabaseConnection, EntityTrait, Set, prelude::*};

/// Partner used on test bills.
pub const TEST_PARTNER: i64 = 77;

/// Accounting date used by test entries.
pub fn test_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, 15).unwrap_or_default()
}

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a linear 5-year profile.
pub async fn create_test_profile(
    db: &DatabaseConnection,
    name: &str,
    asset_product_item: bool,
) -> Result<asset_profile::Model> {
    asset_profile::ActiveModel {
        name: Set(name.to_string()),
        method: Set("linear".to_string()),
        method_number: Set(5),
        method_period: Set(12),
        asset_product_item: Set(asset_product_item),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Creates an account named `"Account <code>"`.
pub async fn create_test_account(
    db: &DatabaseConnection,
    code: &str,
    asset_profile_id: Option<i64>,
) -> Result<account::Model> {
    account::ActiveModel {
        code: Set(code.to_string()),
        name: Set(format!("Account {code}")),
        asset_profile_id: Set(asset_profile_id),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Creates a draft entry in journal 1 dated [`test_date`].
pub async fn create_test_entry(
    db: &DatabaseConnection,
    move_type: MoveType,
) -> Result<journal_entry::Model> {
    create_entry(
        db,
        EntryDraft {
            name: "BILL/2026/0001".to_string(),
            reference: None,
            journal_id: 1,
            date: test_date(),
            move_type,
            company_id: None,
            reversed_entry_id: None,
        },
    )
    .await
}

/// Creates a single line without profile or asset.
pub async fn create_test_line(
    db: &DatabaseConnection,
    entry_id: i64,
    account_id: i64,
    name: &str,
    debit: f64,
    credit: f64,
) -> Result<entry_line::Model> {
    create_lines(
        db,
        vec![LineDraft {
            entry_id,
            name: name.to_string(),
            account_id,
            debit,
            credit,
            price_unit: debit.max(credit),
            ..LineDraft::default()
        }],
        &Capabilities::none(),
    )
    .await?
    .into_iter()
    .next()
    .ok_or(Error::NotFound {
        entity: "entry line",
        id: entry_id,
    })
}

/// Creates an asset that does not originate from any line.
pub async fn create_test_asset(
    db: &DatabaseConnection,
    profile_id: i64,
    purchase_value: f64,
) -> Result<asset::Model> {
    create_asset(
        db,
        NewAsset {
            name: "Test asset".to_string(),
            code: None,
            profile_id,
            purchase_value,
            partner_id: None,
            date_start: test_date(),
            account_analytic_id: None,
            company_id: None,
        },
    )
    .await
}

/// A vendor bill buying one laptop for 1500.
pub struct BillFixture {
    /// The bill
    pub entry: journal_entry::Model,
    /// Profile of the laptop line
    pub profile: asset_profile::Model,
    /// Asset account
    pub equipment: account::Model,
    /// Supplier account
    pub payable: account::Model,
    /// The profiled line, re-read after posting
    pub asset_line: entry_line::Model,
    /// Assets created by posting; empty for a draft bill
    pub assets: Vec<asset::Model>,
}

/// Sets up a balanced draft bill with one profiled line.
pub async fn setup_draft_bill(db: &DatabaseConnection) -> Result<BillFixture> {
    let profile = create_test_profile(db, "Laptops", false).await?;
    let equipment = create_test_account(db, "2400", Some(profile.id)).await?;
    let payable = create_test_account(db, "4400", None).await?;
    let entry = create_test_entry(db, MoveType::InInvoice).await?;

    let lines = create_lines(
        db,
        vec![
            LineDraft {
                entry_id: entry.id,
                name: "Laptop".to_string(),
                account_id: equipment.id,
                debit: 1500.0,
                price_unit: 1500.0,
                partner_id: Some(TEST_PARTNER),
                asset_profile_id: Some(profile.id),
                ..LineDraft::default()
            },
            LineDraft {
                entry_id: entry.id,
                name: "Supplier".to_string(),
                account_id: payable.id,
                credit: 1500.0,
                partner_id: Some(TEST_PARTNER),
                ..LineDraft::default()
            },
        ],
        &Capabilities::none(),
    )
    .await?;
    let asset_line = lines.into_iter().next().ok_or(Error::NotFound {
        entity: "entry line",
        id: entry.id,
    })?;

    Ok(BillFixture {
        entry,
        profile,
        equipment,
        payable,
        asset_line,
        assets: Vec::new(),
    })
}

/// Sets up the bill of [`setup_draft_bill`] and posts it.
pub async fn setup_posted_bill(db: &DatabaseConnection) -> Result<BillFixture> {
    let mut fixture = setup_draft_bill(db).await?;
    fixture.assets = post_entries(db, &[fixture.entry.id], &Capabilities::none()).await?;
    fixture.asset_line = EntryLine::find_by_id(fixture.asset_line.id)
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "entry line",
            id: fixture.asset_line.id,
        })?;
    Ok(fixture)
}
