//! Asset business logic - creation from posted lines, deletion, and stored values.
//!
//! Asset values are stored columns. Every operation that changes what they
//! derive from calls [`recompute_asset_values`] explicitly.

use crate::{
    core::{
        capability::Capabilities,
        changes::LineChanges,
        depreciation::get_lines_for_asset,
        entry_line::modify_lines_in,
    },
    entities::{Asset, DepreciationLine, EntryLine, LineType, asset, depreciation_line, entry_line},
    errors::{Denial, Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{IntoActiveModel, QueryOrder, Set, prelude::*};
use tracing::{info, warn};

/// Values for a new asset.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAsset {
    /// Display name
    pub name: String,
    /// Reference code
    pub code: Option<String>,
    /// Asset profile
    pub profile_id: i64,
    /// Depreciation base taken from the line
    pub purchase_value: f64,
    /// Supplier
    pub partner_id: Option<i64>,
    /// Start of depreciation
    pub date_start: NaiveDate,
    /// Analytic account
    pub account_analytic_id: Option<i64>,
    /// Owning company
    pub company_id: Option<i64>,
}

/// Derives the purchase value of an asset from the line it is created from.
///
/// Debit-side lines use the debit; credit-side lines use the credit with its
/// sign flipped, so both yield the same positive value for the same amount.
///
/// # Errors
/// Returns [`Error::AmbiguousDepreciationBase`] when both debit and credit are non-zero.
pub fn depreciation_base(line: &entry_line::Model) -> Result<f64> {
    if line.debit != 0.0 && line.credit != 0.0 {
        return Err(Error::AmbiguousDepreciationBase {
            line_id: line.id,
            debit: line.debit,
            credit: line.credit,
        });
    }
    let signed = if line.debit != 0.0 {
        line.debit
    } else {
        -line.credit
    };
    Ok(signed.abs())
}

/// Inserts an asset with its value fields initialised.
pub async fn create_asset<C>(conn: &C, new: NewAsset) -> Result<asset::Model>
where
    C: ConnectionTrait,
{
    let salvage_value = 0.0;
    let depreciation_base = new.purchase_value - salvage_value;
    let asset = asset::ActiveModel {
        name: Set(new.name),
        code: Set(new.code),
        profile_id: Set(new.profile_id),
        purchase_value: Set(new.purchase_value),
        salvage_value: Set(salvage_value),
        depreciation_base: Set(depreciation_base),
        value_depreciated: Set(0.0),
        value_residual: Set(depreciation_base),
        partner_id: Set(new.partner_id),
        date_start: Set(new.date_start),
        account_analytic_id: Set(new.account_analytic_id),
        company_id: Set(new.company_id),
        ..Default::default()
    }
    .insert(conn)
    .await?;

    info!(
        "Created asset {} '{}' with purchase value {}",
        asset.id, asset.name, asset.purchase_value
    );
    Ok(asset)
}

/// Finds an asset by its unique ID.
pub async fn get_asset_by_id<C>(conn: &C, asset_id: i64) -> Result<Option<asset::Model>>
where
    C: ConnectionTrait,
{
    Asset::find_by_id(asset_id).one(conn).await.map_err(Into::into)
}

/// Retrieves all assets in creation order.
pub async fn get_all_assets<C>(conn: &C) -> Result<Vec<asset::Model>>
where
    C: ConnectionTrait,
{
    Asset::find()
        .order_by_asc(asset::Column::Id)
        .all(conn)
        .await
        .map_err(Into::into)
}

/// Refreshes `value_depreciated` and `value_residual` of the given assets.
///
/// Only depreciate-type lines that are posted through an entry count as depreciated.
pub async fn recompute_asset_values<C>(conn: &C, asset_ids: &[i64]) -> Result<()>
where
    C: ConnectionTrait,
{
    for &asset_id in asset_ids {
        let Some(asset) = Asset::find_by_id(asset_id).one(conn).await? else {
            continue;
        };
        let value_depreciated: f64 = get_lines_for_asset(conn, asset_id)
            .await?
            .iter()
            .filter(|line| line.line_type == LineType::Depreciate && line.move_check)
            .map(|line| line.amount)
            .sum();
        let depreciation_base = asset.purchase_value - asset.salvage_value;

        let mut active = asset.into_active_model();
        active.depreciation_base = Set(depreciation_base);
        active.value_depreciated = Set(value_depreciated);
        active.value_residual = Set(depreciation_base - value_depreciated);
        active.update(conn).await?;
    }
    Ok(())
}

/// Deletes assets together with their depreciation lines.
///
/// Lines still linked to an asset are released first through the guarded
/// removal path, which only clears `asset_id`.
///
/// # Errors
/// Returns [`Denial::PostedDepreciation`] if an asset has a depreciate-type line
/// that is still posted through an entry.
pub async fn delete_assets<C>(conn: &C, asset_ids: &[i64]) -> Result<()>
where
    C: ConnectionTrait,
{
    if asset_ids.is_empty() {
        return Ok(());
    }

    let posted = DepreciationLine::find()
        .filter(depreciation_line::Column::AssetId.is_in(asset_ids.iter().copied()))
        .filter(depreciation_line::Column::LineType.eq(LineType::Depreciate))
        .filter(depreciation_line::Column::MoveCheck.eq(true))
        .count(conn)
        .await?;
    if posted > 0 {
        warn!("Refusing to delete assets {:?} with posted depreciation", asset_ids);
        return Err(Error::permission(Denial::PostedDepreciation));
    }

    let linked_line_ids: Vec<i64> = EntryLine::find()
        .filter(entry_line::Column::AssetId.is_in(asset_ids.iter().copied()))
        .order_by_asc(entry_line::Column::Id)
        .all(conn)
        .await?
        .into_iter()
        .map(|line| line.id)
        .collect();
    if !linked_line_ids.is_empty() {
        modify_lines_in(
            conn,
            &linked_line_ids,
            &LineChanges::clear_asset(),
            &Capabilities::none().with_asset_removal(),
        )
        .await?;
    }

    DepreciationLine::delete_many()
        .filter(depreciation_line::Column::AssetId.is_in(asset_ids.iter().copied()))
        .exec(conn)
        .await?;
    Asset::delete_many()
        .filter(asset::Column::Id.is_in(asset_ids.iter().copied()))
        .exec(conn)
        .await?;

    info!("Deleted assets {:?}", asset_ids);
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::core::depreciation::create_depreciation_line;
    use crate::test_utils::*;

    fn line(debit: f64, credit: f64) -> entry_line::Model {
        entry_line::Model {
            id: 11,
            entry_id: 1,
            name: "Laptop".to_string(),
            account_id: 1,
            journal_id: 1,
            date: test_date(),
            debit,
            credit,
            quantity: 1.0,
            price_unit: debit.max(credit),
            price_subtotal: debit.max(credit),
            partner_id: None,
            analytic_account_id: None,
            asset_profile_id: Some(1),
            asset_id: None,
        }
    }

    #[test]
    fn test_depreciation_base_from_debit() {
        assert_eq!(depreciation_base(&line(100.0, 0.0)).unwrap(), 100.0);
    }

    #[test]
    fn test_depreciation_base_from_credit_is_sign_normalized() {
        assert_eq!(depreciation_base(&line(0.0, 100.0)).unwrap(), 100.0);
    }

    #[test]
    fn test_depreciation_base_rejects_both_sides() {
        let result = depreciation_base(&line(100.0, 40.0));
        assert!(matches!(
            result,
            Err(Error::AmbiguousDepreciationBase {
                line_id: 11,
                debit: 100.0,
                credit: 40.0
            })
        ));
    }

    #[tokio::test]
    async fn test_recompute_counts_only_posted_depreciation() -> Result<()> {
        let db = setup_test_db().await?;
        let profile = create_test_profile(&db, "Furniture", false).await?;
        let entry = create_test_entry(&db, crate::entities::MoveType::Entry).await?;
        let asset = create_test_asset(&db, profile.id, 1200.0).await?;

        create_depreciation_line(&db, asset.id, LineType::Depreciate, test_date(), 100.0, Some(entry.id))
            .await?;
        create_depreciation_line(&db, asset.id, LineType::Depreciate, test_date(), 100.0, None)
            .await?;

        let asset = get_asset_by_id(&db, asset.id).await?.unwrap();
        assert_eq!(asset.value_depreciated, 100.0);
        assert_eq!(asset.value_residual, 1100.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_asset_with_posted_depreciation_is_denied() -> Result<()> {
        let db = setup_test_db().await?;
        let profile = create_test_profile(&db, "Furniture", false).await?;
        let entry = create_test_entry(&db, crate::entities::MoveType::Entry).await?;
        let asset = create_test_asset(&db, profile.id, 500.0).await?;
        create_depreciation_line(&db, asset.id, LineType::Depreciate, test_date(), 50.0, Some(entry.id))
            .await?;

        let result = delete_assets(&db, &[asset.id]).await;
        assert_eq!(
            result.unwrap_err().denial(),
            Some(Denial::PostedDepreciation)
        );
        assert!(get_asset_by_id(&db, asset.id).await?.is_some());
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_asset_removes_unposted_board() -> Result<()> {
        let db = setup_test_db().await?;
        let profile = create_test_profile(&db, "Furniture", false).await?;
        let asset = create_test_asset(&db, profile.id, 500.0).await?;
        create_depreciation_line(&db, asset.id, LineType::Depreciate, test_date(), 50.0, None)
            .await?;

        delete_assets(&db, &[asset.id]).await?;

        assert!(get_asset_by_id(&db, asset.id).await?.is_none());
        assert_eq!(DepreciationLine::find().count(&db).await?, 0);
        Ok(())
    }
}
