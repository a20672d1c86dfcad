//! Depreciation line operations used by the guards.
//!
//! Computing a full depreciation board is outside this crate; these functions
//! cover the parts the entry guard depends on: recording a line, finding the
//! lines that point at entries, and detaching them again.

use crate::{
    core::asset::recompute_asset_values,
    entities::{DepreciationLine, LineType, depreciation_line},
    errors::Result,
};
use chrono::NaiveDate;
use sea_orm::{IntoActiveModel, QueryOrder, Set, prelude::*};
use tracing::debug;

/// Records a depreciation line for `asset_id`, optionally already posted through `entry_id`.
///
/// The asset's stored values are refreshed afterwards.
pub async fn create_depreciation_line<C>(
    conn: &C,
    asset_id: i64,
    line_type: LineType,
    line_date: NaiveDate,
    amount: f64,
    entry_id: Option<i64>,
) -> Result<depreciation_line::Model>
where
    C: ConnectionTrait,
{
    let line = depreciation_line::ActiveModel {
        asset_id: Set(asset_id),
        entry_id: Set(entry_id),
        line_date: Set(line_date),
        line_type: Set(line_type),
        amount: Set(amount),
        move_check: Set(entry_id.is_some()),
        ..Default::default()
    }
    .insert(conn)
    .await?;

    recompute_asset_values(conn, &[asset_id]).await?;
    Ok(line)
}

/// Finds the depreciation lines of the given types that point at any of `entry_ids`.
pub async fn find_lines_for_entries<C>(
    conn: &C,
    entry_ids: &[i64],
    line_types: &[LineType],
) -> Result<Vec<depreciation_line::Model>>
where
    C: ConnectionTrait,
{
    DepreciationLine::find()
        .filter(depreciation_line::Column::EntryId.is_in(entry_ids.iter().copied()))
        .filter(depreciation_line::Column::LineType.is_in(line_types.iter().copied()))
        .order_by_asc(depreciation_line::Column::Id)
        .all(conn)
        .await
        .map_err(Into::into)
}

/// Retrieves all depreciation lines of an asset, oldest first.
pub async fn get_lines_for_asset<C>(
    conn: &C,
    asset_id: i64,
) -> Result<Vec<depreciation_line::Model>>
where
    C: ConnectionTrait,
{
    DepreciationLine::find()
        .filter(depreciation_line::Column::AssetId.eq(asset_id))
        .order_by_asc(depreciation_line::Column::LineDate)
        .order_by_asc(depreciation_line::Column::Id)
        .all(conn)
        .await
        .map_err(Into::into)
}

/// Clears the entry reference of `lines` and recomputes the affected assets.
pub async fn detach_from_entries<C>(conn: &C, lines: Vec<depreciation_line::Model>) -> Result<()>
where
    C: ConnectionTrait,
{
    let mut asset_ids: Vec<i64> = Vec::with_capacity(lines.len());
    for line in lines {
        debug!(
            "Detaching depreciation line {} of asset {} from entry {:?}",
            line.id, line.asset_id, line.entry_id
        );
        if !asset_ids.contains(&line.asset_id) {
            asset_ids.push(line.asset_id);
        }
        let mut active = line.into_active_model();
        active.entry_id = Set(None);
        active.move_check = Set(false);
        active.update(conn).await?;
    }

    recompute_asset_values(conn, &asset_ids).await
}
