//! Audit messages posted on journal entries.

use crate::{
    entities::{EntryMessage, asset, entry_message},
    errors::Result,
};
use sea_orm::{QueryOrder, Set, prelude::*};
use std::fmt;

/// Clickable reference to an asset inside a message body.
#[derive(Debug, Clone, Copy)]
pub struct AssetRef<'a>(pub &'a asset::Model);

impl fmt::Display for AssetRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<a href=# data-oe-model=account.asset data-oe-id={}>{}</a>",
            self.0.id, self.0.name
        )
    }
}

/// Body of the message announcing the assets created by posting an entry.
#[must_use]
pub fn asset_creation_body(assets: &[asset::Model]) -> String {
    let refs = assets
        .iter()
        .map(|asset| AssetRef(asset).to_string())
        .collect::<Vec<_>>()
        .join(", ");
    format!("This invoice created the asset(s): {refs}")
}

/// Posts `body` on the entry's message thread.
pub async fn post_message<C>(conn: &C, entry_id: i64, body: String) -> Result<entry_message::Model>
where
    C: ConnectionTrait,
{
    entry_message::ActiveModel {
        entry_id: Set(entry_id),
        body: Set(body),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(conn)
    .await
    .map_err(Into::into)
}

/// Retrieves the messages of an entry in posting order.
pub async fn get_messages_for_entry<C>(
    conn: &C,
    entry_id: i64,
) -> Result<Vec<entry_message::Model>>
where
    C: ConnectionTrait,
{
    EntryMessage::find()
        .filter(entry_message::Column::EntryId.eq(entry_id))
        .order_by_asc(entry_message::Column::Id)
        .all(conn)
        .await
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn asset(id: i64, name: &str) -> asset::Model {
        asset::Model {
            id,
            name: name.to_string(),
            code: Some("BILL/2026/0001".to_string()),
            profile_id: 1,
            purchase_value: 100.0,
            salvage_value: 0.0,
            depreciation_base: 100.0,
            value_depreciated: 0.0,
            value_residual: 100.0,
            partner_id: None,
            date_start: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap_or_default(),
            account_analytic_id: None,
            company_id: None,
        }
    }

    #[test]
    fn test_asset_ref_is_a_record_link() {
        let laptop = asset(7, "Laptop");
        assert_eq!(
            AssetRef(&laptop).to_string(),
            "<a href=# data-oe-model=account.asset data-oe-id=7>Laptop</a>"
        );
    }

    #[test]
    fn test_body_lists_every_asset() {
        let body = asset_creation_body(&[asset(1, "Desk 1"), asset(2, "Desk 2")]);
        assert!(body.starts_with("This invoice created the asset(s): "));
        assert!(body.contains("data-oe-id=1>Desk 1</a>, <a"));
        assert!(body.ends_with("data-oe-id=2>Desk 2</a>"));
    }
}
