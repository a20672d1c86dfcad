//! Asset profile and account configuration loading from config.toml
//!
//! Profiles and fixed-asset accounts listed in config.toml are seeded into the
//! database at startup. Seeding skips records whose name (profiles) or code
//! (accounts) already exists, so running it repeatedly is harmless.

use crate::{
    entities::{Account, AssetProfile, account, asset_profile},
    errors::{Error, Result},
};
use sea_orm::{Set, TransactionTrait, prelude::*};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Asset profiles to seed
    #[serde(default)]
    pub profiles: Vec<ProfileConfig>,
    /// Accounts to seed
    #[serde(default)]
    pub accounts: Vec<AccountConfig>,
}

/// Configuration for a single asset profile
#[derive(Debug, Deserialize, Clone)]
pub struct ProfileConfig {
    /// Unique profile name
    pub name: String,
    /// Depreciation method
    #[serde(default = "default_method")]
    pub method: String,
    /// Number of depreciation periods
    pub method_number: i32,
    /// Months per period
    #[serde(default = "default_method_period")]
    pub method_period: i32,
    /// Track each purchased unit as its own asset
    #[serde(default)]
    pub asset_product_item: bool,
}

/// Configuration for a single account
#[derive(Debug, Deserialize, Clone)]
pub struct AccountConfig {
    /// Unique account code
    pub code: String,
    /// Account name
    pub name: String,
    /// Name of the default asset profile, if any
    #[serde(default)]
    pub asset_profile: Option<String>,
}

fn default_method() -> String {
    "linear".to_string()
}

const fn default_method_period() -> i32 {
    12
}

/// Loads the seed configuration from a TOML file.
///
/// # Errors
/// Returns an error if the file cannot be read or the TOML is invalid.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Path of the seed file, from `ASSET_LEDGER_CONFIG` or `config.toml`.
#[must_use]
pub fn config_path() -> String {
    std::env::var("ASSET_LEDGER_CONFIG").unwrap_or_else(|_| "config.toml".to_string())
}

/// Inserts the configured profiles and accounts that are not in the database yet.
///
/// Accounts reference profiles by name; an unknown profile name is a configuration error
/// and nothing from the file is kept.
pub async fn seed_from_config(db: &DatabaseConnection, config: &Config) -> Result<()> {
    let txn = db.begin().await?;

    for profile in &config.profiles {
        let existing = AssetProfile::find()
            .filter(asset_profile::Column::Name.eq(&profile.name))
            .one(&txn)
            .await?;
        if existing.is_some() {
            debug!("Asset profile '{}' already present", profile.name);
            continue;
        }
        asset_profile::ActiveModel {
            name: Set(profile.name.clone()),
            method: Set(profile.method.clone()),
            method_number: Set(profile.method_number),
            method_period: Set(profile.method_period),
            asset_product_item: Set(profile.asset_product_item),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        info!("Seeded asset profile '{}'", profile.name);
    }

    for acc in &config.accounts {
        let existing = Account::find()
            .filter(account::Column::Code.eq(&acc.code))
            .one(&txn)
            .await?;
        if existing.is_some() {
            debug!("Account '{}' already present", acc.code);
            continue;
        }
        let asset_profile_id = match &acc.asset_profile {
            Some(name) => Some(
                AssetProfile::find()
                    .filter(asset_profile::Column::Name.eq(name))
                    .one(&txn)
                    .await?
                    .ok_or_else(|| Error::Config {
                        message: format!(
                            "Account '{}' references unknown asset profile '{name}'",
                            acc.code
                        ),
                    })?
                    .id,
            ),
            None => None,
        };
        account::ActiveModel {
            code: Set(acc.code.clone()),
            name: Set(acc.name.clone()),
            asset_profile_id: Set(asset_profile_id),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        info!("Seeded account '{}'", acc.code);
    }

    txn.commit().await?;
    Ok(())
}
