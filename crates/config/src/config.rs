use std::collections::HashMap;
use std::ops::Deref;

use derive_more::{Display, From, Into};
use log::warn;
use serde::Deserialize;
use serde_valid::yaml::FromYamlStr;
use serde_valid::{UniqueItemsError, Validate, ValidateUniqueItems};

// Config Type
#[derive(Debug, Clone)]
pub struct OracleConfig {
    // All tracked assets keyed by their internal symbol.
    pub assets: HashMap<String, AssetConfig>,
}

impl OracleConfig {
    pub fn from_file(file_path: &str) -> Result<Self, ConfigError> {
        let config_file_content = std::fs::read_to_string(file_path)?;
        Self::from_yaml_str(&config_file_content)
    }

    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let raw_config = RawConfig::from_yaml_str(s)?;

        let mut assets = HashMap::new();
        for asset in raw_config.assets.0 {
            if let Err(e) = asset.validate() {
                return Err(ConfigError::InvalidAsset(asset.symbol.clone(), e.to_string()));
            }
            if asset.asset_type == AssetType::Unsupported {
                warn!("Asset {} has an unsupported type, it will never be priced", asset.symbol);
            }
            assets.insert(asset.symbol.clone(), asset);
        }

        Ok(OracleConfig { assets })
    }
}

#[derive(Debug, From, Display)]
pub enum ConfigError {
    #[display("Invalid asset {}: {}", _0, _1)]
    #[from(ignore)]
    InvalidAsset(String, String),

    #[display("Serde Error: {}", _0)]
    SerdeError(serde_valid::Error<serde_yaml::Error>),

    #[display("Error Reading Config File: {}", _0)]
    IoError(std::io::Error),
}

// Intermediate Config Type as Deserialization Target
#[derive(Debug, Deserialize, From, Into)]
pub struct AssetConfigs(Vec<AssetConfig>);

impl ValidateUniqueItems for AssetConfigs {
    fn validate_unique_items(&self) -> Result<(), UniqueItemsError> {
        self.iter().map(|a| a.symbol.clone()).collect::<Vec<_>>().validate_unique_items()
    }
}

impl Deref for AssetConfigs {
    type Target = Vec<AssetConfig>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct RawConfig {
    #[validate(unique_items)]
    pub assets: AssetConfigs,
}

/// Which upstream provider prices an asset.
#[derive(Debug, Deserialize, Display, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AssetType {
    #[display("stock")]
    Stock,
    #[display("forex")]
    Forex,
    #[display("crypto")]
    Crypto,
    // Anything else found in the config file
    #[serde(other)]
    #[display("unsupported")]
    Unsupported,
}

#[derive(Debug, Deserialize, Validate, Clone)]
pub struct AssetConfig {
    // The internal asset symbol callers query with
    #[validate(min_length = 1)]
    pub symbol: String,
    // Selects the provider
    #[serde(rename = "type")]
    pub asset_type: AssetType,
    // The provider specific symbol, e.g. a coingecko coin id
    #[validate(min_length = 1)]
    pub ticker: String,
}

pub fn get_sample_config() -> OracleConfig {
    OracleConfig::from_file("../../config.yaml.example").unwrap()
}
