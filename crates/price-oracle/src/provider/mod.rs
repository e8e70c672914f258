use std::collections::HashMap;

use serde::de::DeserializeOwned;
use thiserror::Error;

use config::{AssetType, Credentials};

pub mod coingecko;
pub mod fixer;
pub mod polygon;

/// Token substituted with the asset's provider ticker.
pub const TICKER_PLACEHOLDER: &str = "TICKER";

/// One URL template per priced asset type.
#[derive(Debug, Clone)]
pub struct ProviderUrlTemplates {
    templates: HashMap<AssetType, String>,
}

impl ProviderUrlTemplates {
    pub fn new(
        Credentials { quote_ticker, fixer_api_key, polygon_api_key }: &Credentials,
    ) -> Self {
        let templates = HashMap::from([
            (AssetType::Crypto, coingecko::url_template()),
            (AssetType::Forex, fixer::url_template(fixer_api_key, quote_ticker)),
            (AssetType::Stock, polygon::url_template(polygon_api_key)),
        ]);

        ProviderUrlTemplates { templates }
    }

    /// `None` when no provider serves this asset type.
    pub fn build_url(&self, asset_type: AssetType, ticker: &str) -> Option<String> {
        self.templates
            .get(&asset_type)
            .map(|template| template.replacen(TICKER_PLACEHOLDER, ticker, 1))
    }
}

/// Turn a raw provider body into a price quoted in `quote_ticker`.
pub fn parse_response(
    asset_type: AssetType,
    ticker: &str,
    quote_ticker: &str,
    raw: &str,
) -> Result<f64, ParseError> {
    let price = match asset_type {
        AssetType::Forex => fixer::parse_latest_rates(raw, ticker, quote_ticker)?,
        AssetType::Stock => polygon::parse_previous_close(raw)?,
        AssetType::Crypto => coingecko::parse_coins_id(raw, quote_ticker)?,
        AssetType::Unsupported => return Ok(0.0),
    };

    if !price.is_finite() {
        return Err(ParseError::NonFinite(price));
    }

    Ok(price)
}

fn decode<T: DeserializeOwned>(raw: &str) -> Result<T, ParseError> {
    serde_json::from_str(raw).map_err(|err| ParseError::DeserialisationError(raw.to_string(), err))
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Deserialization Error - Original String {0}, Error {1}")]
    DeserialisationError(String, serde_json::Error),

    #[error("Provider rejected the request: {0}")]
    ProviderRejected(String),

    #[error("Rate for {0} missing from response")]
    MissingRate(String),

    #[error("Price in {0} missing from response")]
    MissingPrice(String),

    #[error("Response contains no aggregate bars")]
    EmptyResults,

    #[error("Volume weighted average price missing from the first bar")]
    MissingVolumeWeightedPrice,

    #[error("Invalid number: {0}")]
    InvalidNumber(String),

    #[error("Computed price is not finite: {0}")]
    NonFinite(f64),
}
