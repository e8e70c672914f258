use std::env;

pub const QUOTE_TICKER_ENV: &str = "FEE_QUOTE_TICKER";
pub const FIXER_API_KEY_ENV: &str = "FIXER_API_KEY";
pub const POLYGON_API_KEY_ENV: &str = "POLYGON_API_KEY";

/// Values read from the environment once at startup.
///
/// Nothing here is validated: an empty key only shows up later as a failed
/// provider request.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    // Currency every price is expressed in, e.g. USD
    pub quote_ticker: String,
    // Fixer (forex) access key
    pub fixer_api_key: String,
    // Polygon (stock) api key
    pub polygon_api_key: String,
}

impl Credentials {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Credentials {
            quote_ticker: lookup(QUOTE_TICKER_ENV).unwrap_or_default(),
            fixer_api_key: lookup(FIXER_API_KEY_ENV).unwrap_or_default(),
            polygon_api_key: lookup(POLYGON_API_KEY_ENV).unwrap_or_default(),
        }
    }
}
