use std::collections::HashMap;

use serde::Deserialize;

use crate::provider::{decode, ParseError};

const COINS_ID_URL: &str = "https://api.coingecko.com/api/v3/coins/TICKER?localization=false&tickers=false&market_data=true&community_data=false&developer_data=false&sparkline=false";

pub(crate) fn url_template() -> String {
    COINS_ID_URL.to_string()
}

/// Reads `market_data.current_price.<quote>` with the quote code lower-cased.
pub fn parse_coins_id(raw: &str, quote_ticker: &str) -> Result<f64, ParseError> {
    let response: CoinsIdResponse = decode(raw)?;

    let quote = quote_ticker.to_lowercase();
    response
        .market_data
        .current_price
        .get(&quote)
        .copied()
        .flatten()
        .ok_or(ParseError::MissingPrice(quote))
}

#[derive(Debug, Deserialize)]
struct CoinsIdResponse {
    market_data: CoinsIdResponseMarketData,
}

#[derive(Debug, Deserialize)]
struct CoinsIdResponseMarketData {
    // Keyed by lower-case currency code
    current_price: HashMap<String, Option<f64>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_read_quote_price_lower_cased() {
        let raw = r#"{"id":"bitcoin","market_data":{"current_price":{"usd":42000.5,"eur":39000.1}}}"#;

        assert_eq!(parse_coins_id(raw, "USD").unwrap(), 42000.5);
    }

    #[test]
    fn test_missing_quote_currency() {
        let raw = r#"{"market_data":{"current_price":{"eur":39000.1}}}"#;

        assert!(matches!(parse_coins_id(raw, "USD"), Err(ParseError::MissingPrice(q)) if q == "usd"));
    }

    #[test]
    fn test_null_price_is_missing() {
        let raw = r#"{"market_data":{"current_price":{"usd":null}}}"#;

        assert!(matches!(parse_coins_id(raw, "USD"), Err(ParseError::MissingPrice(_))));
    }

    #[test]
    fn test_unknown_coin_error_body() {
        let raw = r#"{"error":"coin not found"}"#;

        assert!(matches!(parse_coins_id(raw, "USD"), Err(ParseError::DeserialisationError(..))));
    }
}
