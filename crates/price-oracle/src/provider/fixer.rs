use std::collections::HashMap;

use serde::Deserialize;

use crate::provider::{decode, ParseError};

const LATEST_URL: &str = "http://data.fixer.io/api/latest";

pub(crate) fn url_template(access_key: &str, quote_ticker: &str) -> String {
    format!("{}?access_key={}&symbols=TICKER,{}", LATEST_URL, access_key, quote_ticker)
}

/// Fixer quotes every rate against EUR, so the asset price in the quote
/// currency is `EUR/quote / EUR/asset`.
pub fn parse_latest_rates(raw: &str, ticker: &str, quote_ticker: &str) -> Result<f64, ParseError> {
    let response: LatestResponse = decode(raw)?;

    let rates = match (response.rates, response.error) {
        (Some(rates), _) => rates,
        (None, Some(error)) => return Err(ParseError::ProviderRejected(error.detail())),
        (None, None) => return Err(ParseError::MissingRate(quote_ticker.to_string())),
    };

    let rate = |code: &str| {
        rates.get(code).copied().flatten().ok_or_else(|| ParseError::MissingRate(code.to_string()))
    };

    let quote_rate = rate(quote_ticker)?;
    let asset_rate = rate(ticker)?;

    Ok(quote_rate / asset_rate)
}

#[derive(Debug, Deserialize)]
struct LatestResponse {
    rates: Option<HashMap<String, Option<f64>>>,
    error: Option<LatestResponseError>,
}

#[derive(Debug, Deserialize)]
struct LatestResponseError {
    code: u32,
    #[serde(rename = "type")]
    kind: Option<String>,
    info: Option<String>,
}

impl LatestResponseError {
    fn detail(&self) -> String {
        let message = self.info.as_deref().or(self.kind.as_deref()).unwrap_or("no detail");
        format!("{} ({})", self.code, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_cross_rates_through_eur() {
        let raw = r#"{"success":true,"base":"EUR","rates":{"USD":1.1,"GBP":0.8}}"#;

        assert_eq!(parse_latest_rates(raw, "GBP", "USD").unwrap(), 1.1 / 0.8);
    }

    #[test]
    fn test_missing_quote_rate() {
        let raw = r#"{"rates":{"GBP":0.8}}"#;

        assert!(matches!(
            parse_latest_rates(raw, "GBP", "USD"),
            Err(ParseError::MissingRate(code)) if code == "USD"
        ));
    }

    #[test]
    fn test_null_asset_rate() {
        let raw = r#"{"rates":{"USD":1.1,"GBP":null}}"#;

        assert!(matches!(
            parse_latest_rates(raw, "GBP", "USD"),
            Err(ParseError::MissingRate(code)) if code == "GBP"
        ));
    }

    #[test]
    fn test_non_numeric_rate() {
        let raw = r#"{"rates":{"USD":"1.1","GBP":0.8}}"#;

        assert!(matches!(
            parse_latest_rates(raw, "GBP", "USD"),
            Err(ParseError::DeserialisationError(..))
        ));
    }

    #[test]
    fn test_provider_error_body() {
        let raw = r#"{"success":false,"error":{"code":101,"type":"invalid_access_key","info":"You have not supplied a valid API Access Key."}}"#;

        match parse_latest_rates(raw, "GBP", "USD") {
            Err(ParseError::ProviderRejected(detail)) => {
                assert_eq!(detail, "101 (You have not supplied a valid API Access Key.)")
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
