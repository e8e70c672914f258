use serde::Deserialize;

use crate::provider::{decode, ParseError};

const AGGS_TICKER_URL: &str = "https://api.polygon.io/v2/aggs/ticker";

pub(crate) fn url_template(api_key: &str) -> String {
    format!("{}/TICKER/prev?unadjusted=true&apiKey={}", AGGS_TICKER_URL, api_key)
}

/// Volume weighted average price of the most recent bar.
pub fn parse_previous_close(raw: &str) -> Result<f64, ParseError> {
    let response: AggsResponse = decode(raw)?;

    let bar = response.results.first().ok_or(ParseError::EmptyResults)?;
    match &bar.vw {
        Some(NumberOrString::Number(vw)) => Ok(*vw),
        Some(NumberOrString::Text(vw)) => {
            vw.trim().parse::<f64>().map_err(|_| ParseError::InvalidNumber(vw.clone()))
        }
        None => Err(ParseError::MissingVolumeWeightedPrice),
    }
}

#[derive(Debug, Deserialize)]
struct AggsResponse {
    #[serde(default)]
    results: Vec<AggregateBar>,
}

#[derive(Debug, Deserialize)]
struct AggregateBar {
    vw: Option<NumberOrString>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    Text(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_read_numeric_vw() {
        let raw = r#"{"ticker":"AAPL","status":"OK","results":[{"T":"AAPL","vw":189.3712,"o":188.1,"c":190.2}]}"#;

        assert_eq!(parse_previous_close(raw).unwrap(), 189.3712);
    }

    #[test]
    fn test_should_coerce_string_vw() {
        let raw = r#"{"results":[{"vw":"123.45"}]}"#;

        assert_eq!(parse_previous_close(raw).unwrap(), 123.45);
    }

    #[test]
    fn test_takes_first_bar() {
        let raw = r#"{"results":[{"vw":10.5},{"vw":99.0}]}"#;

        assert_eq!(parse_previous_close(raw).unwrap(), 10.5);
    }

    #[test]
    fn test_empty_results() {
        assert!(matches!(
            parse_previous_close(r#"{"status":"OK","results":[]}"#),
            Err(ParseError::EmptyResults)
        ));
        assert!(matches!(
            parse_previous_close(r#"{"status":"NOT_AUTHORIZED"}"#),
            Err(ParseError::EmptyResults)
        ));
    }

    #[test]
    fn test_missing_vw() {
        assert!(matches!(
            parse_previous_close(r#"{"results":[{"o":1.0}]}"#),
            Err(ParseError::MissingVolumeWeightedPrice)
        ));
    }

    #[test]
    fn test_non_numeric_string_vw() {
        assert!(matches!(
            parse_previous_close(r#"{"results":[{"vw":"n/a"}]}"#),
            Err(ParseError::InvalidNumber(vw)) if vw == "n/a"
        ));
    }
}
