//! # Exchange Rate Lookup Module
//!
//! Fetches a conversion rate from the Frankfurter API, which serves the
//! ECB reference rates. A failed lookup propagates to the caller; the
//! dollar conversion is required to fail loudly instead of degrading.

use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::collections::HashMap;
use tracing::debug;

const EXCHANGE_RATE_URL: &str = "https://api.frankfurter.app/latest";

#[derive(Debug, Deserialize)]
struct RateResponse {
    rates: HashMap<String, f64>,
}

/// Fetch the current `from` → `to` conversion rate
pub async fn fetch_exchange_rate(client: &reqwest::Client, from: &str, to: &str) -> Result<f64> {
    let url = format!("{}?from={}&to={}", EXCHANGE_RATE_URL, from, to);
    let response: RateResponse = client
        .get(&url)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    let rate = response
        .rates
        .get(to)
        .copied()
        .ok_or_else(|| anyhow!("no {} rate in exchange rate response", to))?;
    debug!(from, to, rate, "Fetched exchange rate");

    Ok(rate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_response_deserializes() {
        let body = r#"{"amount":1.0,"base":"USD","date":"2024-01-02","rates":{"EUR":0.9206}}"#;
        let response: RateResponse = serde_json::from_str(body).unwrap();

        assert_eq!(response.rates.get("EUR").copied(), Some(0.9206));
    }
}
