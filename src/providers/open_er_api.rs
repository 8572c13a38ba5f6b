use async_trait::async_trait;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::Deserialize;
use std::collections::HashMap;
use std::str::FromStr;
use tracing::{debug, instrument, warn};

use crate::core::currency::{BASE_CURRENCY, RateError, RateSource, RateTable};

const SUCCESS: &str = "success";

/// Rate source backed by the open.er-api.com "latest" endpoint.
pub struct OpenErApiProvider {
    base_url: String,
    client: reqwest::Client,
}

impl OpenErApiProvider {
    pub fn new(base_url: &str) -> Result<Self, RateError> {
        let client = reqwest::Client::builder()
            .user_agent("ratebot/1.0")
            .build()
            .map_err(|e| RateError::Fetch(e.to_string()))?;

        Ok(OpenErApiProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn latest_url(&self) -> String {
        format!("{}/v6/latest/{}", self.base_url, BASE_CURRENCY)
    }
}

#[derive(Debug, Deserialize)]
struct LatestResponse {
    result: Option<String>,
    #[serde(default)]
    rates: HashMap<String, f64>,
}

// Goes through the shortest decimal form of the float so 0.024 stays 0.024.
fn to_decimal(rate: f64) -> Option<Decimal> {
    Decimal::from_str(&rate.to_string())
        .ok()
        .or_else(|| Decimal::from_f64(rate))
}

fn to_rate_table(rates: HashMap<String, f64>) -> RateTable {
    rates
        .into_iter()
        .filter_map(|(code, rate)| match to_decimal(rate) {
            Some(value) => Some((code, value)),
            None => {
                warn!(%code, rate, "Skipping unrepresentable rate");
                None
            }
        })
        .collect()
}

#[async_trait]
impl RateSource for OpenErApiProvider {
    #[instrument(name = "OpenErApiFetch", skip(self))]
    async fn fetch_rates(&self) -> Result<RateTable, RateError> {
        let url = self.latest_url();
        debug!("Requesting exchange rates from {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| RateError::Fetch(format!("Request error: {e}")))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| RateError::Fetch(format!("Failed to read response: {e}")))?;

        // Error statuses often still carry a JSON body with a failure marker.
        let data: LatestResponse = match serde_json::from_str(&text) {
            Ok(data) => data,
            Err(_) if !status.is_success() => {
                return Err(RateError::Fetch(format!("HTTP error: {status}")));
            }
            Err(e) => {
                return Err(RateError::Fetch(format!(
                    "Failed to parse JSON response: {e}"
                )));
            }
        };

        if data.result.as_deref() != Some(SUCCESS) {
            warn!(result = ?data.result, %status, "Rate provider reported failure");
            return Err(RateError::Provider);
        }

        if !status.is_success() {
            return Err(RateError::Fetch(format!("HTTP error: {status}")));
        }

        let table = to_rate_table(data.rates);
        debug!(count = table.len(), "Received exchange rates");
        Ok(table)
    }
}
