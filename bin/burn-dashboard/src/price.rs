//! USD price feed for the burned token.

use std::time::{Duration, Instant};

use alloy::primitives::Address;
use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::{constants::price::REQUEST_TIMEOUT_SECS, error::PriceError, telemetry::error_field};

/// Anything that can quote a USD price for one whole token.
#[async_trait]
pub trait PriceSource: Send + Sync {
    async fn fetch_price(&self) -> Result<f64, PriceError>;
}

#[derive(Debug, Deserialize)]
struct TokenPairs {
    #[serde(default)]
    pairs: Option<Vec<Pair>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Pair {
    #[serde(default)]
    price_usd: Option<String>,
}

/// DexScreener-style lookup: `GET {endpoint}/{token}` returning trading pairs
/// with a string-encoded `priceUsd`. The first pair is taken as the quote.
pub struct DexPriceSource {
    client: reqwest::Client,
    url: Url,
}

impl DexPriceSource {
    pub fn new(endpoint: &Url, token: Address) -> eyre::Result<Self> {
        let url = endpoint.join(&format!(
            "{}/{token}",
            endpoint.path().trim_end_matches('/')
        ))?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self { client, url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl PriceSource for DexPriceSource {
    #[instrument(name = "price::fetch", skip(self), fields(url = %self.url))]
    async fn fetch_price(&self) -> Result<f64, PriceError> {
        let body = self
            .client
            .get(self.url.clone())
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        parse_price(&body)
    }
}

/// Extracts the first pair's USD price from a lookup response body.
pub fn parse_price(body: &str) -> Result<f64, PriceError> {
    let response: TokenPairs =
        serde_json::from_str(body).map_err(|_| PriceError::InvalidPrice(truncate(body)))?;
    let first = response
        .pairs
        .and_then(|pairs| pairs.into_iter().next())
        .ok_or(PriceError::NoPairs)?;
    let raw = first.price_usd.ok_or(PriceError::MissingPrice)?;
    match raw.trim().parse::<f64>() {
        Ok(price) if price.is_finite() && price >= 0.0 => Ok(price),
        _ => Err(PriceError::InvalidPrice(raw)),
    }
}

fn truncate(body: &str) -> String {
    body.chars().take(64).collect()
}

/// Last known price plus the time it was fetched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceSample {
    pub usd: f64,
    pub fetched_at: Instant,
}

/// Holds the latest price. Failed fetches are logged and leave it untouched.
pub struct PricePoller<S> {
    source: S,
    latest: Option<PriceSample>,
}

impl<S: PriceSource> PricePoller<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            latest: None,
        }
    }

    pub fn latest(&self) -> Option<PriceSample> {
        self.latest
    }

    pub fn usd(&self) -> Option<f64> {
        self.latest.map(|sample| sample.usd)
    }

    /// Fetches once. Returns whether the held price was updated.
    pub async fn poll(&mut self) -> bool {
        match self.source.fetch_price().await {
            Ok(usd) => {
                debug!(usd, "price updated");
                metrics::gauge!("burn_dashboard_price_usd").set(usd);
                self.latest = Some(PriceSample {
                    usd,
                    fetched_at: Instant::now(),
                });
                true
            }
            Err(e) => {
                metrics::counter!("burn_dashboard_errors", "request" => "price").increment(1);
                warn!(error = error_field(&e), "failed to fetch token price, keeping last value");
                false
            }
        }
    }
}
