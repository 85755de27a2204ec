//! Foreign-exchange rates: HTTP client and TTL cache.
//!
//! The upstream is a single GET returning `{ "rates": { CODE: rate, .. } }`
//! with USD-relative multipliers. Each cached entry is valid for the
//! configured TTL; a hit performs no network access at all. Concurrent
//! misses for the same currency are not coalesced; each caller fetches its
//! own copy of the table (see DESIGN.md).

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use reqwest::Client;
use serde::Deserialize;

/// Default FX endpoint (USD base).
pub const DEFAULT_FX_URL: &str = "https://api.exchangerate-api.com/v4/latest/USD";

/// Errors from the FX layer.
#[derive(Debug, thiserror::Error)]
pub enum FxError {
    /// Transport failure, timeout, or an undecodable payload.
    #[error("fx request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status.
    #[error("fx endpoint returned status {status}")]
    Status {
        /// HTTP status code.
        status: u16,
    },

    /// The fetched rate table has no entry for the requested code.
    #[error("no rate for currency: {0}")]
    UnknownCurrency(String),
}

#[derive(Debug, Deserialize)]
struct RateTable {
    rates: HashMap<String, f64>,
}

/// HTTP client for the FX endpoint.
#[derive(Debug, Clone)]
pub struct FxClient {
    client: Client,
    url: String,
}

impl FxClient {
    /// Create a new FX client with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, FxError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    /// Fetch the full rate table from the endpoint.
    ///
    /// # Errors
    ///
    /// Any transport error, non-success status, or undecodable body is an
    /// upstream failure; there is no retry here.
    pub async fn fetch_rates(&self) -> Result<HashMap<String, f64>, FxError> {
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FxError::Status {
                status: status.as_u16(),
            });
        }

        let table: RateTable = response.json().await?;
        Ok(table.rates)
    }
}

struct CachedRate {
    rate: f64,
    fetched_at: Instant,
}

/// TTL-bounded cache of per-currency exchange rates.
pub struct RateCache {
    client: FxClient,
    ttl: Duration,
    entries: RwLock<HashMap<String, CachedRate>>,
}

impl RateCache {
    /// Create a cache over an FX client.
    #[must_use]
    pub fn new(client: FxClient, ttl: Duration) -> Self {
        Self {
            client,
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// The USD→`code` rate, from cache when fresh, otherwise fetched.
    ///
    /// # Errors
    ///
    /// [`FxError::UnknownCurrency`] when the fetched table lacks `code`;
    /// any fetch failure propagates as-is; a stale or default rate is
    /// never substituted.
    pub async fn rate(&self, code: &str) -> Result<f64, FxError> {
        if let Some(rate) = self.cached(code) {
            tracing::debug!(%code, rate, "rate cache hit");
            return Ok(rate);
        }

        let rates = self.client.fetch_rates().await?;
        let rate = rates
            .get(code)
            .copied()
            .ok_or_else(|| FxError::UnknownCurrency(code.to_string()))?;

        if let Ok(mut entries) = self.entries.write() {
            entries.insert(
                code.to_string(),
                CachedRate {
                    rate,
                    fetched_at: Instant::now(),
                },
            );
        }

        tracing::info!(%code, rate, "refreshed exchange rate");
        Ok(rate)
    }

    fn cached(&self, code: &str) -> Option<f64> {
        let entries = self.entries.read().ok()?;
        let entry = entries.get(code)?;
        (entry.fetched_at.elapsed() < self.ttl).then_some(entry.rate)
    }
}
