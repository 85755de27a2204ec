//! Engine configuration.
//!
//! The source deployments diverged only in a handful of constants (bonus
//! window, tier thresholds, rounding exemptions). Those knobs live here so
//! one engine serves every deployment.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::time::Duration as StdDuration;

use chrono::Duration;

use crate::points::TierThresholds;

/// Loyalty rewards configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardsConfig {
    /// Rolling window, in days, over which point entries stay live.
    pub expiry_days: i64,

    /// Repeat-purchase bonus window in days.
    pub bonus_days: i64,

    /// Flat bonus points for a repeat purchase inside the bonus window.
    pub bonus_points: i64,

    /// Tier boundaries.
    pub tiers: TierThresholds,
}

impl Default for RewardsConfig {
    fn default() -> Self {
        Self {
            expiry_days: 30,
            bonus_days: 14,
            bonus_points: 10,
            tiers: TierThresholds::default(),
        }
    }
}

impl RewardsConfig {
    /// The expiry window as a duration.
    #[must_use]
    pub fn expiry_window(&self) -> Duration {
        Duration::days(self.expiry_days)
    }

    /// The repeat-purchase bonus window as a duration.
    #[must_use]
    pub fn bonus_window(&self) -> Duration {
        Duration::days(self.bonus_days)
    }
}

/// Currency conversion and display policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingPolicy {
    /// The catalog's base currency. Conversions to it are identity and
    /// never rounded.
    pub base_currency: String,

    /// How long a fetched exchange rate stays valid.
    pub rate_ttl_secs: u64,

    /// Timeout for a single FX fetch. Expiry surfaces as an upstream
    /// failure.
    pub fetch_timeout_secs: u64,

    /// Currencies exempt from magnitude rounding; their quotes display two
    /// decimal places instead. Some deployments put `EUR` here.
    pub exact_currencies: BTreeSet<String>,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            base_currency: "USD".to_string(),
            rate_ttl_secs: 60,
            fetch_timeout_secs: 10,
            exact_currencies: BTreeSet::new(),
        }
    }
}

impl PricingPolicy {
    /// The rate TTL as a duration.
    #[must_use]
    pub const fn rate_ttl(&self) -> StdDuration {
        StdDuration::from_secs(self.rate_ttl_secs)
    }

    /// The fetch timeout as a duration.
    #[must_use]
    pub const fn fetch_timeout(&self) -> StdDuration {
        StdDuration::from_secs(self.fetch_timeout_secs)
    }

    /// Whether `code` is the base currency.
    #[must_use]
    pub fn is_base(&self, code: &str) -> bool {
        self.base_currency == code
    }

    /// Whether `code` is exempt from magnitude rounding.
    #[must_use]
    pub fn is_exact(&self, code: &str) -> bool {
        self.exact_currencies.contains(code)
    }
}
