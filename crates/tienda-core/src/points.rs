//! Loyalty points: accrual history, rolling-window expiry, and tiers.
//!
//! A [`PointsAccount`] is the persisted record for one customer. Its `total`
//! is derived state: after any mutation or read it must equal the sum of the
//! entries still inside the expiry window. Expiry is lazy: callers prune at
//! access time with [`PointsAccount::retain_live`]; there is no background
//! sweep.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::ProductId;

/// A single accrual of loyalty points.
///
/// Entries are immutable once created and are dropped wholesale when they
/// age out of the expiry window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointEntry {
    /// Points earned by this accrual (multiplier and bonus already applied).
    pub points: i64,

    /// When the accrual happened.
    pub timestamp: DateTime<Utc>,

    /// The catalog product that triggered the accrual, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<ProductId>,
}

impl PointEntry {
    /// Create a new entry.
    #[must_use]
    pub const fn new(points: i64, timestamp: DateTime<Utc>, product: Option<ProductId>) -> Self {
        Self {
            points,
            timestamp,
            product,
        }
    }

    /// Whether this entry still counts at `now` under the given window.
    ///
    /// The window is inclusive: an entry exactly `window` old is still live.
    #[must_use]
    pub fn is_live(&self, now: DateTime<Utc>, window: Duration) -> bool {
        now - self.timestamp <= window
    }
}

/// The persisted points record for one account.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PointsAccount {
    /// Sum of live entry points. Derived; see [`PointsAccount::retain_live`].
    pub total: i64,

    /// Accrual history, oldest first. Append-only until pruned.
    pub history: Vec<PointEntry>,

    /// Timestamp of the most recent accrual, `None` if there has never
    /// been one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_purchase_at: Option<DateTime<Utc>>,
}

impl PointsAccount {
    /// Create an empty account.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sum the points of entries still live at `now`, without mutating.
    ///
    /// This is the ranking view's computation: it must not assume the
    /// stored `total` has been freshly recomputed.
    #[must_use]
    pub fn live_points(&self, now: DateTime<Utc>, window: Duration) -> i64 {
        self.history
            .iter()
            .filter(|e| e.is_live(now, window))
            .map(|e| e.points)
            .sum()
    }

    /// Drop expired entries and recompute `total` from what remains.
    pub fn retain_live(&mut self, now: DateTime<Utc>, window: Duration) {
        self.history.retain(|e| e.is_live(now, window));
        self.total = self.history.iter().map(|e| e.points).sum();
    }

    /// Append an accrual and mark it as the most recent purchase.
    ///
    /// Callers are expected to follow up with [`PointsAccount::retain_live`]
    /// so `total` stays consistent.
    pub fn record(&mut self, entry: PointEntry) {
        self.last_purchase_at = Some(entry.timestamp);
        self.history.push(entry);
    }

    /// Whether the previous purchase falls within the repeat-purchase
    /// bonus window. False if there has never been a purchase.
    #[must_use]
    pub fn purchased_within(&self, now: DateTime<Utc>, window: Duration) -> bool {
        self.last_purchase_at
            .is_some_and(|last| now - last <= window)
    }
}

/// Loyalty tier derived from the live points total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    /// Below the silver threshold.
    Bronze,

    /// At or above the silver threshold, below gold.
    Silver,

    /// At or above the gold threshold.
    Gold,
}

impl Tier {
    /// Derive the tier for a points total. Thresholds are inclusive on the
    /// lower bound of each tier.
    #[must_use]
    pub fn for_total(total: i64, thresholds: &TierThresholds) -> Self {
        if total >= thresholds.gold {
            Self::Gold
        } else if total >= thresholds.silver {
            Self::Silver
        } else {
            Self::Bronze
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Bronze => "Bronze",
            Self::Silver => "Silver",
            Self::Gold => "Gold",
        };
        write!(f, "{name}")
    }
}

/// Points totals at which each tier starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierThresholds {
    /// Minimum live total for Silver.
    pub silver: i64,

    /// Minimum live total for Gold.
    pub gold: i64,
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self {
            silver: 100,
            gold: 300,
        }
    }
}
