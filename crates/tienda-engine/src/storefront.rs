//! The storefront facade: every operation the command layer calls.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;

use tienda_core::{
    PointEntry, PricingPolicy, ProductCatalog, ProductId, Quote, RewardsConfig, Tier, UserId,
};
use tienda_store::Store;

use crate::error::{EngineError, Result};
use crate::fx::{FxClient, RateCache, DEFAULT_FX_URL};
use crate::policy::{Managed, ManagePolicy};
use crate::ranking::{monthly_ranking, RankEntry};

/// Engine configuration: catalog, reward rules, pricing policy, and the FX
/// endpoint.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// The product catalog.
    pub catalog: ProductCatalog,

    /// Loyalty reward rules.
    pub rewards: RewardsConfig,

    /// Currency conversion policy.
    pub pricing: PricingPolicy,

    /// FX endpoint URL. Tests point this at a local mock.
    pub fx_url: String,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            catalog: ProductCatalog::default(),
            rewards: RewardsConfig::default(),
            pricing: PricingPolicy::default(),
            fx_url: DEFAULT_FX_URL.to_string(),
        }
    }
}

/// Result of a points accrual.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Accrual {
    /// Points earned by this accrual, multiplier and bonus included.
    pub earned: i64,

    /// Live total after the accrual.
    pub total: i64,
}

/// An account's live points total and the tier it lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PointsSummary {
    /// Live points total.
    pub total: i64,

    /// Loyalty tier for that total.
    pub tier: Tier,
}

/// The storefront engine.
///
/// Owns the store handle, the reward/pricing configuration, and the FX rate
/// cache. All operations are unrestricted. Gating who may call the
/// privileged ones is the command layer's job, via [`Storefront::managed`].
pub struct Storefront {
    store: Arc<dyn Store>,
    catalog: ProductCatalog,
    rewards: RewardsConfig,
    pricing: PricingPolicy,
    rates: RateCache,
}

impl Storefront {
    /// Create an engine over a store with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the FX HTTP client cannot be built.
    pub fn new(store: Arc<dyn Store>, config: StorefrontConfig) -> Result<Self> {
        let client = FxClient::new(config.fx_url, config.pricing.fetch_timeout())?;
        let rates = RateCache::new(client, config.pricing.rate_ttl());

        Ok(Self {
            store,
            catalog: config.catalog,
            rewards: config.rewards,
            pricing: config.pricing,
            rates,
        })
    }

    /// Wrap the privileged operations behind an authorization policy.
    pub fn managed<P: ManagePolicy>(&self, policy: P) -> Managed<'_, P> {
        Managed::new(self, policy)
    }

    /// The configured product catalog.
    #[must_use]
    pub fn catalog(&self) -> &ProductCatalog {
        &self.catalog
    }

    // =========================================================================
    // Balance Ledger
    // =========================================================================

    /// Add to an account's gift balance. Returns the new balance.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidAmount`] unless `amount > 0`.
    pub fn credit_balance(&self, user: &UserId, amount: i64) -> Result<i64> {
        ensure_positive(amount, "credit")?;
        let balance = self.store.credit(user, amount)?;
        tracing::info!(%user, amount, balance, "credited gift balance");
        Ok(balance)
    }

    /// Subtract from an account's gift balance, clamping at 0. Returns the
    /// new balance.
    ///
    /// Balances model store credit; a debit past zero empties the account
    /// instead of failing.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidAmount`] unless `amount > 0`.
    pub fn debit_balance(&self, user: &UserId, amount: i64) -> Result<i64> {
        ensure_positive(amount, "debit")?;
        let balance = self.store.debit(user, amount)?;
        tracing::info!(%user, amount, balance, "debited gift balance");
        Ok(balance)
    }

    /// An account's current gift balance, 0 for unknown accounts.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    pub fn balance(&self, user: &UserId) -> Result<i64> {
        Ok(self.store.balance(user)?)
    }

    // =========================================================================
    // Points Ledger
    // =========================================================================

    /// Accrue loyalty points for a purchase.
    ///
    /// The catalog multiplier applies to `base_points` (floored), and a
    /// repeat purchase inside the bonus window earns a flat bonus on top.
    /// Expired history is pruned and the live total recomputed in the same
    /// atomic update.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidAmount`] unless `base_points > 0`.
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    pub fn accrue_points(
        &self,
        user: &UserId,
        base_points: i64,
        product: Option<&ProductId>,
    ) -> Result<Accrual> {
        ensure_positive(base_points, "accrual")?;

        let now = Utc::now();
        let multiplier = self.catalog.multiplier_for(product);
        let base_earned = (base_points as f64 * multiplier).floor() as i64;

        let bonus_window = self.rewards.bonus_window();
        let bonus_points = self.rewards.bonus_points;
        let expiry_window = self.rewards.expiry_window();

        let mut earned = base_earned;
        let updated = self.store.update_points(user, &mut |account| {
            earned = base_earned;
            if account.purchased_within(now, bonus_window) {
                earned += bonus_points;
            }
            account.record(PointEntry::new(earned, now, product.cloned()));
            account.retain_live(now, expiry_window);
        })?;

        tracing::info!(%user, earned, total = updated.total, "accrued loyalty points");
        Ok(Accrual {
            earned,
            total: updated.total,
        })
    }

    /// An account's live points total and tier.
    ///
    /// Reading prunes expired history first (persisting the pruned record),
    /// so a stale total is never shown. Unknown accounts summarize as 0
    /// without creating a record.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    pub fn points(&self, user: &UserId) -> Result<PointsSummary> {
        let now = Utc::now();
        let expiry_window = self.rewards.expiry_window();

        let total = match self.store.points(user)? {
            None => 0,
            Some(_) => {
                self.store
                    .update_points(user, &mut |account| {
                        account.retain_live(now, expiry_window);
                    })?
                    .total
            }
        };

        Ok(PointsSummary {
            total,
            tier: Tier::for_total(total, &self.rewards.tiers),
        })
    }

    // =========================================================================
    // Ranking
    // =========================================================================

    /// The top `limit` accounts by points earned inside the expiry window.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage snapshot fails.
    pub fn monthly_ranking(&self, limit: usize) -> Result<Vec<RankEntry>> {
        let accounts = self.store.all_points()?;
        Ok(monthly_ranking(
            &accounts,
            Utc::now(),
            self.rewards.expiry_window(),
            limit,
        ))
    }

    // =========================================================================
    // Pricing
    // =========================================================================

    /// Convert a USD base price into `currency`.
    ///
    /// The base currency returns exact and touches no network. Currencies
    /// on the exact list convert without rounding; everything else is
    /// ceiling-rounded by magnitude so the display price never undercuts
    /// the true converted value.
    ///
    /// # Errors
    ///
    /// [`EngineError::UnknownCurrency`] if the rate table lacks `currency`;
    /// [`EngineError::Upstream`] if the FX fetch fails.
    pub async fn convert_price(&self, base_price_usd: f64, currency: &str) -> Result<Quote> {
        if self.pricing.is_base(currency) {
            return Ok(Quote::exact(base_price_usd, currency));
        }

        let rate = self.rates.rate(currency).await?;
        let converted = base_price_usd * rate;

        if self.pricing.is_exact(currency) {
            Ok(Quote::exact(converted, currency))
        } else {
            Ok(Quote::rounded(converted, currency))
        }
    }

    /// Quote a catalog product in `currency`.
    ///
    /// # Errors
    ///
    /// [`EngineError::UnknownProduct`] if the catalog lacks the id, plus
    /// everything [`Storefront::convert_price`] can return.
    pub async fn quote_product(&self, product: &ProductId, currency: &str) -> Result<Quote> {
        let item = self
            .catalog
            .get(product)
            .ok_or_else(|| EngineError::UnknownProduct(product.to_string()))?;

        self.convert_price(item.base_price_usd, currency).await
    }
}

fn ensure_positive(amount: i64, what: &str) -> Result<()> {
    if amount > 0 {
        Ok(())
    } else {
        Err(EngineError::InvalidAmount(format!(
            "{what} amount must be a positive integer, got {amount}"
        )))
    }
}
