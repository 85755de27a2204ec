//! Ledger, rewards, and pricing operations for the tienda storefront
//! companion.
//!
//! This crate is the surface the chat-platform command layer calls into.
//! It wires the durable store, the product catalog, the loyalty rules, and
//! the FX rate cache into one [`Storefront`]:
//!
//! - **Balance ledger**: non-negative gift balances with clamped debits
//! - **Points ledger**: tier-multiplied accruals, repeat-purchase bonus,
//!   rolling-window expiry evaluated lazily on access
//! - **Ranking**: the monthly leaderboard derived from live points
//! - **Pricing**: USD catalog prices converted through a TTL-cached FX
//!   rate and rounded up by magnitude
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use tienda_core::UserId;
//! use tienda_engine::{Storefront, StorefrontConfig};
//! use tienda_store::JsonStore;
//!
//! # async fn example() -> Result<(), tienda_engine::EngineError> {
//! let store = Arc::new(JsonStore::open("/var/lib/tienda")?);
//! let shop = Storefront::new(store, StorefrontConfig::default())?;
//!
//! let customer: UserId = "184605435343986688".parse().expect("non-empty");
//! shop.credit_balance(&customer, 1_000)?;
//! shop.accrue_points(&customer, 25, None)?;
//!
//! let quote = shop.convert_price(36.99, "MXN").await?;
//! println!("{quote}");
//! # Ok(())
//! # }
//! ```
//!
//! Authorization is the caller's concern; see [`Storefront::managed`] for
//! the policy-gated wrapper around the privileged operations.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod fx;
pub mod policy;
pub mod ranking;
pub mod storefront;

pub use error::{EngineError, Result};
pub use fx::{FxClient, FxError, RateCache, DEFAULT_FX_URL};
pub use policy::{AllowAll, Managed, ManagePolicy};
pub use ranking::{monthly_ranking, RankEntry, DEFAULT_RANKING_LIMIT};
pub use storefront::{Accrual, PointsSummary, Storefront, StorefrontConfig};
