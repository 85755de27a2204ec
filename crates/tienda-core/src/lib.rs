//! Core types and pure logic for the tienda storefront companion.
//!
//! This crate provides the foundational pieces shared by the storage and
//! engine layers:
//!
//! - **Identifiers**: [`UserId`], [`ProductId`]
//! - **Points**: [`PointEntry`], [`PointsAccount`], [`Tier`]
//! - **Catalog**: [`Product`], [`ProductCatalog`]
//! - **Configuration**: [`RewardsConfig`], [`PricingPolicy`]
//! - **Pricing math**: [`Quote`] and magnitude-aware ceiling rounding
//!
//! # Units
//!
//! Gift balances and loyalty points are plain integers (`i64`). Points are
//! accrued through history entries and expire on a rolling window; the live
//! total is always recomputable from `(history, now)` alone.
//!
//! Nothing in this crate performs I/O or reads the clock. Time-dependent
//! computations take an explicit `DateTime<Utc>`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod catalog;
pub mod config;
pub mod ids;
pub mod points;
pub mod pricing;

pub use catalog::{Product, ProductCatalog};
pub use config::{PricingPolicy, RewardsConfig};
pub use ids::{IdError, ProductId, UserId};
pub use points::{PointEntry, PointsAccount, Tier, TierThresholds};
pub use pricing::{round_up_to_step, rounding_step, Quote};
