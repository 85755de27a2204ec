//! Durable storage layer for tienda.
//!
//! This crate persists the two stateful records of the storefront (gift
//! balances and loyalty points) behind the [`Store`] trait. All operations
//! are key-addressed and atomic per account: read-modify-write sequences on
//! the same record cannot interleave, so two tasks crediting the same
//! account around an `await` point cannot lose an update.
//!
//! # Backends
//!
//! - [`JsonStore`] (default): two JSON documents (`balances.json`,
//!   `points.json`) loaded eagerly at open and rewritten synchronously after
//!   every mutation. A document that fails to parse is a loud
//!   [`StoreError::Corrupt`]; the store never silently reinitializes.
//! - `RocksStore` (`rocksdb-backend` feature): column-family storage with
//!   CBOR-encoded values for deployments that outgrow whole-document
//!   rewrites.
//!
//! # Example
//!
//! ```no_run
//! use tienda_store::{JsonStore, Store};
//! use tienda_core::UserId;
//!
//! let store = JsonStore::open("/var/lib/tienda").unwrap();
//! let user: UserId = "184605435343986688".parse().unwrap();
//!
//! let balance = store.credit(&user, 500).unwrap();
//! assert_eq!(store.balance(&user).unwrap(), balance);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod json;
#[cfg(feature = "rocksdb-backend")]
pub mod rocks;
pub mod schema;

pub use error::{Result, StoreError};
pub use json::JsonStore;
#[cfg(feature = "rocksdb-backend")]
pub use rocks::RocksStore;

use tienda_core::{PointsAccount, UserId};

/// The storage trait defining all persistence operations.
///
/// Implementations must serialize mutations of the same record; callers
/// rely on `credit`/`debit`/`update_points` being atomic read-modify-write
/// steps.
pub trait Store: Send + Sync {
    // =========================================================================
    // Balance Operations
    // =========================================================================

    /// Get an account's gift balance. Unknown accounts read as 0.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    fn balance(&self, user: &UserId) -> Result<i64>;

    /// Atomically add to an account's balance and persist.
    ///
    /// Returns the new balance. The record is created lazily on first
    /// credit. Amount validation is the engine's job; the store applies
    /// whatever it is given.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    fn credit(&self, user: &UserId, amount: i64) -> Result<i64>;

    /// Atomically subtract from an account's balance, clamping at 0, and
    /// persist.
    ///
    /// Returns the new balance. Balances model store credit and never go
    /// negative.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    fn debit(&self, user: &UserId, amount: i64) -> Result<i64>;

    // =========================================================================
    // Points Operations
    // =========================================================================

    /// Read an account's points record as stored, without pruning.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    fn points(&self, user: &UserId) -> Result<Option<PointsAccount>>;

    /// Atomically read-modify-write an account's points record.
    ///
    /// The record is created empty if absent, `apply` mutates it, and the
    /// result is persisted and returned.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    fn update_points(
        &self,
        user: &UserId,
        apply: &mut dyn FnMut(&mut PointsAccount),
    ) -> Result<PointsAccount>;

    /// Snapshot every points record in stable (lexicographic key) order.
    ///
    /// The ranking view recomputes live sums from this snapshot on its own;
    /// records are returned as stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    fn all_points(&self) -> Result<Vec<(UserId, PointsAccount)>>;
}
