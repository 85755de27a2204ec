//! Storage schema: document and column family names.

/// Document file names for the JSON backend.
pub mod doc {
    /// Gift balances, a map from account id to integer balance.
    pub const BALANCES: &str = "balances.json";

    /// Loyalty points, a map from account id to points record.
    pub const POINTS: &str = "points.json";
}

/// Column family names for the `RocksDB` backend.
#[cfg(feature = "rocksdb-backend")]
pub mod cf {
    /// Gift balances, keyed by account id.
    pub const BALANCES: &str = "balances";

    /// Loyalty points records, keyed by account id.
    pub const POINTS: &str = "points";
}

/// Returns all column family names for database initialization.
#[cfg(feature = "rocksdb-backend")]
#[must_use]
pub fn all_column_families() -> Vec<&'static str> {
    vec![cf::BALANCES, cf::POINTS]
}
