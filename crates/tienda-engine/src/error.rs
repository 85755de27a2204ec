//! Engine error types.

use tienda_store::StoreError;

use crate::fx::FxError;

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors returned to the command layer.
///
/// Every variant is a recoverable, reported condition; bad input never
/// crashes the process. How each is rendered to the end user is the command
/// layer's business.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Non-positive amount passed to credit, debit, or accrue.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// Requested currency is absent from the fetched rate table.
    #[error("unknown currency: {0}")]
    UnknownCurrency(String),

    /// Quote requested for a product the catalog does not know.
    #[error("unknown product: {0}")]
    UnknownProduct(String),

    /// The FX fetch failed, timed out, or returned an unusable payload.
    #[error("fx upstream unavailable: {0}")]
    Upstream(String),

    /// The supplied policy denied a privileged operation.
    #[error("caller may not manage the ledger")]
    Forbidden,

    /// Storage failure.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

impl From<FxError> for EngineError {
    fn from(e: FxError) -> Self {
        match e {
            FxError::UnknownCurrency(code) => Self::UnknownCurrency(code),
            other => Self::Upstream(other.to_string()),
        }
    }
}
