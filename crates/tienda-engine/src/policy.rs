//! Authorization seam for privileged ledger operations.
//!
//! The engine does not decide who may credit, debit, or accrue. The command
//! layer supplies a [`ManagePolicy`] and routes privileged calls through
//! the [`Managed`] wrapper, which rejects denied callers before anything
//! touches the store.

use tienda_core::{ProductId, UserId};

use crate::error::{EngineError, Result};
use crate::storefront::{Accrual, Storefront};

/// Capability check supplied by the embedding command layer.
pub trait ManagePolicy: Send + Sync {
    /// Whether `caller` may mutate other accounts' ledgers.
    fn can_manage_ledger(&self, caller: &UserId) -> bool;
}

impl<F> ManagePolicy for F
where
    F: Fn(&UserId) -> bool + Send + Sync,
{
    fn can_manage_ledger(&self, caller: &UserId) -> bool {
        self(caller)
    }
}

/// A policy that admits every caller, for embedders that gate upstream.
pub struct AllowAll;

impl ManagePolicy for AllowAll {
    fn can_manage_ledger(&self, _caller: &UserId) -> bool {
        true
    }
}

/// The privileged operations, gated by a policy.
pub struct Managed<'a, P> {
    storefront: &'a Storefront,
    policy: P,
}

impl<'a, P: ManagePolicy> Managed<'a, P> {
    pub(crate) fn new(storefront: &'a Storefront, policy: P) -> Self {
        Self { storefront, policy }
    }

    fn authorize(&self, caller: &UserId) -> Result<()> {
        if self.policy.can_manage_ledger(caller) {
            Ok(())
        } else {
            tracing::warn!(%caller, "ledger management denied");
            Err(EngineError::Forbidden)
        }
    }

    /// [`Storefront::credit_balance`] on behalf of `caller`.
    ///
    /// # Errors
    ///
    /// [`EngineError::Forbidden`] when the policy denies `caller`, plus the
    /// underlying operation's errors.
    pub fn credit_balance(&self, caller: &UserId, user: &UserId, amount: i64) -> Result<i64> {
        self.authorize(caller)?;
        self.storefront.credit_balance(user, amount)
    }

    /// [`Storefront::debit_balance`] on behalf of `caller`.
    ///
    /// # Errors
    ///
    /// [`EngineError::Forbidden`] when the policy denies `caller`, plus the
    /// underlying operation's errors.
    pub fn debit_balance(&self, caller: &UserId, user: &UserId, amount: i64) -> Result<i64> {
        self.authorize(caller)?;
        self.storefront.debit_balance(user, amount)
    }

    /// [`Storefront::accrue_points`] on behalf of `caller`.
    ///
    /// # Errors
    ///
    /// [`EngineError::Forbidden`] when the policy denies `caller`, plus the
    /// underlying operation's errors.
    pub fn accrue_points(
        &self,
        caller: &UserId,
        user: &UserId,
        base_points: i64,
        product: Option<&ProductId>,
    ) -> Result<Accrual> {
        self.authorize(caller)?;
        self.storefront.accrue_points(user, base_points, product)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storefront::StorefrontConfig;
    use std::sync::Arc;
    use tempfile::TempDir;
    use tienda_store::JsonStore;

    fn user(id: &str) -> UserId {
        UserId::new(id).unwrap()
    }

    #[test]
    fn denied_caller_changes_nothing() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(JsonStore::open(dir.path()).unwrap());
        let engine = Storefront::new(store, StorefrontConfig::default()).unwrap();

        let staff = user("staff");
        let customer = user("customer");

        let managed = engine.managed(|caller: &UserId| caller.as_str() == "staff");

        assert!(matches!(
            managed.credit_balance(&customer, &customer, 500),
            Err(EngineError::Forbidden)
        ));
        assert_eq!(engine.balance(&customer).unwrap(), 0);

        assert_eq!(managed.credit_balance(&staff, &customer, 500).unwrap(), 500);
        assert_eq!(engine.balance(&customer).unwrap(), 500);
    }

    #[test]
    fn allow_all_admits_everyone() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(JsonStore::open(dir.path()).unwrap());
        let engine = Storefront::new(store, StorefrontConfig::default()).unwrap();

        let managed = engine.managed(AllowAll);
        let anyone = user("anyone");

        let accrual = managed.accrue_points(&anyone, &anyone, 10, None).unwrap();
        assert_eq!(accrual.earned, 10);
    }
}
