//! `RocksDB` storage backend.
//!
//! Column-family storage with CBOR-encoded values, for deployments where
//! whole-document rewrites stop being acceptable. Read-modify-write
//! operations serialize on a single write lock; keys are the account id's
//! UTF-8 bytes, so iteration order matches the JSON backend's.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use rocksdb::{
    BoundColumnFamily, ColumnFamilyDescriptor, DBWithThreadMode, IteratorMode, MultiThreaded,
    Options,
};

use tienda_core::{PointsAccount, UserId};

use crate::error::{Result, StoreError};
use crate::schema::{all_column_families, cf};
use crate::Store;

/// `RocksDB`-backed storage.
pub struct RocksStore {
    db: Arc<DBWithThreadMode<MultiThreaded>>,
    write_lock: Mutex<()>,
}

impl RocksStore {
    /// Open or create a `RocksDB` database at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_descriptors: Vec<_> = all_column_families()
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()))
            .collect();

        let db = DBWithThreadMode::open_cf_descriptors(&opts, path, cf_descriptors)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(Self {
            db: Arc::new(db),
            write_lock: Mutex::new(()),
        })
    }

    fn cf(&self, name: &str) -> Result<Arc<BoundColumnFamily<'_>>> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| StoreError::Database(format!("column family not found: {name}")))
    }

    fn write_guard(&self) -> Result<MutexGuard<'_, ()>> {
        self.write_lock
            .lock()
            .map_err(|_| StoreError::Database("write lock poisoned".to_string()))
    }

    fn serialize<T: serde::Serialize>(value: &T) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        ciborium::into_writer(value, &mut buf)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        Ok(buf)
    }

    fn deserialize<T: serde::de::DeserializeOwned>(data: &[u8]) -> Result<T> {
        ciborium::from_reader(data).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    fn read_balance(&self, user: &UserId) -> Result<i64> {
        let cf = self.cf(cf::BALANCES)?;
        self.db
            .get_cf(&cf, user.as_str().as_bytes())
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map_or(Ok(0), |data| Self::deserialize(&data))
    }

    fn write_balance(&self, user: &UserId, balance: i64) -> Result<()> {
        let cf = self.cf(cf::BALANCES)?;
        let value = Self::serialize(&balance)?;
        self.db
            .put_cf(&cf, user.as_str().as_bytes(), value)
            .map_err(|e| StoreError::Database(e.to_string()))
    }
}

impl Store for RocksStore {
    fn balance(&self, user: &UserId) -> Result<i64> {
        self.read_balance(user)
    }

    fn credit(&self, user: &UserId, amount: i64) -> Result<i64> {
        let _guard = self.write_guard()?;
        let new_balance = self.read_balance(user)?.saturating_add(amount);
        self.write_balance(user, new_balance)?;
        Ok(new_balance)
    }

    fn debit(&self, user: &UserId, amount: i64) -> Result<i64> {
        let _guard = self.write_guard()?;
        let new_balance = self.read_balance(user)?.saturating_sub(amount).max(0);
        self.write_balance(user, new_balance)?;
        Ok(new_balance)
    }

    fn points(&self, user: &UserId) -> Result<Option<PointsAccount>> {
        let cf = self.cf(cf::POINTS)?;
        self.db
            .get_cf(&cf, user.as_str().as_bytes())
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    fn update_points(
        &self,
        user: &UserId,
        apply: &mut dyn FnMut(&mut PointsAccount),
    ) -> Result<PointsAccount> {
        let _guard = self.write_guard()?;

        let mut account = self.points(user)?.unwrap_or_default();
        apply(&mut account);

        let cf = self.cf(cf::POINTS)?;
        let value = Self::serialize(&account)?;
        self.db
            .put_cf(&cf, user.as_str().as_bytes(), value)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(account)
    }

    fn all_points(&self) -> Result<Vec<(UserId, PointsAccount)>> {
        let cf = self.cf(cf::POINTS)?;
        let mut records = Vec::new();

        for item in self.db.iterator_cf(&cf, IteratorMode::Start) {
            let (key, value) = item.map_err(|e| StoreError::Database(e.to_string()))?;

            let id = std::str::from_utf8(&key)
                .map_err(|_| StoreError::Database("non-utf8 account key".to_string()))?;
            let user = UserId::new(id)
                .map_err(|e| StoreError::Database(format!("invalid account key: {e}")))?;

            records.push((user, Self::deserialize(&value)?));
        }

        Ok(records)
    }
}
