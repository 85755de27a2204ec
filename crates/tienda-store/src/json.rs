//! JSON-document storage backend.
//!
//! The default backend keeps both documents fully in memory behind one
//! mutex and rewrites the affected file synchronously after each mutation
//! (write to a temp file, then rename). The lock is held through the flush,
//! so concurrent read-modify-write sequences on the same record serialize
//! instead of clobbering each other.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use serde::de::DeserializeOwned;
use serde::Serialize;

use tienda_core::{PointsAccount, UserId};

use crate::error::{Result, StoreError};
use crate::schema::doc;
use crate::Store;

/// JSON-file-backed storage.
pub struct JsonStore {
    dir: PathBuf,
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    balances: BTreeMap<UserId, i64>,
    points: BTreeMap<UserId, PointsAccount>,
}

impl JsonStore {
    /// Open (or create) a data directory and eagerly load both documents.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Corrupt`] if a document exists but fails to
    /// parse, and an I/O error if the directory or files are unreadable.
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;

        let balances: BTreeMap<UserId, i64> = load_document(&dir.join(doc::BALANCES))?;
        let points: BTreeMap<UserId, PointsAccount> = load_document(&dir.join(doc::POINTS))?;

        tracing::debug!(
            dir = %dir.display(),
            balances = balances.len(),
            points = points.len(),
            "loaded storefront documents"
        );

        Ok(Self {
            dir,
            state: Mutex::new(State { balances, points }),
        })
    }

    fn state(&self) -> Result<MutexGuard<'_, State>> {
        self.state
            .lock()
            .map_err(|_| StoreError::Database("state lock poisoned".to_string()))
    }

    fn flush_balances(&self, state: &State) -> Result<()> {
        write_document(&self.dir.join(doc::BALANCES), &state.balances)
    }

    fn flush_points(&self, state: &State) -> Result<()> {
        write_document(&self.dir.join(doc::POINTS), &state.points)
    }
}

impl Store for JsonStore {
    fn balance(&self, user: &UserId) -> Result<i64> {
        let state = self.state()?;
        Ok(state.balances.get(user).copied().unwrap_or(0))
    }

    fn credit(&self, user: &UserId, amount: i64) -> Result<i64> {
        let mut state = self.state()?;
        let entry = state.balances.entry(user.clone()).or_insert(0);
        *entry = entry.saturating_add(amount);
        let new_balance = *entry;
        self.flush_balances(&state)?;
        Ok(new_balance)
    }

    fn debit(&self, user: &UserId, amount: i64) -> Result<i64> {
        let mut state = self.state()?;
        let entry = state.balances.entry(user.clone()).or_insert(0);
        *entry = entry.saturating_sub(amount).max(0);
        let new_balance = *entry;
        self.flush_balances(&state)?;
        Ok(new_balance)
    }

    fn points(&self, user: &UserId) -> Result<Option<PointsAccount>> {
        let state = self.state()?;
        Ok(state.points.get(user).cloned())
    }

    fn update_points(
        &self,
        user: &UserId,
        apply: &mut dyn FnMut(&mut PointsAccount),
    ) -> Result<PointsAccount> {
        let mut state = self.state()?;
        let account = state.points.entry(user.clone()).or_default();
        apply(account);
        let updated = account.clone();
        self.flush_points(&state)?;
        Ok(updated)
    }

    fn all_points(&self) -> Result<Vec<(UserId, PointsAccount)>> {
        let state = self.state()?;
        Ok(state
            .points
            .iter()
            .map(|(user, account)| (user.clone(), account.clone()))
            .collect())
    }
}

fn load_document<T: DeserializeOwned + Default>(path: &Path) -> Result<T> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(T::default()),
        Err(e) => return Err(e.into()),
    };

    serde_json::from_str(&raw).map_err(|e| StoreError::Corrupt {
        doc: path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned()),
        message: e.to_string(),
    })
}

fn write_document<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let data =
        serde_json::to_vec_pretty(value).map_err(|e| StoreError::Serialization(e.to_string()))?;

    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, data)?;
    fs::rename(&tmp, path)?;
    Ok(())
}
