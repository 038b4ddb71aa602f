use std::sync::{PoisonError, RwLock};

use super::{Store, StoreError, Tables};

/// In-memory store.
///
/// A transaction works on a copy of the tables and swaps it in on success,
/// so a failed or panicking transaction leaves no partial writes behind. A
/// poisoned lock is recovered.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tables(tables: Tables) -> Self {
        Self {
            tables: RwLock::new(tables),
        }
    }

    /// Copy of the current state, e.g. for writing a snapshot.
    pub fn snapshot(&self) -> Result<Tables, StoreError> {
        self.read(Tables::clone)
    }
}

impl Store for InMemoryStore {
    fn read<T>(&self, f: impl FnOnce(&Tables) -> T) -> Result<T, StoreError> {
        let tables = self.tables.read().unwrap_or_else(PoisonError::into_inner);
        Ok(f(&tables))
    }

    fn transaction<T, E>(&self, f: impl FnOnce(&mut Tables) -> Result<T, E>) -> Result<T, E>
    where
        E: From<StoreError>,
    {
        let mut tables = self.tables.write().unwrap_or_else(PoisonError::into_inner);
        let mut working = tables.clone();
        let value = f(&mut working)?;
        *tables = working;
        Ok(value)
    }
}
