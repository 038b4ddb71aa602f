//! Transactional entity store.
//!
//! All records live in one [`Tables`] value. Reads see a consistent view;
//! writes run inside [`Store::transaction`], which applies every change or
//! none of them and excludes concurrent writers for its whole duration.

pub mod in_memory;
pub mod snapshot;
pub mod tables;

use std::sync::Arc;

use thiserror::Error;

pub use in_memory::InMemoryStore;
pub use snapshot::{load_snapshot, save_snapshot};
pub use tables::{Tables, upsert};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("snapshot io failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("snapshot serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub trait Store: Send + Sync {
    /// Run `f` against a consistent view of every table.
    fn read<T>(&self, f: impl FnOnce(&Tables) -> T) -> Result<T, StoreError>;

    /// Run `f` with exclusive write access. Changes made by `f` are kept
    /// only if it returns `Ok`.
    fn transaction<T, E>(&self, f: impl FnOnce(&mut Tables) -> Result<T, E>) -> Result<T, E>
    where
        E: From<StoreError>;
}

impl<S> Store for Arc<S>
where
    S: Store,
{
    fn read<T>(&self, f: impl FnOnce(&Tables) -> T) -> Result<T, StoreError> {
        (**self).read(f)
    }

    fn transaction<T, E>(&self, f: impl FnOnce(&mut Tables) -> Result<T, E>) -> Result<T, E>
    where
        E: From<StoreError>,
    {
        (**self).transaction(f)
    }
}
