mod in_memory;
use std::{fmt::Debug, sync::Arc};

use serde::{de::DeserializeOwned, Serialize};

pub trait CatalogStorage: Debug + Send + Sync {
    fn get(&self, key: &[u8]) -> StorageResult<Option<Vec<u8>>>;
    /// Inserts `key` and corresponding `value` into the database only if no
    /// entry with `key` exists yet. If one did, it is left untouched and its
    /// value is returned.
    fn create(&self, key: Vec<u8>, value: Vec<u8>) -> StorageResult<Option<Vec<u8>>>;
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(
        "Error during record serialization, you probably have the wrong type on the receiving end \
         or inserted an invalid repr into a database"
    )]
    Codec(#[from] serde_json::Error),
    #[error("Database Error `{0}`")]
    DatabaseError(Box<dyn std::error::Error + Send + Sync>),
}

pub type StorageResult<T> = Result<T, Error>;

/// Cloneable handle to the process-wide store. Records round-trip through
/// JSON on the way in and out of the backend.
#[derive(Clone, Debug)]
pub struct CatalogDatabase {
    data: Arc<dyn CatalogStorage>,
}

impl CatalogDatabase {
    pub fn in_memory() -> Self {
        Self {
            data: Arc::new(in_memory::InMemoryDb::default()),
        }
    }

    pub fn get<V: DeserializeOwned>(&self, key: &str) -> StorageResult<Option<V>> {
        match self.data.get(key.as_bytes()) {
            Ok(Some(bytes)) => {
                let val: V = serde_json::from_slice(&bytes)?;
                Ok(Some(val))
            }
            Ok(None) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Stores `value` under `key` unless `key` is already present; the
    /// previously stored value is returned in that case and nothing is
    /// written.
    pub fn create<V: Serialize + DeserializeOwned>(
        &self,
        key: &str,
        value: &V,
    ) -> StorageResult<Option<V>> {
        match self
            .data
            .create(key.as_bytes().to_vec(), serde_json::to_vec(value)?)
        {
            Ok(Some(existing)) => {
                let val: V = serde_json::from_slice(&existing)?;
                Ok(Some(val))
            }
            Ok(None) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
