use std::{
    collections::{hash_map::Entry, HashMap},
    sync::RwLock,
};

use crate::CatalogStorage;

#[derive(Debug, Default)]
pub struct InMemoryDb {
    data_holder: RwLock<HashMap<Vec<u8>, Vec<u8>>>,
}

impl CatalogStorage for InMemoryDb {
    fn get(&self, key: &[u8]) -> crate::StorageResult<Option<Vec<u8>>> {
        Ok(self
            .data_holder
            .read()
            .expect("Lock is poisoned")
            .get(key)
            .cloned())
    }

    fn create(&self, key: Vec<u8>, value: Vec<u8>) -> crate::StorageResult<Option<Vec<u8>>> {
        // The existence check and the insert must happen under the same
        // write guard, or two racing creates could both pass the check.
        match self
            .data_holder
            .write()
            .expect("Lock is poisoned")
            .entry(key)
        {
            Entry::Occupied(entry) => Ok(Some(entry.get().clone())),
            Entry::Vacant(entry) => {
                entry.insert(value);
                Ok(None)
            }
        }
    }
}
