use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::{Mutex, PoisonError};

use super::PayloadStore;
use crate::utils::error::StoreError;

/// Non-durable store backed by a map. Contents vanish with the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    payloads: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.payloads
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PayloadStore for MemoryStore {
    fn create(&self, id: &str, payload: &[u8]) -> Result<(), StoreError> {
        let mut payloads = self.payloads.lock().unwrap_or_else(PoisonError::into_inner);
        match payloads.entry(id.to_string()) {
            Entry::Occupied(_) => Err(StoreError::AlreadyExists(id.to_string())),
            Entry::Vacant(slot) => {
                slot.insert(payload.to_vec());
                Ok(())
            }
        }
    }

    fn fetch_and_delete(&self, id: &str) -> Result<Vec<u8>, StoreError> {
        let mut payloads = self.payloads.lock().unwrap_or_else(PoisonError::into_inner);
        payloads
            .remove(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }
}
