//! Payload store backed by `sled`
//!
//! Every live message is one key in the `payloads` tree, keyed by its id.
//! Creation is a compare-and-swap against an absent key followed by a flush,
//! and `fetch_and_delete` relies on `Tree::remove` returning the previous
//! value, so reading and removing happen in a single sled operation.

use sled::{Db, Tree};

use super::PayloadStore;
use crate::utils::error::StoreError;

const PAYLOAD_TREE: &str = "payloads";

#[derive(Clone)]
pub struct SledStore {
    db: Db,
    payloads: Tree,
}

impl SledStore {
    /// Open or create a sled database at `path`.
    pub fn open(path: &str) -> Result<Self, StoreError> {
        let db = sled::open(path)?;
        let payloads = db.open_tree(PAYLOAD_TREE)?;
        Ok(Self { db, payloads })
    }

    pub fn contains(&self, id: &str) -> Result<bool, StoreError> {
        Ok(self.payloads.contains_key(id.as_bytes())?)
    }
}

impl PayloadStore for SledStore {
    fn create(&self, id: &str, payload: &[u8]) -> Result<(), StoreError> {
        let swapped =
            self.payloads
                .compare_and_swap(id.as_bytes(), None::<&[u8]>, Some(payload))?;
        if swapped.is_err() {
            return Err(StoreError::AlreadyExists(id.to_string()));
        }
        self.payloads.flush()?;
        Ok(())
    }

    fn fetch_and_delete(&self, id: &str) -> Result<Vec<u8>, StoreError> {
        match self.payloads.remove(id.as_bytes())? {
            Some(value) => Ok(value.to_vec()),
            None => Err(StoreError::NotFound(id.to_string())),
        }
    }
}

impl std::fmt::Debug for SledStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SledStore")
            .field("db", &"sled::Db")
            .field("tree", &PAYLOAD_TREE)
            .field("was_recovered", &self.db.was_recovered())
            .finish()
    }
}
