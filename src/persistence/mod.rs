//! The `persistence` module provides durable storage for message payloads.
//!
//! Payloads are stored one record per live message, keyed by the message id.
//! There is no index: only the broker's in-memory queue knows which ids are
//! live and in which order they should be delivered.
//!
//! Backends implement [`PayloadStore`] so the broker never depends on a
//! particular medium:
//! - `file_store`: one `<id>.data` file per message in a directory.
//! - `sled_store`: one key per message in an embedded `sled` database.
//! - `memory_store`: a mutex-guarded map, for tests and throwaway runs.

pub mod file_store;
pub mod memory_store;
pub mod sled_store;

use std::fmt::Debug;

use tracing::info;

use crate::config::{StorageBackend, StorageSettings};
use crate::utils::error::StoreError;

pub use file_store::FileStore;
pub use memory_store::MemoryStore;
pub use sled_store::SledStore;

/// Durable keyed blob storage, independent of delivery order.
pub trait PayloadStore: Send + Sync + Debug {
    /// Persist `payload` under `id`. Fails with `AlreadyExists` if `id` is taken.
    fn create(&self, id: &str, payload: &[u8]) -> Result<(), StoreError>;

    /// Read the payload for `id` in full and remove it from storage.
    fn fetch_and_delete(&self, id: &str) -> Result<Vec<u8>, StoreError>;
}

/// Open the backend selected by the storage settings.
pub fn open_store(settings: &StorageSettings) -> Result<Box<dyn PayloadStore>, StoreError> {
    info!(
        "Opening {:?} payload store at {}",
        settings.backend, settings.path
    );
    let store: Box<dyn PayloadStore> = match settings.backend {
        StorageBackend::File => Box::new(FileStore::open(&settings.path)?),
        StorageBackend::Sled => Box::new(SledStore::open(&settings.path)?),
        StorageBackend::Memory => Box::new(MemoryStore::new()),
    };
    Ok(store)
}
