//! The `error` module defines the error types shared by the payload store
//! and the broker.
//!
//! Empty queues are not errors: `Broker::pull` reports them as `Ok(None)`.
//! Malformed requests never reach the broker and have no variant here.

use thiserror::Error;

/// Failures reported by a `PayloadStore` backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No payload is stored under the requested id.
    #[error("payload not found for message {0}")]
    NotFound(String),

    /// A payload already exists under the id being created.
    #[error("payload already exists for message {0}")]
    AlreadyExists(String),

    /// Filesystem failure (disk full, permission denied, ...).
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failure inside the embedded sled database.
    #[error("storage backend error: {0}")]
    Backend(#[from] sled::Error),
}

/// Failures surfaced by `Broker::push` and `Broker::pull`.
#[derive(Debug, Error)]
pub enum BrokerError {
    #[error(transparent)]
    Store(StoreError),

    /// A queued id had no payload in the store: the queue and the store
    /// have diverged and the message is lost.
    #[error("queue and store diverged: no payload for queued message {0}")]
    MissingPayload(String),
}

impl From<StoreError> for BrokerError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => BrokerError::MissingPayload(id),
            other => BrokerError::Store(other),
        }
    }
}
