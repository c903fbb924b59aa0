//! Broker engine
//!
//! The broker is the only component that touches both the priority queue and
//! the payload store. It keeps them consistent:
//! - a push writes the payload first and only then enqueues its id, so the
//!   queue never references a payload that was not stored;
//! - a pull extracts an id from the queue and then fetches and deletes its
//!   payload, so each id is delivered at most once.
//!
//! Concurrency notes:
//! - All methods take `&self`; share the broker as `Arc<Broker>`.
//! - The queue and its sequence counter sit behind one mutex. The lock is
//!   released before any store I/O, so pushes and pulls of different ids
//!   hit the store concurrently.
//! - A pull that loses its payload after extraction is not retried or
//!   re-queued: the message is reported lost.
//! - An expiry sweep that cannot delete a payload puts the entry back in the
//!   queue, so the payload is never left on disk without a queue entry.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{TimeDelta, Utc};
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::broker::message::{Message, MessageId};
use crate::broker::queue::PriorityQueue;
use crate::persistence::PayloadStore;
use crate::utils::error::{BrokerError, StoreError};

#[derive(Debug)]
pub struct Broker {
    queue: Mutex<PriorityQueue>,
    store: Box<dyn PayloadStore>,
}

impl Broker {
    pub fn new(store: Box<dyn PayloadStore>) -> Self {
        Self {
            queue: Mutex::new(PriorityQueue::new()),
            store,
        }
    }

    /// Stores `payload` under a fresh id and enqueues it with `priority`.
    ///
    /// If the store write fails nothing is enqueued.
    pub fn push(&self, priority: i64, payload: &[u8]) -> Result<MessageId, BrokerError> {
        let id = Uuid::new_v4().to_string();

        if let Err(e) = self.store.create(&id, payload) {
            error!("Failed to store payload for message {id}: {e}");
            return Err(BrokerError::Store(e));
        }

        let sequence = self.queue().insert(id.clone(), priority);
        debug!("Enqueued message {id} with priority {priority} (seq {sequence})");

        Ok(id)
    }

    /// Removes and returns the highest-priority pending message.
    ///
    /// Returns `Ok(None)` when nothing is pending.
    pub fn pull(&self) -> Result<Option<Message>, BrokerError> {
        // Lock scope ends here so the store read runs unlocked.
        let entry = self.queue().extract_max();

        let Some(entry) = entry else {
            debug!("Pull on empty queue");
            return Ok(None);
        };

        match self.store.fetch_and_delete(&entry.id) {
            Ok(payload) => Ok(Some(Message {
                id: entry.id,
                priority: entry.priority,
                payload,
            })),
            Err(StoreError::NotFound(id)) => {
                error!("Queue/store divergence: message {id} was queued but has no payload");
                Err(BrokerError::MissingPayload(id))
            }
            Err(e) => {
                error!(
                    "Message {} lost: extracted from queue but payload could not be read: {e}",
                    entry.id
                );
                Err(BrokerError::Store(e))
            }
        }
    }

    /// Number of messages waiting to be pulled.
    pub fn pending(&self) -> usize {
        self.queue().len()
    }

    /// Drops every message that has been pending for at least `ttl`, removing
    /// both its queue entry and its payload. Returns how many were purged.
    ///
    /// Missing payloads are logged and skipped. If a payload cannot be
    /// deleted its entry is restored to the queue with its original sequence,
    /// the sweep still visits the rest, and the first failure is reported.
    pub fn purge_expired(&self, ttl: Duration) -> Result<usize, BrokerError> {
        let Some(cutoff) = TimeDelta::from_std(ttl)
            .ok()
            .and_then(|age| Utc::now().checked_sub_signed(age))
        else {
            return Ok(0);
        };

        let expired = self.queue().remove_expired(cutoff);

        let mut purged = 0;
        let mut first_failure = None;
        let mut retained = Vec::new();
        for entry in expired {
            match self.store.fetch_and_delete(&entry.id) {
                Ok(_) => purged += 1,
                Err(StoreError::NotFound(id)) => {
                    warn!("Queue/store divergence: expired message {id} had no payload");
                }
                Err(e) => {
                    error!("Failed to delete payload of expired message {}: {e}", entry.id);
                    first_failure.get_or_insert(BrokerError::Store(e));
                    retained.push(entry);
                }
            }
        }

        if !retained.is_empty() {
            let mut queue = self.queue();
            for entry in retained {
                queue.restore(entry);
            }
        }

        match first_failure {
            Some(err) => Err(err),
            None => Ok(purged),
        }
    }

    pub fn store(&self) -> &dyn PayloadStore {
        self.store.as_ref()
    }

    fn queue(&self) -> MutexGuard<'_, PriorityQueue> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
