use std::cmp::Ordering;
use std::collections::BinaryHeap;

use chrono::{DateTime, Utc};

use crate::broker::message::MessageId;

/// A pending message reference held by the priority queue.
///
/// The payload itself lives in the store; the entry only carries what is
/// needed to order deliveries.
#[derive(Debug, Clone)]
pub struct QueueEntry {
    pub id: MessageId,
    pub priority: i64,
    /// Insertion counter, breaks ties between equal priorities.
    pub sequence: u64,
    pub enqueued_at: DateTime<Utc>,
}

// Heap order: higher priority first, then lower sequence first.
impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority
            .cmp(&other.priority)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueueEntry {}

/// Max-heap of pending entries ordered by `(priority desc, sequence asc)`.
///
/// Not synchronized: the broker keeps it behind a single mutex together with
/// the sequence counter.
#[derive(Debug, Default)]
pub struct PriorityQueue {
    heap: BinaryHeap<QueueEntry>,
    next_sequence: u64,
}

impl PriorityQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `id` with `priority`, stamped with the current time.
    /// Returns the sequence number assigned to the entry.
    pub fn insert(&mut self, id: MessageId, priority: i64) -> u64 {
        self.insert_at(id, priority, Utc::now())
    }

    pub fn insert_at(&mut self, id: MessageId, priority: i64, enqueued_at: DateTime<Utc>) -> u64 {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.heap.push(QueueEntry {
            id,
            priority,
            sequence,
            enqueued_at,
        });
        sequence
    }

    /// Puts back an entry taken out earlier, keeping its sequence number.
    pub fn restore(&mut self, entry: QueueEntry) {
        self.heap.push(entry);
    }

    /// Removes the highest-priority entry, oldest first among equals.
    /// `None` means nothing is pending.
    pub fn extract_max(&mut self) -> Option<QueueEntry> {
        self.heap.pop()
    }

    /// Removes every entry enqueued at or before `cutoff` and returns them in
    /// delivery order.
    pub fn remove_expired(&mut self, cutoff: DateTime<Utc>) -> Vec<QueueEntry> {
        let (mut expired, live): (Vec<_>, Vec<_>) = std::mem::take(&mut self.heap)
            .into_vec()
            .into_iter()
            .partition(|entry| entry.enqueued_at <= cutoff);
        self.heap = BinaryHeap::from(live);
        expired.sort_by(|a, b| b.cmp(a));
        expired
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
