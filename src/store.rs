//! bounded fifo store for closed spans.
use super::span::SpanRecord;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

/// fixed-capacity holding area for closed, sampled spans.
///
/// a push past capacity evicts the oldest entry first. order is strictly
/// insertion order: a span closed late is appended at push time, never
/// reordered by its timestamps.
#[derive(Debug)]
pub(crate) struct SpanStore {
    buffer: Mutex<VecDeque<SpanRecord>>,
    capacity: usize,
}

impl SpanStore {
    /// capacity must be validated by the caller (the tracer constructor).
    pub(crate) fn new(capacity: usize) -> Self {
        debug_assert!(capacity > 0);
        SpanStore {
            buffer: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    /// append a record, evicting the oldest one when full.
    /// the lock covers one buffer write and nothing else.
    pub(crate) fn push(&self, record: SpanRecord) {
        let evicted = {
            let mut buffer = lock(&self.buffer);
            let evicted = if buffer.len() == self.capacity {
                buffer.pop_front()
            } else {
                None
            };
            buffer.push_back(record);
            evicted
        };
        if let Some(evicted) = evicted {
            tracing::trace!(id = evicted.id, "span store full, evicted oldest span");
        }
    }

    /// point-in-time copy of the buffer, oldest first.
    pub(crate) fn snapshot(&self) -> Vec<SpanRecord> {
        lock(&self.buffer).iter().cloned().collect()
    }

    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    /// look a stored record up by span id.
    pub(crate) fn find(&self, id: u64) -> Option<SpanRecord> {
        lock(&self.buffer).iter().find(|record| record.id == id).cloned()
    }

    /// the `n` most recently stored records, newest last.
    pub(crate) fn last(&self, n: usize) -> Vec<SpanRecord> {
        let buffer = lock(&self.buffer);
        let skipped = buffer.len().saturating_sub(n);
        buffer.iter().skip(skipped).cloned().collect()
    }
}

// a poisoned buffer must not take the instrumented application down;
// the records inside are still intact.
fn lock(buffer: &Mutex<VecDeque<SpanRecord>>) -> MutexGuard<'_, VecDeque<SpanRecord>> {
    buffer.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
