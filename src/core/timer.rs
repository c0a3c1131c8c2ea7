use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashSet};

use chrono::{DateTime, Utc};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

#[derive(Debug)]
struct Entry<T> {
    due: DateTime<Utc>,
    handle: TimerHandle,
    payload: T,
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.handle == other.handle
    }
}

impl<T> Eq for Entry<T> {}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

// Handles grow monotonically, so equal due times fire in scheduling order.
impl<T> Ord for Entry<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.due, self.handle).cmp(&(other.due, other.handle))
    }
}

/// One-shot timers for a single-threaded, poll-driven loop.
///
/// Nothing fires on its own: the owner calls [`TimerQueue::pop_due`] with the
/// current instant. Cancelled timers are dropped lazily when they reach the
/// front of the queue.
#[derive(Debug)]
pub struct TimerQueue<T> {
    heap: BinaryHeap<Reverse<Entry<T>>>,
    cancelled: HashSet<TimerHandle>,
    next_id: u64,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            cancelled: HashSet::new(),
            next_id: 0,
        }
    }

    pub fn schedule_at(&mut self, due: DateTime<Utc>, payload: T) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        self.heap.push(Reverse(Entry {
            due,
            handle,
            payload,
        }));
        handle
    }

    /// Returns false if the timer already fired or was cancelled before.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let pending = self
            .heap
            .iter()
            .any(|Reverse(entry)| entry.handle == handle);
        pending && self.cancelled.insert(handle)
    }

    pub fn next_due(&mut self) -> Option<DateTime<Utc>> {
        self.discard_cancelled_front();
        self.heap.peek().map(|Reverse(entry)| entry.due)
    }

    pub fn pop_due(&mut self, now: DateTime<Utc>) -> Option<(TimerHandle, T)> {
        self.discard_cancelled_front();
        match self.heap.peek() {
            Some(Reverse(entry)) if entry.due <= now => {}
            _ => return None,
        }
        self.heap
            .pop()
            .map(|Reverse(entry)| (entry.handle, entry.payload))
    }

    pub fn len(&self) -> usize {
        self.heap.len() - self.cancelled.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn discard_cancelled_front(&mut self) {
        while let Some(Reverse(entry)) = self.heap.peek() {
            if !self.cancelled.remove(&entry.handle) {
                break;
            }
            self.heap.pop();
        }
    }
}
