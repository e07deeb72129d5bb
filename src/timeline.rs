//! Virtual timeline for fixed-delay callbacks.
//!
//! Controllers never sleep. Instead they schedule a payload on their own
//! `Timeline` and the runtime advances every timeline by the wall-clock time
//! that passed between loop iterations. Tests advance by exact amounts.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::Duration;

struct Entry<T> {
    due: Duration,
    seq: u64,
    payload: T,
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl<T> Eq for Entry<T> {}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Entry<T> {
    // Reversed so the max-heap pops the earliest (due, seq) first.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due
            .cmp(&self.due)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// A queue of payloads that become due at fixed offsets from "now".
///
/// Scheduled payloads cannot be cancelled; callers that need to ignore a
/// stale payload tag it and check the tag when it fires.
pub struct Timeline<T> {
    now: Duration,
    next_seq: u64,
    pending: BinaryHeap<Entry<T>>,
}

impl<T> Default for Timeline<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Timeline<T> {
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_seq: 0,
            pending: BinaryHeap::new(),
        }
    }

    /// Time elapsed on this timeline since it was created.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Schedule `payload` to fire `delay` from now.
    pub fn schedule(&mut self, delay: Duration, payload: T) {
        let entry = Entry {
            due: self.now + delay,
            seq: self.next_seq,
            payload,
        };
        self.next_seq += 1;
        self.pending.push(entry);
    }

    /// Move time forward by `by` and return every payload that became due,
    /// earliest first. Payloads with the same due time keep scheduling order.
    pub fn advance(&mut self, by: Duration) -> Vec<T> {
        self.now += by;
        let mut fired = Vec::new();
        while let Some(top) = self.pending.peek() {
            if top.due > self.now {
                break;
            }
            if let Some(entry) = self.pending.pop() {
                fired.push(entry.payload);
            }
        }
        fired
    }
}
