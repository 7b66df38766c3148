//! Benchmark worker
//!
//! A worker owns one contiguous slice of the shared operation sequence and
//! drains it against a set, drawing a fresh random key for every operation.

use rand::Rng;
use std::ops::Range;

use crate::models::WorkerCounters;
use crate::set::{Key, SetAccess};
use crate::workload::Operation;

/// One worker's assignment within a trial
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Worker {
    /// Worker index within the trial
    pub id: usize,
    /// Half-open range of the operation sequence this worker executes
    pub slice: Range<usize>,
    /// Keys are drawn from `[0, key_space)`
    pub key_space: Key,
}

impl Worker {
    /// Create a new worker for `slice`
    pub fn new(id: usize, slice: Range<usize>, key_space: Key) -> Self {
        Self {
            id,
            slice,
            key_space,
        }
    }

    fn draw_key<R: Rng + ?Sized>(&self, rng: &mut R) -> Key {
        rng.gen_range(0..self.key_space)
    }

    /// Execute this worker's slice of `ops` against `target`, in order.
    ///
    /// Insert keeps drawing keys until a Member probe finds one absent, then
    /// inserts it. Probe and insert lock separately, so another worker may
    /// take the key in between; that insert then returns false and is not
    /// counted.
    pub fn drain<S, R>(&self, ops: &[Operation], target: &mut S, rng: &mut R) -> WorkerCounters
    where
        S: SetAccess + ?Sized,
        R: Rng + ?Sized,
    {
        let mut counters = WorkerCounters::default();

        for &op in &ops[self.slice.clone()] {
            let mut key = self.draw_key(rng);
            match op {
                Operation::Member => {
                    if target.member(key) {
                        counters.member_hits += 1;
                    }
                }
                Operation::Insert => {
                    while target.member(key) {
                        counters.insert_redraws += 1;
                        key = self.draw_key(rng);
                    }
                    if target.insert(key) {
                        counters.insert_ok += 1;
                    }
                }
                Operation::Delete => {
                    if target.delete(key) {
                        counters.delete_ok += 1;
                    }
                }
            }
            counters.executed.record(op);
        }

        counters
    }
}
