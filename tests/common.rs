//! Shared helpers for the syncfifo test suite

#![allow(dead_code)]

use syncfifo_core::prelude::{BoundedQueue, QueueConfig, TickInput, TickOutput};

/// Fresh u64 queue with the given depth and default policy.
pub fn queue(depth: usize) -> BoundedQueue<u64> {
    BoundedQueue::new(depth).expect("valid depth")
}

pub fn queue_with(cfg: &QueueConfig) -> BoundedQueue<u64> {
    BoundedQueue::with_config(cfg).expect("valid config")
}

pub fn write(q: &mut BoundedQueue<u64>, v: u64) -> TickOutput<u64> {
    q.step(TickInput::write(v))
}

pub fn read(q: &mut BoundedQueue<u64>) -> TickOutput<u64> {
    q.step(TickInput::read())
}

/// Fill the queue to capacity with `base, base+1, ...`.
pub fn fill(q: &mut BoundedQueue<u64>, base: u64) -> Vec<u64> {
    let values: Vec<u64> = (0..q.capacity() as u64).map(|i| base + i).collect();
    for &v in &values {
        let out = write(q, v);
        assert!(out.wrote, "write of {} refused while filling", v);
    }
    values
}

/// Deterministic pseudo-random tick inputs (64-bit LCG).
pub fn random_inputs(seed: u64, ticks: usize, reset_every: Option<usize>) -> Vec<TickInput<u64>> {
    let mut state = seed;
    let mut next = || {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        state >> 33
    };
    (0..ticks)
        .map(|i| {
            let bits = next();
            TickInput {
                reset: reset_every.map_or(false, |k| i > 0 && i % k == 0),
                write: bits & 1 == 1,
                read: bits & 2 == 2,
                value: bits >> 2,
            }
        })
        .collect()
}
