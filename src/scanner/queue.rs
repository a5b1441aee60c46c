//! Shared work queue of ports to probe.
//!
//! The port order is fixed when the queue is built (ascending, or a uniform
//! shuffle for stealth scans). Workers then claim ports through an atomic
//! cursor, so every port is handed out exactly once without a lock.

use crate::types::{Port, PortRange};
use rand::seq::SliceRandom;
use rand::Rng;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug)]
pub struct WorkQueue {
    ports: Vec<Port>,
    cursor: AtomicUsize,
}

impl WorkQueue {
    /// Queue over an explicit port list, in the given order.
    pub fn new(ports: Vec<Port>) -> Self {
        Self {
            ports,
            cursor: AtomicUsize::new(0),
        }
    }

    /// Queue over a full inclusive range, shuffled when `randomize` is set.
    pub fn from_range(range: PortRange, randomize: bool) -> Self {
        let ports: Vec<Port> = range.iter().collect();
        if randomize {
            Self::shuffled_with(ports, &mut rand::thread_rng())
        } else {
            Self::new(ports)
        }
    }

    /// Fisher-Yates shuffle with a caller-supplied RNG.
    pub fn shuffled_with<R: Rng + ?Sized>(mut ports: Vec<Port>, rng: &mut R) -> Self {
        ports.shuffle(rng);
        Self::new(ports)
    }

    /// Claim the next port, or `None` once the queue is drained.
    pub fn next(&self) -> Option<Port> {
        let index = self.cursor.fetch_add(1, Ordering::Relaxed);
        self.ports.get(index).copied()
    }

    /// Total number of ports the queue was built with.
    pub fn len(&self) -> usize {
        self.ports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ports.is_empty()
    }

    /// Ports not yet claimed.
    pub fn remaining(&self) -> usize {
        self.len()
            .saturating_sub(self.cursor.load(Ordering::Relaxed))
    }

    /// The probe order.
    pub fn order(&self) -> &[Port] {
        &self.ports
    }
}
