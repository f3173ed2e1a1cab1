//! Pending-release channel between the interrupt handler and the dispatcher.
//!
//! The queue itself is not synchronized; the engine keeps it inside its
//! critical-section mutex, which also gives the interrupt handler's writes a
//! happens-before edge to the dispatcher's reads.

use crate::time::Tick;
use crate::types::PinId;
use heapless::Deque;

/// Default capacity of the pending-release channel.
pub const DEFAULT_QUEUE_LEN: usize = 2;

/// Snapshot of a completed depress/release pair, taken inside the interrupt handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PendingRelease {
    pub pin: PinId,
    pub pressed_at: Tick,
    pub released_at: Tick,
}

/// Bounded FIFO of [`PendingRelease`] records.
pub struct PendingQueue<const N: usize> {
    queue: Deque<PendingRelease, N>,
}

impl<const N: usize> PendingQueue<N> {
    pub const fn new() -> Self {
        Self {
            queue: Deque::new(),
        }
    }

    /// Appends a release. Never blocks; hands the record back when full.
    #[inline]
    pub fn try_send(&mut self, release: PendingRelease) -> Result<(), PendingRelease> {
        self.queue.push_back(release)
    }

    /// Takes the oldest release.
    #[inline]
    pub fn try_recv(&mut self) -> Option<PendingRelease> {
        self.queue.pop_front()
    }

    /// Drops every queued release for `pin`, keeping the order of the rest.
    ///
    /// Returns the number of records dropped.
    pub fn purge(&mut self, pin: PinId) -> usize {
        let mut dropped = 0;
        for _ in 0..self.queue.len() {
            if let Some(release) = self.queue.pop_front() {
                if release.pin == pin {
                    dropped += 1;
                } else {
                    // Cannot fail: one slot was just freed.
                    let _ = self.queue.push_back(release);
                }
            }
        }
        dropped
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl<const N: usize> Default for PendingQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}
