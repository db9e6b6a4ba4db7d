//! Pending-write queue.
//!
//! A fixed-capacity ring buffer of delayed register updates, modeling
//! results that become architecturally visible one issue slot after the
//! instruction that produced them (HI/LO fills, floating-point condition
//! bits). Entries drain strictly in FIFO order once their delay reaches
//! zero; an entry whose delay has not expired blocks everything behind it.
//! Overflow is an engine fault, not a guest-visible event.

use crate::common::constants::PENDING_QUEUE_CAPACITY;
use crate::common::SimFault;

/// Destination of a delayed write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingTarget {
    /// The HI multiply/divide result register.
    Hi,
    /// The LO multiply/divide result register.
    Lo,
    /// One floating-point condition-code bit; the value's low bit is the
    /// new state.
    Fcc {
        /// Condition-code index (0-7).
        index: u8,
    },
}

/// A scheduled register update.
#[derive(Debug, Clone, Copy)]
pub struct PendingWrite {
    /// Where the value lands.
    pub target: PendingTarget,
    /// The value to write.
    pub value: u64,
    /// Ticks remaining before the write applies.
    pub delay: u8,
}

/// The delayed-write ring buffer.
#[derive(Debug, Default)]
pub struct PendingQueue {
    entries: [Option<PendingWrite>; PENDING_QUEUE_CAPACITY],
    head: usize,
    len: usize,
}

impl PendingQueue {
    /// Schedules a write `delay` ticks in the future.
    ///
    /// # Errors
    ///
    /// [`SimFault::PendingQueueOverflow`] when the queue is full; this
    /// indicates broken drain bookkeeping, never a guest-program error.
    pub fn push(&mut self, target: PendingTarget, value: u64, delay: u8) -> Result<(), SimFault> {
        if self.len == PENDING_QUEUE_CAPACITY {
            return Err(SimFault::PendingQueueOverflow {
                capacity: PENDING_QUEUE_CAPACITY,
            });
        }
        let slot = (self.head + self.len) % PENDING_QUEUE_CAPACITY;
        self.entries[slot] = Some(PendingWrite {
            target,
            value,
            delay,
        });
        self.len += 1;
        Ok(())
    }

    /// Number of outstanding entries.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True when nothing is scheduled.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Advances one tick: decrements every delay, then applies expired
    /// entries from the front in FIFO order. An unexpired entry stops the
    /// drain even if later entries have expired.
    pub fn drain_tick(&mut self, mut apply: impl FnMut(&PendingWrite)) {
        for i in 0..self.len {
            let slot = (self.head + i) % PENDING_QUEUE_CAPACITY;
            if let Some(entry) = self.entries[slot].as_mut() {
                entry.delay = entry.delay.saturating_sub(1);
            }
        }
        while self.len > 0 {
            let slot = self.head;
            let Some(entry) = self.entries[slot] else {
                break;
            };
            if entry.delay > 0 {
                break;
            }
            apply(&entry);
            self.entries[slot] = None;
            self.head = (self.head + 1) % PENDING_QUEUE_CAPACITY;
            self.len -= 1;
        }
    }

    /// Discards everything scheduled; used when exception entry squashes
    /// in-flight results.
    pub fn clear(&mut self) {
        self.entries = [None; PENDING_QUEUE_CAPACITY];
        self.head = 0;
        self.len = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drains_in_fifo_order_on_the_same_tick() {
        let mut q = PendingQueue::default();
        q.push(PendingTarget::Hi, 1, 1).unwrap();
        q.push(PendingTarget::Lo, 2, 1).unwrap();
        let mut order = Vec::new();
        q.drain_tick(|w| order.push(w.value));
        assert_eq!(order, vec![1, 2]);
        assert!(q.is_empty());
    }

    #[test]
    fn unexpired_head_blocks_later_entries() {
        let mut q = PendingQueue::default();
        q.push(PendingTarget::Hi, 1, 2).unwrap();
        q.push(PendingTarget::Lo, 2, 1).unwrap();
        let mut applied = Vec::new();
        q.drain_tick(|w| applied.push(w.value));
        // LO expired but sits behind the still-pending HI write.
        assert!(applied.is_empty());
        q.drain_tick(|w| applied.push(w.value));
        assert_eq!(applied, vec![1, 2]);
    }

    #[test]
    fn overflow_is_a_simulator_fault() {
        let mut q = PendingQueue::default();
        for i in 0..PENDING_QUEUE_CAPACITY {
            q.push(PendingTarget::Hi, i as u64, 1).unwrap();
        }
        let err = q.push(PendingTarget::Lo, 0, 1).unwrap_err();
        assert_eq!(
            err,
            SimFault::PendingQueueOverflow {
                capacity: PENDING_QUEUE_CAPACITY
            }
        );
    }
}
