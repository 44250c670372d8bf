//! Single-slot frame hand-off between a producer thread and the tick loop.
//!
//! The producer never blocks and never queues: a frame offered while the
//! previous one is still unconsumed replaces it, and the replacement is
//! counted.  The consumer takes at most one frame per tick, so at most one
//! tick is ever in flight no matter how fast frames arrive.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug)]
pub struct FrameSlot<T> {
    slot:      Mutex<Option<T>>,
    coalesced: AtomicU64,
    offered:   AtomicU64,
    closed:    AtomicBool,
}

impl<T> FrameSlot<T> {
    pub fn new() -> Self {
        FrameSlot {
            slot:      Mutex::new(None),
            coalesced: AtomicU64::new(0),
            offered:   AtomicU64::new(0),
            closed:    AtomicBool::new(false),
        }
    }

    // A panicking producer must not wedge the consumer.
    fn lock(&self) -> MutexGuard<'_, Option<T>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Deposit `frame`.  Returns `true` when it replaced an unconsumed one.
    pub fn offer(&self, frame: T) -> bool {
        self.offered.fetch_add(1, Ordering::Relaxed);
        let replaced = self.lock().replace(frame).is_some();
        if replaced {
            self.coalesced.fetch_add(1, Ordering::Relaxed);
        }
        replaced
    }

    /// Take the pending frame, if any.
    pub fn take(&self) -> Option<T> {
        self.lock().take()
    }

    pub fn has_pending(&self) -> bool {
        self.lock().is_some()
    }

    /// Frames dropped because a newer one arrived first.
    pub fn coalesced(&self) -> u64 {
        self.coalesced.load(Ordering::Relaxed)
    }

    /// Frames offered since construction.
    pub fn offered(&self) -> u64 {
        self.offered.load(Ordering::Relaxed)
    }

    /// Ask the producer to stop.  Pending frames stay takeable.
    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}

impl<T> Default for FrameSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}
