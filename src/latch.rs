//! Atomic identifier latch.
//!
//! Holds the single most recent completed card identifier together with its
//! capture timestamp. The decoder publishes into the latch from the event
//! intake path; the application consumes from it via `get_id`. Packing both
//! words into one `AtomicU64` makes consume-on-read a single swap, so a
//! reader can never observe an identifier paired with the wrong timestamp
//! even when intake and consumption run on different execution contexts.
//!
//! There is deliberately no queue: a new identifier overwrites an unconsumed
//! one, and the overwritten value is unrecoverable.

use core::sync::atomic::{AtomicU64, Ordering};

use crate::event::{elapsed_ms, Millis};

/// Packed empty state: no identifier pending.
///
/// An all-zero identifier captured at timestamp 0 packs to the same word;
/// zero is reserved as "none" by the protocol contract, so that collision
/// is accepted.
const EMPTY: u64 = 0;

#[inline]
const fn pack(id: u32, at: Millis) -> u64 {
    ((at as u64) << 32) | id as u64
}

#[inline]
const fn unpack(word: u64) -> (u32, Millis) {
    (word as u32, (word >> 32) as u32)
}

/// Single-slot latch for a completed identifier.
///
/// # Memory Ordering
///
/// - `publish` uses `Release` so a consumer that observes the new word also
///   observes everything the producer wrote before it
/// - `take` uses `AcqRel` swap: acquires the published word and clears the
///   slot in one step, so two racing consumers cannot both receive it
pub struct IdLatch {
    slot: AtomicU64,
}

impl IdLatch {
    /// Create an empty latch.
    pub const fn new() -> Self {
        Self {
            slot: AtomicU64::new(EMPTY),
        }
    }

    /// Publish a completed identifier captured at `at`.
    ///
    /// Overwrites any unconsumed identifier; the previous value is lost.
    #[inline]
    pub fn publish(&self, id: u32, at: Millis) {
        self.slot.store(pack(id, at), Ordering::Release);
    }

    /// Consume the pending identifier if it is still fresh.
    ///
    /// Returns `Some((id, captured_at))` when an identifier is pending and
    /// its age at `now` is within `max_age_ms`. Returns `None` when the slot
    /// is empty or the pending value has gone stale; a stale value is
    /// discarded by the same swap that would have delivered it, so it can
    /// never be returned by a later call.
    #[inline]
    pub fn take_fresh(&self, now: Millis, max_age_ms: u32) -> Option<(u32, Millis)> {
        let word = self.slot.swap(EMPTY, Ordering::AcqRel);
        if word == EMPTY {
            return None;
        }

        let (id, at) = unpack(word);
        let age = elapsed_ms(now, at);
        if age > max_age_ms {
            log::debug!("stale identifier discarded (age {age} ms, limit {max_age_ms} ms)");
            return None;
        }

        Some((id, at))
    }

    /// Discard any pending identifier.
    #[inline]
    pub fn clear(&self) {
        self.slot.store(EMPTY, Ordering::Release);
    }

    /// Check whether an identifier is pending (freshness not considered).
    ///
    /// Diagnostic only; racing with `take_fresh` makes the answer advisory.
    #[inline]
    pub fn is_pending(&self) -> bool {
        self.slot.load(Ordering::Acquire) != EMPTY
    }
}

impl Default for IdLatch {
    fn default() -> Self {
        Self::new()
    }
}
