//! Lock-free ring buffer of pin-transition events.
//!
//! For platforms that cannot run the decoder inside the pin-change
//! interrupt, the ISR pushes an [`EdgeEvent`] here and the application
//! context drains it into the decoder. The buffer is single-producer
//! (one interrupt context per reader) with one consuming cursor.
//!
//! ```text
//! Pin Event Source ──▶ EdgeStream ──▶ EdgeReader::pump ──▶ WiegandDecoder
//!     (ISR)            (lock-free)        (app loop)
//! ```
//!
//! Order within the buffer is preserved, so the per-pin no-reordering
//! contract of the event source carries through. If the consumer falls a
//! full buffer behind, events are overwritten; the reader detects the
//! overrun and resyncs. The cost is a missed card, never a corrupted one:
//! the decoder's inter-bit timeout discards any frame whose bits were
//! dropped.

use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicU32, Ordering};

use crate::decoder::WiegandDecoder;
use crate::event::EdgeEvent;

/// Default stream size: 64 events.
/// A Wiegand frame is 26 pulses, so this holds two full frames plus slack.
pub const DEFAULT_STREAM_SIZE: usize = 64;

/// Lock-free SPSC ring buffer for pin-transition events.
///
/// # Safety
///
/// This type uses `UnsafeCell` internally but is safe to use because:
/// - Single producer (enforced by design, not by type system)
/// - The consumer maintains its own read index and never writes slots
/// - All coordination through atomic operations
///
/// # Memory Ordering
///
/// - Producer uses `AcqRel` for `write_idx.fetch_add()`
/// - Consumer uses `Acquire` for `write_idx.load()`
/// - This ensures the consumer sees the slot write before the index update
pub struct EdgeStream<const N: usize = DEFAULT_STREAM_SIZE> {
    /// Ring buffer of events.
    slots: UnsafeCell<[EdgeEvent; N]>,

    /// Next write index (monotonically increasing, wraps via mask).
    write_idx: AtomicU32,
}

// SAFETY: Single producer, read-only consumers, atomic coordination.
// No mutable aliasing possible within the architectural rules.
unsafe impl<const N: usize> Sync for EdgeStream<N> {}
unsafe impl<const N: usize> Send for EdgeStream<N> {}

impl<const N: usize> EdgeStream<N> {
    /// Mask for wrapping index to buffer size.
    /// N must be a power of 2.
    const MASK: usize = N - 1;

    /// Create a new empty stream.
    ///
    /// # Panics
    ///
    /// Panics at compile time if N is not a power of 2.
    pub const fn new() -> Self {
        assert!(N.is_power_of_two(), "Stream size must be power of 2");

        Self {
            slots: UnsafeCell::new([EdgeEvent::EMPTY; N]),
            write_idx: AtomicU32::new(0),
        }
    }

    /// Push an event.
    ///
    /// O(1), never blocks, never allocates; safe to call from an interrupt
    /// context. The oldest event is overwritten when the buffer is full.
    #[inline]
    pub fn push(&self, event: EdgeEvent) {
        let idx = self.write_idx.fetch_add(1, Ordering::AcqRel) as usize;

        // SAFETY: Single producer, index is unique
        unsafe {
            (*self.slots.get())[idx & Self::MASK] = event;
        }
    }

    /// Read the event at the given index.
    ///
    /// Returns `None` if the index is ahead of the write head (not yet
    /// written) or too far behind (overwritten).
    #[inline]
    pub fn read(&self, idx: u32) -> Option<EdgeEvent> {
        let write = self.write_idx.load(Ordering::Acquire);
        let behind = write.wrapping_sub(idx);

        if behind == 0 {
            return None;
        }
        if behind > N as u32 {
            return None;
        }

        // SAFETY: Index is valid, single producer guarantees no concurrent
        // write to a slot the consumer is still entitled to
        Some(unsafe { (*self.slots.get())[(idx as usize) & Self::MASK] })
    }

    /// Get the current write head index.
    #[inline]
    pub fn write_head(&self) -> u32 {
        self.write_idx.load(Ordering::Acquire)
    }

    /// How many events behind a consumer is.
    #[inline]
    pub fn lag(&self, reader_idx: u32) -> u32 {
        self.write_idx.load(Ordering::Acquire).wrapping_sub(reader_idx)
    }

    /// Whether a consumer has fallen a full buffer behind and lost events.
    #[inline]
    pub fn is_overrun(&self, reader_idx: u32) -> bool {
        self.lag(reader_idx) > N as u32
    }

    /// Get the buffer capacity.
    #[inline]
    pub const fn capacity(&self) -> usize {
        N
    }
}

impl<const N: usize> Default for EdgeStream<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Consuming cursor over an [`EdgeStream`].
///
/// Best-effort: it never faults. On overrun it logs, skips forward to the
/// oldest surviving event, and keeps going; the lost pulses surface as a
/// frame the decoder times out.
pub struct EdgeReader<'a, const N: usize = DEFAULT_STREAM_SIZE> {
    stream: &'a EdgeStream<N>,
    read_idx: u32,
}

impl<'a, const N: usize> EdgeReader<'a, N> {
    /// Create a reader positioned at the current write head.
    pub fn new(stream: &'a EdgeStream<N>) -> Self {
        Self {
            stream,
            read_idx: stream.write_head(),
        }
    }

    /// Read the next event, if any.
    ///
    /// Resyncs past any overrun before reading.
    #[inline]
    pub fn next_event(&mut self) -> Option<EdgeEvent> {
        if self.stream.is_overrun(self.read_idx) {
            let lost = self.stream.lag(self.read_idx) - N as u32;
            log::debug!("edge stream overrun, {lost} events lost, resyncing");
            self.resync_oldest();
        }

        let event = self.stream.read(self.read_idx)?;
        self.read_idx = self.read_idx.wrapping_add(1);
        Some(event)
    }

    /// Drain all pending events into a decoder.
    ///
    /// Returns the number of events delivered.
    pub fn pump(&mut self, decoder: &mut WiegandDecoder) -> usize {
        let mut delivered = 0;
        while let Some(event) = self.next_event() {
            decoder.on_event(event);
            delivered += 1;
        }
        delivered
    }

    /// How many events are waiting.
    #[inline]
    pub fn pending(&self) -> u32 {
        self.stream.lag(self.read_idx)
    }

    /// Jump to the oldest event still present in the buffer.
    fn resync_oldest(&mut self) {
        self.read_idx = self.stream.write_head().wrapping_sub(N as u32);
    }
}
