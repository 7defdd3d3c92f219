//! Module: event
//!
//! Purpose: EdgeEvent types for pin-transition events. Represents a single
//! electrical transition on one input line at a specific moment in time.
//!
//! Architecture:
//! - Compact 12-byte Copy structure, cheap to move through a ring buffer
//! - Timestamps are u32 milliseconds from a monotonic source; all elapsed-time
//!   math uses wrapping subtraction so correctness holds across timer overflow
//!
//! Safety: Safe. No unsafe blocks. Copy types only.

/// Line identifier as reported by the platform's pin event source.
pub type PinId = u32;

/// Monotonic timestamp in milliseconds.
///
/// Wraps after ~49.7 days. Never compare two timestamps directly; use
/// [`elapsed_ms`] so the comparison survives the wrap.
pub type Millis = u32;

/// Milliseconds elapsed from `then` to `now`, modulo the timer width.
///
/// Valid as long as the true gap is under half the u32 range, which holds
/// by orders of magnitude for the timeouts used here.
#[inline]
pub fn elapsed_ms(now: Millis, then: Millis) -> u32 {
    now.wrapping_sub(then)
}

/// Transition direction on a line.
///
/// Wiegand-26 readers signal a bit by toggling one of two lines; which line
/// toggled carries the bit value, the direction does not. The direction is
/// kept on the event for diagnostics only.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Edge {
    Falling = 0,
    Rising = 1,
}

impl Edge {
    /// Convert from a raw level reading (true = high after the transition).
    #[inline]
    pub fn from_level(high: bool) -> Self {
        if high {
            Edge::Rising
        } else {
            Edge::Falling
        }
    }
}

/// A single observed pin transition.
///
/// One of these is produced for every electrical edge on a registered line.
/// The event source guarantees no loss and no reordering within a single
/// pin's stream; nothing here re-checks that contract.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EdgeEvent {
    /// Which line fired.
    pub pin: PinId,

    /// When it fired, in monotonic milliseconds.
    pub at: Millis,

    /// Transition direction (diagnostic only; the decoder ignores it).
    pub edge: Edge,
}

impl EdgeEvent {
    /// Empty slot value for ring buffer initialization.
    pub const EMPTY: Self = Self {
        pin: 0,
        at: 0,
        edge: Edge::Falling,
    };

    /// Create an event.
    #[inline]
    pub const fn new(pin: PinId, at: Millis, edge: Edge) -> Self {
        Self { pin, at, edge }
    }
}
