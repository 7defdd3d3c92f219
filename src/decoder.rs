//! Wiegand-26 bit-accumulation state machine.
//!
//! Pure logic, no hardware dependencies. Consumes timed pin-transition
//! events, produces 26-bit card identifiers. Fully testable on host.
//!
//! # Protocol
//!
//! A Wiegand-26 reader drives two open-collector lines, D0 and D1. For each
//! bit of the card code it pulses exactly one of them: a pulse on D0 shifts
//! in a zero, a pulse on D1 shifts in a one. Only *which* line fired is
//! significant; the transition direction is not.
//!
//! # Bit order
//!
//! Bits are accumulated MSB-first: existing bits shift left and the new bit
//! enters at the low end, so the first transition of a frame becomes the
//! most significant of the 26 bits. Whether that matches a given reader's
//! emission order must be verified against the hardware.

use log::{debug, trace};

use crate::event::{elapsed_ms, EdgeEvent, Millis, PinId};
use crate::latch::IdLatch;

/// Decoder timing and framing parameters.
///
/// Defaults match the Wiegand-26 protocol: 26-bit frames, a 25 ms inter-bit
/// timeout (the spec allows 200 µs to 20 ms between pulses, so 25 ms is
/// safely past any compliant reader), and a 500 ms shelf life for a decoded
/// identifier awaiting pickup.
#[derive(Clone, Copy, Debug)]
pub struct WiegandConfig {
    /// Bits per frame. At most 32.
    pub frame_bits: u8,

    /// Maximum gap between consecutive bits of one frame, in milliseconds.
    /// A longer gap discards the partial frame.
    pub read_timeout_ms: u32,

    /// Maximum age of a completed identifier before it is discarded
    /// unconsumed, in milliseconds.
    pub id_timeout_ms: u32,
}

impl WiegandConfig {
    /// Standard Wiegand-26 configuration.
    pub const fn wiegand26() -> Self {
        Self {
            frame_bits: 26,
            read_timeout_ms: 25,
            id_timeout_ms: 500,
        }
    }
}

impl Default for WiegandConfig {
    fn default() -> Self {
        Self::wiegand26()
    }
}

/// Wiegand-26 decoder for one physical reader.
///
/// Owns a single in-progress accumulation session and a single completed
/// identifier. There is no queue: a card swiped while a previous result is
/// still unconsumed silently replaces it.
///
/// Nothing checks that two decoders don't bind the same pin, or that the
/// two pins of one decoder are distinct; that is the caller's
/// responsibility. Debug builds report conflicts through the global
/// [pin registry](crate::registry) as a log warning.
///
/// # Example
///
/// ```
/// use wiegand26::{WiegandConfig, WiegandDecoder};
///
/// let mut door = WiegandDecoder::new(WiegandConfig::wiegand26());
/// door.attach(2, 3);
///
/// // Delivered by the platform's pin event source, one call per edge:
/// for now_ms in 0..26 {
///     door.on_transition(3, now_ms); // all pulses on the one-line
/// }
///
/// assert_eq!(door.get_id(26), 0x3FF_FFFF);
/// assert_eq!(door.get_id(26), 0); // consumed
/// ```
pub struct WiegandDecoder {
    config: WiegandConfig,

    /// Bound (zero-line, one-line) pair, `None` while detached.
    pins: Option<(PinId, PinId)>,

    // In-progress accumulation session
    read_value: u32,
    read_count: u8,
    read_time: Millis,

    /// Completed identifier awaiting pickup.
    id: IdLatch,
}

impl WiegandDecoder {
    /// Create a detached decoder with the given configuration.
    pub const fn new(config: WiegandConfig) -> Self {
        Self {
            config,
            pins: None,
            read_value: 0,
            read_count: 0,
            read_time: 0,
            id: IdLatch::new(),
        }
    }

    /// Get current configuration.
    pub fn config(&self) -> &WiegandConfig {
        &self.config
    }

    /// Bind the decoder to its two input lines and reset all state.
    ///
    /// `zero_pin` shifts in a 0 when it fires, `one_pin` a 1. The pins must
    /// be distinct and not bound by another decoder; neither is enforced
    /// here. Any pending identifier from a previous attachment is dropped.
    pub fn attach(&mut self, zero_pin: PinId, one_pin: PinId) {
        self.release_claims();

        self.pins = Some((zero_pin, one_pin));
        self.read_reset();
        self.id.clear();

        #[cfg(debug_assertions)]
        {
            crate::registry::debug_claim(zero_pin);
            crate::registry::debug_claim(one_pin);
        }

        trace!("decoder attached (zero_pin={zero_pin}, one_pin={one_pin})");
    }

    /// Unbind the decoder from its input lines.
    ///
    /// Later transition events for the old pins are ignored without fault.
    /// A completed identifier stays queryable until consumed or stale; only
    /// the in-progress session is abandoned.
    pub fn detach(&mut self) {
        self.release_claims();
        self.pins = None;
        self.read_reset();
        trace!("decoder detached");
    }

    /// Whether the decoder is currently bound to a pin pair.
    pub fn is_attached(&self) -> bool {
        self.pins.is_some()
    }

    /// Process one pin transition, delivered by the pin event source.
    ///
    /// Called once per electrical edge on either bound line. Events for
    /// unbound pins, and all events while detached, are ignored.
    pub fn on_transition(&mut self, pin: PinId, now: Millis) {
        let Some((zero_pin, one_pin)) = self.pins else {
            return;
        };

        let bit = if pin == zero_pin {
            0
        } else if pin == one_pin {
            1
        } else {
            debug!("transition on unrecognized pin {pin} ignored");
            return;
        };

        // A gap past the inter-bit timeout means the previous read was
        // interrupted; its bits must never merge with the new frame.
        if self.read_count > 0 && elapsed_ms(now, self.read_time) > self.config.read_timeout_ms {
            debug!(
                "inter-bit timeout, {} partial bits discarded",
                self.read_count
            );
            self.read_reset();
        }

        self.shift_in(bit, now);
    }

    /// Process one queued edge event. See [`on_transition`](Self::on_transition).
    #[inline]
    pub fn on_event(&mut self, event: EdgeEvent) {
        self.on_transition(event.pin, event.at);
    }

    /// Retrieve a decoded identifier, if one is pending and fresh.
    ///
    /// Non-blocking. Returns 0 when no identifier is available: never
    /// completed, already consumed, or stale (older than
    /// `id_timeout_ms`; a stale identifier is discarded, not delivered
    /// late). A non-zero identifier is returned exactly once.
    ///
    /// Zero is reserved to mean "none", so a genuine all-zero card code is
    /// indistinguishable from no card. Accepted protocol limitation.
    pub fn get_id(&self, now: Millis) -> u32 {
        match self.id.take_fresh(now, self.config.id_timeout_ms) {
            Some((id, _)) => id,
            None => 0,
        }
    }

    /// Shift one bit into the in-progress session.
    fn shift_in(&mut self, bit: u32, now: Millis) {
        self.read_value = (self.read_value << 1) | bit;
        self.read_count += 1;
        self.read_time = now;

        if self.read_count >= self.config.frame_bits {
            if self.id.is_pending() {
                debug!("unconsumed identifier overwritten by new frame");
            }
            trace!(
                "frame complete: {:#09x} ({} bits)",
                self.read_value,
                self.read_count
            );
            self.id.publish(self.read_value, now);
            self.read_reset();
        }
    }

    /// Reset the in-progress session.
    fn read_reset(&mut self) {
        self.read_value = 0;
        self.read_count = 0;
        self.read_time = 0;
    }

    /// Release debug registry claims for the currently bound pins.
    fn release_claims(&mut self) {
        #[cfg(debug_assertions)]
        if let Some((zero_pin, one_pin)) = self.pins {
            crate::registry::debug_release(zero_pin);
            crate::registry::debug_release(one_pin);
        }
    }
}

impl Drop for WiegandDecoder {
    fn drop(&mut self) {
        self.release_claims();
    }
}
