//! Debug-build pin ownership registry.
//!
//! Nothing in the decoder enforces that two instances don't bind the same
//! pin; that precondition belongs to the caller. This registry exists to
//! *surface* violations, not to enforce ownership: decoders claim their
//! pins here in debug builds and a double-claim produces a log warning.
//! Release builds never touch it.
//!
//! Applications that want hard enforcement can call [`claim`] on the global
//! table themselves and act on the `Err`.
//!
//! Lock-free: a fixed array of atomic slots, claims installed with
//! compare-exchange.

use core::sync::atomic::{AtomicU32, Ordering};

use thiserror::Error;

use crate::event::PinId;

/// Maximum simultaneously claimed pins (8 two-line readers).
pub const REGISTRY_CAPACITY: usize = 16;

/// Slot value meaning "unclaimed". Pin id `u32::MAX` is reserved and is
/// never tracked by the registry.
const VACANT: u32 = u32::MAX;

/// Why a pin claim was rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PinClaimError {
    /// The pin is already claimed, by another decoder or by the same
    /// decoder's other line.
    #[error("pin {0} is already claimed")]
    AlreadyClaimed(PinId),

    /// All claim slots are occupied.
    #[error("pin registry full ({REGISTRY_CAPACITY} claims)")]
    TableFull,
}

/// Fixed-capacity table of claimed pins.
pub struct PinRegistry {
    slots: [AtomicU32; REGISTRY_CAPACITY],
}

impl PinRegistry {
    /// Create an empty registry.
    pub const fn new() -> Self {
        const VACANT_SLOT: AtomicU32 = AtomicU32::new(VACANT);
        Self {
            slots: [VACANT_SLOT; REGISTRY_CAPACITY],
        }
    }

    /// Record that a decoder is bound to `pin`.
    ///
    /// Fails if the pin is already claimed or the table is full. The
    /// reserved pin id `u32::MAX` is accepted but not tracked.
    pub fn claim(&self, pin: PinId) -> Result<(), PinClaimError> {
        if pin == VACANT {
            return Ok(());
        }
        if self.is_claimed(pin) {
            return Err(PinClaimError::AlreadyClaimed(pin));
        }

        for slot in &self.slots {
            match slot.compare_exchange(VACANT, pin, Ordering::AcqRel, Ordering::Acquire) {
                Ok(_) => return Ok(()),
                // Lost the slot to a racing claim of this same pin
                Err(current) if current == pin => {
                    return Err(PinClaimError::AlreadyClaimed(pin));
                }
                Err(_) => continue,
            }
        }

        Err(PinClaimError::TableFull)
    }

    /// Release a previously claimed pin. Returns whether a claim was found.
    pub fn release(&self, pin: PinId) -> bool {
        if pin == VACANT {
            return false;
        }
        for slot in &self.slots {
            if slot
                .compare_exchange(pin, VACANT, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
            {
                return true;
            }
        }
        false
    }

    /// Check whether a pin is currently claimed.
    pub fn is_claimed(&self, pin: PinId) -> bool {
        if pin == VACANT {
            return false;
        }
        self.slots
            .iter()
            .any(|slot| slot.load(Ordering::Acquire) == pin)
    }
}

impl Default for PinRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Process-wide registry used by decoders in debug builds.
static GLOBAL: PinRegistry = PinRegistry::new();

/// The global registry.
pub fn global() -> &'static PinRegistry {
    &GLOBAL
}

/// Claim a pin in the global table, logging on conflict.
#[cfg(debug_assertions)]
pub(crate) fn debug_claim(pin: PinId) {
    if let Err(err) = GLOBAL.claim(pin) {
        log::warn!("pin claim conflict: {err}");
    }
}

/// Release a pin in the global table.
#[cfg(debug_assertions)]
pub(crate) fn debug_release(pin: PinId) {
    GLOBAL.release(pin);
}
