//! # wiegand26
//!
//! Wiegand-26 access control protocol decoder.
//!
//! ## Architecture
//!
//! The platform's pin event source reports every transition on the two
//! reader lines; the decoder folds them into 26-bit card identifiers:
//!
//! ```text
//! Pin Event Source ──▶ WiegandDecoder::on_transition ──▶ IdLatch
//!                                                          │
//! Application ◀─────── WiegandDecoder::get_id ◀────────────┘
//! ```
//!
//! Events can be delivered by direct call from the interrupt handler, or
//! queued through the lock-free [`EdgeStream`] and pumped from the
//! application loop when the platform forbids decoding in interrupt
//! context.
//!
//! The decoder never raises an error: interrupted reads, overwritten
//! results, and stale results all degrade to "no identifier available",
//! with a `log` line for diagnosis.

#![cfg_attr(not(test), no_std)]

pub mod decoder;
pub mod event;
pub mod latch;
pub mod registry;
pub mod stream;

pub use decoder::{WiegandConfig, WiegandDecoder};
pub use event::{Edge, EdgeEvent, Millis, PinId};
pub use latch::IdLatch;
pub use registry::{PinClaimError, PinRegistry};
pub use stream::{EdgeReader, EdgeStream};
