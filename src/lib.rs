//! Blu-Reserve desk booking client
//!
//! Lets an employee see the office seat map, pick a desk (or have one picked
//! at random), book it for a slot and check out again. Seat state is polled
//! from the booking service and rendered as zoned terminal text.
//!
//! Wire types live in the `seat-wire` crate. The presentation-only modules
//! ([`state`], [`notification`], [`ui`]) build without the `client` feature;
//! networking and the runtime pieces need it.

// =============================================================================
// Lints - Enforce code quality and consistency
// =============================================================================

// Deny truly dangerous patterns (these will fail the build)
#![deny(unsafe_code)]
#![deny(unused_must_use)]

pub mod notification;
pub mod state;
pub mod ui;

// Runtime modules (tokio, reqwest, config)
#[cfg(feature = "client")]
pub mod api;
#[cfg(feature = "client")]
pub mod bus;
#[cfg(feature = "client")]
pub mod client;
#[cfg(feature = "client")]
pub mod config;

pub use seat_wire;
