//! Wire types for the Blu-Reserve booking service.
//!
//! Everything that crosses the HTTP boundary between the desk client and
//! the booking backend lives here, so the client crate and any test
//! fixtures agree on one shape.
//!
//! # Modules
//! - [`seat`] - Seat records as served by `GET /seats`, and their normalized form
//! - [`identity`] - The signed-in user as served by `GET /me`
//! - [`booking`] - Booking/release request and acknowledgement bodies

pub mod booking;
pub mod identity;
pub mod seat;

pub use booking::{ActionAck, BookingRequest, ErrorBody};
pub use identity::Identity;
pub use seat::{decode_seat_records, normalize_seats, Seat, SeatId, SeatRecord, SeatStatus, UserDetails};
