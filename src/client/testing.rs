//! In-memory booking service for unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::StatusCode;
use seat_wire::{decode_seat_records, ActionAck, BookingRequest, Identity, SeatId, SeatRecord};
use serde_json::{json, Value};

use crate::api::{ApiError, BookingBackend};

/// Serves seats from a JSON list and applies bookings to it, like the
/// real service would.
#[derive(Default)]
pub struct FakeBackend {
    seats: Mutex<Vec<Value>>,
    identity: Mutex<Option<Identity>>,
    seats_error: Mutex<Option<StatusCode>>,
    book_error: Mutex<Option<StatusCode>>,
    release_error: Mutex<Option<StatusCode>>,
    pub booked: Mutex<Vec<BookingRequest>>,
    pub released: Mutex<Vec<SeatId>>,
    seat_fetches: AtomicUsize,
    identity_fetches: AtomicUsize,
}

fn status_error(path: &str, status: StatusCode) -> ApiError {
    ApiError::Status {
        url: format!("http://fake{}", path),
        status,
        detail: None,
    }
}

impl FakeBackend {
    /// Seats `1..=n`, all available
    pub fn with_seats(n: i64) -> Self {
        let seats = (1..=n)
            .map(|id| json!({ "_id": id, "status": "available", "price": 5 }))
            .collect();
        Self {
            seats: Mutex::new(seats),
            ..Default::default()
        }
    }

    pub fn identity(w3_id: &str) -> Identity {
        Identity {
            w3_id: w3_id.to_string(),
            email: None,
            name: None,
        }
    }

    pub fn signed_in_as(self, w3_id: &str) -> Self {
        *self.identity.lock().unwrap() = Some(Self::identity(w3_id));
        self
    }

    pub fn fail_seats(&self, status: StatusCode) {
        *self.seats_error.lock().unwrap() = Some(status);
    }

    pub fn heal_seats(&self) {
        *self.seats_error.lock().unwrap() = None;
    }

    pub fn fail_booking(&self, status: StatusCode) {
        *self.book_error.lock().unwrap() = Some(status);
    }

    pub fn fail_release(&self, status: StatusCode) {
        *self.release_error.lock().unwrap() = Some(status);
    }

    /// Mark a seat occupied as if someone else booked it out of band
    pub fn occupy(&self, id: i64, by: &str) {
        self.set_status(&SeatId::Number(id), "occupied", Some(by));
    }

    pub fn remove_seat(&self, id: i64) {
        self.seats
            .lock()
            .unwrap()
            .retain(|s| s["_id"] != json!(id));
    }

    pub fn seat_fetches(&self) -> usize {
        self.seat_fetches.load(Ordering::SeqCst)
    }

    pub fn identity_fetches(&self) -> usize {
        self.identity_fetches.load(Ordering::SeqCst)
    }

    fn set_status(&self, id: &SeatId, status: &str, by: Option<&str>) {
        let id = serde_json::to_value(id).unwrap_or(Value::Null);
        for seat in self.seats.lock().unwrap().iter_mut() {
            if seat["_id"] == id {
                seat["status"] = json!(status);
                seat["booked_by"] = json!(by);
                seat["booking_time"] = match by {
                    Some(_) => json!(chrono::Utc::now().to_rfc3339()),
                    None => Value::Null,
                };
            }
        }
    }
}

#[async_trait]
impl BookingBackend for FakeBackend {
    async fn fetch_seats(&self) -> Result<Vec<SeatRecord>, ApiError> {
        self.seat_fetches.fetch_add(1, Ordering::SeqCst);
        if let Some(status) = *self.seats_error.lock().unwrap() {
            return Err(status_error("/seats", status));
        }
        let raw = self.seats.lock().unwrap().clone();
        Ok(decode_seat_records(raw).0)
    }

    async fn fetch_identity(&self) -> Result<Identity, ApiError> {
        self.identity_fetches.fetch_add(1, Ordering::SeqCst);
        self.identity
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| status_error("/me", StatusCode::NOT_FOUND))
    }

    async fn book(&self, request: &BookingRequest) -> Result<ActionAck, ApiError> {
        self.booked.lock().unwrap().push(request.clone());
        if let Some(status) = *self.book_error.lock().unwrap() {
            return Err(status_error("/book", status));
        }
        let who = self
            .identity
            .lock()
            .unwrap()
            .as_ref()
            .map(|me| me.w3_id.clone());
        self.set_status(&request.seat_id, "occupied", who.as_deref());
        Ok(ActionAck {
            message: Some("Seat booked".to_string()),
        })
    }

    async fn release(&self, seat_id: &SeatId) -> Result<ActionAck, ApiError> {
        self.released.lock().unwrap().push(seat_id.clone());
        if let Some(status) = *self.release_error.lock().unwrap() {
            return Err(status_error(&format!("/release/{}", seat_id), status));
        }
        self.set_status(seat_id, "available", None);
        Ok(ActionAck {
            message: Some("Seat released".to_string()),
        })
    }

    fn login_url(&self) -> String {
        "http://fake/auth/login".to_string()
    }
}
