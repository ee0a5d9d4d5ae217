//! Booking and release bodies.

use serde::{Deserialize, Serialize};

use crate::seat::SeatId;

/// Body of `POST /book`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRequest {
    pub seat_id: SeatId,
    /// Requester display name
    pub name: String,
    /// Date as picked in the client (e.g. "Today")
    pub date: String,
    /// Time slot as picked in the client (e.g. "12:00 PM")
    pub time_slot: String,
}

/// Success body of `POST /book` and `POST /release/{seat_id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionAck {
    #[serde(default)]
    pub message: Option<String>,
}

/// Error body returned with non-2xx responses.
///
/// `detail` is usually a string but validation failures carry a list of
/// objects, so it is kept as raw JSON.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl ErrorBody {
    /// Human-readable form of `detail`
    pub fn detail_text(&self) -> Option<String> {
        match self.detail.as_ref()? {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}
