//! Seat records and their normalized form.
//!
//! The backend has served seats keyed either by `id` or by a raw storage
//! key `_id`, with either integer or string values. [`SeatRecord`] accepts
//! all of those shapes; [`Seat`] is what the rest of the client works with.

use serde::{Deserialize, Serialize};

/// Seat identifier, integer or string depending on the backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SeatId {
    Number(i64),
    Text(String),
}

impl SeatId {
    /// Numeric value of the id, parsing string ids that hold a number.
    pub fn as_number(&self) -> Option<i64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
        }
    }

    /// True when this id prints as `raw` (user input is always text).
    pub fn matches(&self, raw: &str) -> bool {
        let raw = raw.trim();
        match self {
            Self::Number(n) => raw.parse::<i64>().map(|r| r == *n).unwrap_or(false),
            Self::Text(s) => s == raw,
        }
    }
}

impl std::fmt::Display for SeatId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for SeatId {
    fn from(n: i64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for SeatId {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

/// Seat occupancy as reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SeatStatus {
    Available,
    Occupied,
    /// Any status string this client does not know about
    Other(String),
}

impl From<String> for SeatStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "available" => Self::Available,
            "occupied" => Self::Occupied,
            _ => Self::Other(s),
        }
    }
}

impl From<SeatStatus> for String {
    fn from(status: SeatStatus) -> Self {
        status.to_string()
    }
}

impl std::fmt::Display for SeatStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Available => write!(f, "available"),
            Self::Occupied => write!(f, "occupied"),
            Self::Other(s) => write!(f, "{}", s),
        }
    }
}

/// Profile details of the seat holder, when the backend joins them in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDetails {
    #[serde(default)]
    pub full_name: Option<String>,
}

/// A seat exactly as it arrives from `GET /seats`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SeatRecord {
    #[serde(default)]
    pub id: Option<SeatId>,

    /// Storage key, used when `id` is absent
    #[serde(rename = "_id", default)]
    pub storage_id: Option<SeatId>,

    pub status: SeatStatus,

    #[serde(default)]
    pub booked_by: Option<String>,

    #[serde(default)]
    pub user_details: Option<UserDetails>,

    /// Reservation start, ISO-8601
    #[serde(default)]
    pub booking_time: Option<String>,

    #[serde(default)]
    pub price: Option<f64>,
}

impl SeatRecord {
    /// Collapse the two id fields into one. `None` if neither is present.
    pub fn normalize(self) -> Option<Seat> {
        let id = self.id.or(self.storage_id)?;
        Some(Seat {
            id,
            status: self.status,
            booked_by: self.booked_by,
            user_details: self.user_details,
            booking_time: self.booking_time,
            price: self.price,
        })
    }
}

/// Decode a `GET /seats` body one record at a time.
///
/// A record that does not fit [`SeatRecord`] (null status, fractional id,
/// not an object) is returned with its index and error instead of failing
/// the whole set.
pub fn decode_seat_records(
    values: Vec<serde_json::Value>,
) -> (Vec<SeatRecord>, Vec<(usize, serde_json::Error)>) {
    let mut records = Vec::with_capacity(values.len());
    let mut rejected = Vec::new();
    for (index, value) in values.into_iter().enumerate() {
        match serde_json::from_value(value) {
            Ok(record) => records.push(record),
            Err(e) => rejected.push((index, e)),
        }
    }
    (records, rejected)
}

/// Normalize a whole poll response.
///
/// Returns the seats that carried an identifier and the number of records
/// that had to be dropped because they carried none.
pub fn normalize_seats(records: Vec<SeatRecord>) -> (Vec<Seat>, usize) {
    let total = records.len();
    let seats: Vec<Seat> = records.into_iter().filter_map(SeatRecord::normalize).collect();
    let dropped = total - seats.len();
    (seats, dropped)
}

/// A normalized seat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Seat {
    pub id: SeatId,
    pub status: SeatStatus,
    pub booked_by: Option<String>,
    pub user_details: Option<UserDetails>,
    pub booking_time: Option<String>,
    pub price: Option<f64>,
}

impl Seat {
    pub fn is_available(&self) -> bool {
        self.status == SeatStatus::Available
    }

    /// Full name of the occupant, if the backend provided one
    pub fn occupant_name(&self) -> Option<&str> {
        self.user_details
            .as_ref()
            .and_then(|d| d.full_name.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn records(value: serde_json::Value) -> Vec<SeatRecord> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_normalize_prefers_primary_id() {
        let recs = records(json!([
            { "id": 3, "_id": 99, "status": "available" },
            { "_id": 4, "status": "occupied", "booked_by": "jdoe" },
            { "id": "A-12", "status": "available" }
        ]));

        let (seats, dropped) = normalize_seats(recs);
        assert_eq!(dropped, 0);
        assert_eq!(seats[0].id, SeatId::Number(3));
        assert_eq!(seats[1].id, SeatId::Number(4));
        assert_eq!(seats[2].id, SeatId::Text("A-12".to_string()));
    }

    #[test]
    fn test_normalize_drops_records_without_any_id() {
        let recs = records(json!([
            { "status": "available" },
            { "id": null, "_id": 8, "status": "available" },
            { "id": null, "status": "occupied" }
        ]));

        let (seats, dropped) = normalize_seats(recs);
        assert_eq!(dropped, 2);
        assert_eq!(seats.len(), 1);
        assert_eq!(seats[0].id, SeatId::Number(8));
    }

    #[test]
    fn test_optional_fields_are_explicit() {
        let recs = records(json!([{
            "_id": 7,
            "status": "occupied",
            "price": 5,
            "booked_by": "jdoe@example.com",
            "user_details": { "full_name": "Jane Doe" },
            "booking_time": "2026-10-19T09:00:00Z"
        }]));

        let (seats, _) = normalize_seats(recs);
        let seat = &seats[0];
        assert!(!seat.is_available());
        assert_eq!(seat.occupant_name(), Some("Jane Doe"));
        assert_eq!(seat.booked_by.as_deref(), Some("jdoe@example.com"));
        assert_eq!(seat.price, Some(5.0));

        let bare = normalize_seats(records(json!([{ "id": 1, "status": "available" }]))).0;
        assert_eq!(bare[0].occupant_name(), None);
        assert_eq!(bare[0].booking_time, None);
    }

    #[test]
    fn test_malformed_record_does_not_poison_the_set() {
        let values = vec![
            json!({ "_id": 1, "status": "available" }),
            json!({ "_id": 2, "status": null }),
            json!({ "_id": 3.5, "status": "available" }),
            json!("not a seat"),
            json!({ "_id": 5, "status": "occupied" }),
        ];

        let (recs, rejected) = decode_seat_records(values);

        let indices: Vec<usize> = rejected.iter().map(|(i, _)| *i).collect();
        assert_eq!(indices, vec![1, 2, 3]);
        let (seats, dropped) = normalize_seats(recs);
        assert_eq!(dropped, 0);
        assert_eq!(
            seats.iter().map(|s| s.id.clone()).collect::<Vec<_>>(),
            vec![SeatId::Number(1), SeatId::Number(5)]
        );
    }

    #[test]
    fn test_status_from_str() {
        assert_eq!(SeatStatus::from("available".to_string()), SeatStatus::Available);
        assert_eq!(SeatStatus::from("occupied".to_string()), SeatStatus::Occupied);
        assert_eq!(
            SeatStatus::from("maintenance".to_string()),
            SeatStatus::Other("maintenance".to_string())
        );
        assert_eq!(SeatStatus::Occupied.to_string(), "occupied");
    }

    #[test]
    fn test_seat_id_matches_user_input() {
        assert!(SeatId::Number(7).matches("7"));
        assert!(SeatId::Number(7).matches(" 7 "));
        assert!(!SeatId::Number(7).matches("07a"));
        assert!(SeatId::Text("A-12".to_string()).matches("A-12"));
        assert_eq!(SeatId::Text("42".to_string()).as_number(), Some(42));
        assert_eq!(SeatId::Text("lobby".to_string()).as_number(), None);
    }
}
