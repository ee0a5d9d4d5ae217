//! Occupant search highlighting.

use seat_wire::Seat;

/// True if `query` (case-folded) occurs in the occupant's full name or in
/// the booked-by identity. An empty query never matches.
pub fn matches_query(seat: &Seat, query: &str) -> bool {
    if query.is_empty() {
        return false;
    }
    let query = query.to_lowercase();

    [seat.occupant_name(), seat.booked_by.as_deref()]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&query))
}

#[cfg(test)]
mod tests {
    use super::*;
    use seat_wire::{SeatId, SeatStatus, UserDetails};

    fn seat(full_name: Option<&str>, booked_by: Option<&str>) -> Seat {
        Seat {
            id: SeatId::Number(1),
            status: SeatStatus::Occupied,
            booked_by: booked_by.map(str::to_string),
            user_details: Some(UserDetails {
                full_name: full_name.map(str::to_string),
            }),
            booking_time: None,
            price: None,
        }
    }

    #[test]
    fn test_matches_name_case_insensitively() {
        let s = seat(Some("Jane Doe"), None);
        assert!(matches_query(&s, "jane"));
        assert!(matches_query(&s, "E D"));
        assert!(!matches_query(&s, "john"));
    }

    #[test]
    fn test_matches_booked_by() {
        let s = seat(None, Some("JDoe@example.com"));
        assert!(matches_query(&s, "jdoe@"));
        assert!(!matches_query(&s, "jane"));
    }

    #[test]
    fn test_empty_query_never_matches() {
        assert!(!matches_query(&seat(Some("Jane"), Some("jdoe")), ""));
    }

    #[test]
    fn test_seat_without_occupant() {
        let mut s = seat(None, None);
        s.user_details = None;
        assert!(!matches_query(&s, "a"));
    }
}
