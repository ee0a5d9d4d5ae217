//! Application state container.
//!
//! `DeskState` holds everything the UI renders: session flag, identity,
//! the latest seat set, the selection, the single notification slot, the
//! search query and the booking form. All mutation goes through the
//! methods here; network code and the renderer never poke at fields.

use std::time::Duration;

use rand::seq::SliceRandom;
use rand::Rng;
use seat_wire::{Identity, Seat, SeatId};

use crate::notification::{Notification, NotificationKind};

pub const DEFAULT_DATE: &str = "Today";
pub const DEFAULT_TIME_SLOT: &str = "12:00 PM";

/// Local date/slot picker values sent with a booking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingForm {
    pub date: String,
    pub time_slot: String,
}

impl Default for BookingForm {
    fn default() -> Self {
        Self {
            date: DEFAULT_DATE.to_string(),
            time_slot: DEFAULT_TIME_SLOT.to_string(),
        }
    }
}

/// What a poll did to the selection.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionChange {
    /// Nothing was selected
    None,
    /// The selection was re-bound to the fresh copy of the same seat
    Refreshed,
    /// The selected seat is gone from the poll; selection cleared
    Cleared(SeatId),
}

#[derive(Debug, Default)]
pub struct DeskState {
    logged_in: bool,
    me: Option<Identity>,
    seats: Vec<Seat>,
    selected: Option<Seat>,
    notification: Option<Notification>,
    last_notification_id: u64,
    search_query: String,
    form: BookingForm,
}

impl DeskState {
    pub fn new() -> Self {
        Self::default()
    }

    // ---------------------------------------------------------------------
    // Session
    // ---------------------------------------------------------------------

    pub fn is_logged_in(&self) -> bool {
        self.logged_in
    }

    pub fn me(&self) -> Option<&Identity> {
        self.me.as_ref()
    }

    pub fn set_logged_in(&mut self, me: Option<Identity>) {
        self.logged_in = true;
        self.me = me;
    }

    /// Drop to the logged-out view. Seat data and identity belong to the
    /// old session and are discarded; the notification slot is kept so a
    /// failure message survives the transition.
    pub fn set_logged_out(&mut self) {
        self.logged_in = false;
        self.me = None;
        self.seats.clear();
        self.selected = None;
    }

    // ---------------------------------------------------------------------
    // Seats and selection
    // ---------------------------------------------------------------------

    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    pub fn selected(&self) -> Option<&Seat> {
        self.selected.as_ref()
    }

    pub fn available_count(&self) -> usize {
        self.seats.iter().filter(|s| s.is_available()).count()
    }

    /// Replace the whole seat set with a fresh poll and re-resolve the
    /// selection against it.
    pub fn replace_seats(&mut self, seats: Vec<Seat>) -> SelectionChange {
        self.seats = seats;

        let Some(current) = self.selected.as_ref() else {
            return SelectionChange::None;
        };

        match self.seats.iter().find(|s| s.id == current.id) {
            Some(fresh) => {
                self.selected = Some(fresh.clone());
                SelectionChange::Refreshed
            }
            None => {
                let gone = current.id.clone();
                self.selected = None;
                SelectionChange::Cleared(gone)
            }
        }
    }

    /// Select the seat whose id prints as `raw`. Returns its id if found;
    /// the selection is left alone otherwise.
    pub fn select(&mut self, raw: &str) -> Option<SeatId> {
        let seat = self.seats.iter().find(|s| s.id.matches(raw))?.clone();
        let id = seat.id.clone();
        self.selected = Some(seat);
        Some(id)
    }

    /// Pick a uniformly random available seat and select it.
    ///
    /// Emits exactly one notification either way. With nothing available
    /// the selection is left unchanged.
    pub fn smart_assign<R: Rng + ?Sized>(&mut self, rng: &mut R, ttl: Duration) -> Option<SeatId> {
        let available: Vec<&Seat> = self.seats.iter().filter(|s| s.is_available()).collect();

        let Some(choice) = available.choose(rng).map(|s| (*s).clone()) else {
            self.notify(NotificationKind::Error, "No seats available!", ttl);
            return None;
        };

        let id = choice.id.clone();
        self.selected = Some(choice);
        self.notify(
            NotificationKind::Success,
            format!("Smart Assign picked Seat #{}", id),
            ttl,
        );
        Some(id)
    }

    /// Release is offered only for an occupied seat held by the current user.
    pub fn can_release(&self) -> bool {
        match (self.selected.as_ref(), self.me.as_ref()) {
            (Some(seat), Some(me)) => !seat.is_available() && me.holds(seat.booked_by.as_deref()),
            _ => false,
        }
    }

    // ---------------------------------------------------------------------
    // Notification slot
    // ---------------------------------------------------------------------

    pub fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    /// Show a notification, superseding any current one. Returns its id.
    pub fn notify(
        &mut self,
        kind: NotificationKind,
        message: impl Into<String>,
        ttl: Duration,
    ) -> u64 {
        self.last_notification_id += 1;
        let id = self.last_notification_id;
        self.notification = Some(Notification {
            id,
            kind,
            message: message.into(),
            ttl,
        });
        id
    }

    /// Clear notification `id` if it is still the one showing.
    pub fn dismiss(&mut self, id: u64) -> bool {
        match self.notification.as_ref() {
            Some(n) if n.id == id => {
                self.notification = None;
                true
            }
            _ => false,
        }
    }

    // ---------------------------------------------------------------------
    // Search and booking form
    // ---------------------------------------------------------------------

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    pub fn booking_form(&self) -> &BookingForm {
        &self.form
    }

    pub fn set_date(&mut self, date: impl Into<String>) {
        self.form.date = date.into();
    }

    pub fn set_time_slot(&mut self, time_slot: impl Into<String>) {
        self.form.time_slot = time_slot.into();
    }
}
