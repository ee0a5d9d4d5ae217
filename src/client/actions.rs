//! Booking and release commands.

use std::time::Duration;

use seat_wire::{BookingRequest, Seat};
use tracing::{info, warn};

use crate::bus::{DeskEvent, SharedBus};
use crate::client::notifier::Notifier;
use crate::client::poller::SeatSync;
use crate::client::SharedState;
use crate::notification::NotificationKind;

/// How an action ended. Nothing is rolled back on failure; the next poll
/// is the source of truth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// No seat selected
    Skipped,
    /// Precondition failed locally; no request sent
    Rejected,
    Succeeded,
    Failed,
}

#[derive(Clone)]
pub struct ActionDispatcher {
    sync: SeatSync,
    state: SharedState,
    bus: SharedBus,
    notifier: Notifier,
    requester_name: String,
    booking_ttl: Duration,
    release_ttl: Duration,
}

impl ActionDispatcher {
    pub fn new(
        sync: SeatSync,
        state: SharedState,
        bus: SharedBus,
        notifier: Notifier,
        requester_name: impl Into<String>,
        booking_ttl: Duration,
        release_ttl: Duration,
    ) -> Self {
        Self {
            sync,
            state,
            bus,
            notifier,
            requester_name: requester_name.into(),
            booking_ttl,
            release_ttl,
        }
    }

    /// Book the selected seat for the slot on the booking form.
    pub async fn book(&self) -> ActionOutcome {
        let request = {
            let state = self.state.read().await;
            let Some(seat) = state.selected() else {
                return ActionOutcome::Skipped;
            };
            let form = state.booking_form();
            BookingRequest {
                seat_id: seat.id.clone(),
                name: self.requester_name.clone(),
                date: form.date.clone(),
                time_slot: form.time_slot.clone(),
            }
        };
        let seat_id = request.seat_id.clone();

        let result = {
            let _gate = self.sync.gate().lock().await;
            self.sync.backend().book(&request).await
        };

        match result {
            Ok(ack) => {
                info!(%seat_id, message = ?ack.message, "Seat booked");
                self.notifier
                    .show(
                        NotificationKind::Success,
                        format!("Seat {} Reserved", seat_id),
                        self.booking_ttl,
                    )
                    .await;
                self.sync.poll_now().await;
                ActionOutcome::Succeeded
            }
            Err(e) => {
                warn!(%seat_id, detail = e.detail().unwrap_or(""), "Booking failed: {}", e);
                self.notifier
                    .show(NotificationKind::Error, "Booking Failed.", self.booking_ttl)
                    .await;
                ActionOutcome::Failed
            }
        }
    }

    /// Release the selected seat. Only the holder may release.
    pub async fn release(&self) -> ActionOutcome {
        let seat: Seat = {
            let state = self.state.read().await;
            let Some(seat) = state.selected() else {
                return ActionOutcome::Skipped;
            };
            if !state.can_release() {
                let seat_id = seat.id.clone();
                drop(state);
                info!(%seat_id, "Refusing to release a seat held by someone else");
                self.notifier
                    .show(
                        NotificationKind::Error,
                        "You can only release your own seat.",
                        self.release_ttl,
                    )
                    .await;
                return ActionOutcome::Rejected;
            }
            seat.clone()
        };

        let result = {
            let _gate = self.sync.gate().lock().await;
            self.sync.backend().release(&seat.id).await
        };

        match result {
            Ok(_) => {
                info!(seat_id = %seat.id, "Seat released");
                self.notifier
                    .show(
                        NotificationKind::Success,
                        format!("Checked out of Seat {}", seat.id),
                        self.release_ttl,
                    )
                    .await;
                self.sync.poll_now().await;
                ActionOutcome::Succeeded
            }
            Err(e) => {
                warn!(seat_id = %seat.id, detail = e.detail().unwrap_or(""), "Release failed: {}", e);
                self.notifier
                    .show(NotificationKind::Error, "Checkout Failed.", self.release_ttl)
                    .await;
                ActionOutcome::Failed
            }
        }
    }

    /// Re-poll on demand, after any in-flight action.
    pub async fn refresh(&self) {
        self.sync.poll_now().await;
        self.bus.publish(DeskEvent::ViewChanged);
    }
}
