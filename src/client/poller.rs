//! Seat poller.
//!
//! [`SeatSync`] performs one poll and applies it to the state; it is
//! shared by the interval task and by the action dispatcher's post-action
//! refresh. All seat-affecting calls to the service run under one gate:
//! actions hold it for the duration of their request, interval ticks that
//! find it taken are skipped, and explicit refreshes wait for it.

use std::sync::Arc;
use std::time::Duration;

use seat_wire::normalize_seats;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::api::BookingBackend;
use crate::bus::{DeskEvent, SharedBus};
use crate::client::notifier::Notifier;
use crate::client::SharedState;
use crate::notification::NotificationKind;
use crate::state::SelectionChange;

pub const POLL_FAILED_MESSAGE: &str = "Failed to fetch seats. Are you logged in?";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    Updated { count: usize, dropped: usize },
    /// Request failed; stale seats kept
    Failed,
    /// Service rejected the session; client is now logged out
    SessionExpired,
    /// Response arrived after logout and was thrown away
    Discarded,
}

#[derive(Clone)]
pub struct SeatSync {
    backend: Arc<dyn BookingBackend>,
    state: SharedState,
    bus: SharedBus,
    notifier: Notifier,
    gate: Arc<Mutex<()>>,
    error_ttl: Duration,
}

impl SeatSync {
    pub fn new(
        backend: Arc<dyn BookingBackend>,
        state: SharedState,
        bus: SharedBus,
        notifier: Notifier,
        error_ttl: Duration,
    ) -> Self {
        Self {
            backend,
            state,
            bus,
            notifier,
            gate: Arc::new(Mutex::new(())),
            error_ttl,
        }
    }

    pub fn backend(&self) -> &dyn BookingBackend {
        self.backend.as_ref()
    }

    /// Serializes seat-affecting requests
    pub fn gate(&self) -> &Mutex<()> {
        &self.gate
    }

    /// Poll now, waiting for any in-flight action first.
    pub async fn poll_now(&self) -> PollOutcome {
        let _guard = self.gate.lock().await;
        self.poll_once().await
    }

    /// Poll unless an action is in flight.
    pub async fn poll_if_idle(&self) -> Option<PollOutcome> {
        let Ok(_guard) = self.gate.try_lock() else {
            debug!("Skipping seat poll while an action is in flight");
            return None;
        };
        Some(self.poll_once().await)
    }

    async fn poll_once(&self) -> PollOutcome {
        match self.backend.fetch_seats().await {
            Ok(records) => {
                let (seats, dropped) = normalize_seats(records);
                if dropped > 0 {
                    warn!(dropped, "Ignoring seat records without an id");
                }
                let count = seats.len();

                let change = {
                    let mut state = self.state.write().await;
                    if !state.is_logged_in() {
                        return PollOutcome::Discarded;
                    }
                    state.replace_seats(seats)
                };

                debug!(count, "Seats updated");
                self.bus.publish(DeskEvent::SeatsUpdated { count });
                if let SelectionChange::Cleared(seat_id) = change {
                    info!(%seat_id, "Selected seat is gone from the map, clearing selection");
                    self.bus.publish(DeskEvent::SelectionChanged { seat_id: None });
                }

                PollOutcome::Updated { count, dropped }
            }
            Err(e) if e.is_unauthorized() => {
                warn!("Seat poll rejected, session expired: {}", e);
                let was_logged_in = {
                    let mut state = self.state.write().await;
                    let was = state.is_logged_in();
                    state.set_logged_out();
                    was
                };
                self.notifier
                    .show(NotificationKind::Error, POLL_FAILED_MESSAGE, self.error_ttl)
                    .await;
                if was_logged_in {
                    self.bus.publish(DeskEvent::SessionChanged { logged_in: false });
                }
                PollOutcome::SessionExpired
            }
            Err(e) => {
                error!("Failed to fetch seats: {}", e);
                self.notifier
                    .show(NotificationKind::Error, POLL_FAILED_MESSAGE, self.error_ttl)
                    .await;
                PollOutcome::Failed
            }
        }
    }

    async fn is_logged_in(&self) -> bool {
        self.state.read().await.is_logged_in()
    }
}

/// Spawn the interval poller. The first tick fires immediately.
///
/// Runs until `shutdown` is cancelled or the session ends; on exit the
/// token is cancelled so the owner can tell the task is gone.
pub fn spawn_poller(sync: SeatSync, period: Duration, shutdown: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        info!(period_ms = period.as_millis() as u64, "Seat polling started");

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("Seat polling shutting down");
                    break;
                }
                _ = ticker.tick() => {
                    if !sync.is_logged_in().await {
                        info!("Session ended, stopping seat polling");
                        break;
                    }
                    if let Some(PollOutcome::SessionExpired) = sync.poll_if_idle().await {
                        break;
                    }
                }
            }
        }

        shutdown.cancel();
        info!("Seat polling stopped");
    })
}
