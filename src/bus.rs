//! In-process event bus.
//!
//! The poller, the action dispatcher and the notifier publish a
//! [`DeskEvent`] after every state change; the terminal UI subscribes and
//! re-renders. Events carry just enough to log; subscribers read the
//! state container for the rest.

use std::sync::Arc;

use seat_wire::SeatId;
use tokio::sync::broadcast;

const BUS_CAPACITY: usize = 256;

#[derive(Debug, Clone, PartialEq)]
pub enum DeskEvent {
    /// Session probe finished, session expired, or user logged out
    SessionChanged { logged_in: bool },
    /// A poll replaced the seat set
    SeatsUpdated { count: usize },
    /// Selection moved, or was cleared because the seat vanished
    SelectionChanged { seat_id: Option<SeatId> },
    NotificationShown { id: u64 },
    NotificationCleared { id: u64 },
    /// Search query or booking form edited
    ViewChanged,
}

impl DeskEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::SessionChanged { .. } => "session_changed",
            Self::SeatsUpdated { .. } => "seats_updated",
            Self::SelectionChanged { .. } => "selection_changed",
            Self::NotificationShown { .. } => "notification_shown",
            Self::NotificationCleared { .. } => "notification_cleared",
            Self::ViewChanged => "view_changed",
        }
    }
}

pub struct EventBus {
    tx: broadcast::Sender<DeskEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(BUS_CAPACITY);
        Self { tx }
    }

    /// Publish to all current subscribers. Having none is not an error.
    pub fn publish(&self, event: DeskEvent) {
        tracing::trace!(event = event.event_type(), "bus publish");
        let _ = self.tx.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DeskEvent> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

pub type SharedBus = Arc<EventBus>;

pub fn create_bus() -> SharedBus {
    Arc::new(EventBus::new())
}
