//! Notification slot writer with self-expiring display.

use std::time::Duration;

use crate::bus::{DeskEvent, SharedBus};
use crate::client::SharedState;
use crate::notification::NotificationKind;

#[derive(Clone)]
pub struct Notifier {
    state: SharedState,
    bus: SharedBus,
}

impl Notifier {
    pub fn new(state: SharedState, bus: SharedBus) -> Self {
        Self { state, bus }
    }

    /// Show a message for `ttl`, superseding whatever is showing.
    pub async fn show(&self, kind: NotificationKind, message: impl Into<String>, ttl: Duration) -> u64 {
        let id = self.state.write().await.notify(kind, message, ttl);
        self.announce(id, ttl);
        id
    }

    /// Publish and schedule dismissal of a notification that was written
    /// into the state directly (e.g. by Smart Assign under the same lock).
    ///
    /// The timer only clears notification `id`; if a newer one has
    /// replaced it by then, the newer one stays up.
    pub fn announce(&self, id: u64, ttl: Duration) {
        self.bus.publish(DeskEvent::NotificationShown { id });

        let state = self.state.clone();
        let bus = self.bus.clone();
        tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            if state.write().await.dismiss(id) {
                bus.publish(DeskEvent::NotificationCleared { id });
            }
        });
    }
}
