//! Desk client: session lifecycle, polling and user commands.
//!
//! [`DeskClient`] owns the shared state, the event bus and the backend.
//! It starts the seat poller when a session is established and stops it on
//! logout or teardown.

mod actions;
mod notifier;
mod poller;
mod session;
#[cfg(test)]
pub(crate) mod testing;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::api::BookingBackend;
use crate::bus::{create_bus, DeskEvent, SharedBus};
use crate::config::Config;
use crate::notification::{NotificationKind, BOOKING_TTL, DEFAULT_TTL};
use crate::state::DeskState;

pub use actions::{ActionDispatcher, ActionOutcome};
pub use notifier::Notifier;
pub use poller::{spawn_poller, PollOutcome, SeatSync, POLL_FAILED_MESSAGE};
pub use session::{probe, SessionProbe};

pub type SharedState = Arc<RwLock<DeskState>>;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);
pub const DEFAULT_REQUESTER_NAME: &str = "Employee";

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub poll_interval: Duration,
    /// Sent as `name` with every booking
    pub requester_name: String,
    pub notification_ttl: Duration,
    pub booking_notification_ttl: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            requester_name: DEFAULT_REQUESTER_NAME.to_string(),
            notification_ttl: DEFAULT_TTL,
            booking_notification_ttl: BOOKING_TTL,
        }
    }
}

impl From<&Config> for ClientSettings {
    fn from(config: &Config) -> Self {
        Self {
            poll_interval: config.poll_interval(),
            requester_name: config.requester_name.clone(),
            notification_ttl: config.notification_ttl(),
            booking_notification_ttl: config.booking_notification_ttl(),
        }
    }
}

struct PollerHandle {
    shutdown: CancellationToken,
    task: JoinHandle<()>,
}

pub struct DeskClient {
    state: SharedState,
    bus: SharedBus,
    backend: Arc<dyn BookingBackend>,
    sync: SeatSync,
    actions: ActionDispatcher,
    notifier: Notifier,
    settings: ClientSettings,
    poller: Mutex<Option<PollerHandle>>,
}

impl DeskClient {
    pub fn new(backend: Arc<dyn BookingBackend>, settings: ClientSettings) -> Self {
        let state: SharedState = Arc::new(RwLock::new(DeskState::new()));
        let bus = create_bus();
        let notifier = Notifier::new(state.clone(), bus.clone());
        let sync = SeatSync::new(
            backend.clone(),
            state.clone(),
            bus.clone(),
            notifier.clone(),
            settings.notification_ttl,
        );
        let actions = ActionDispatcher::new(
            sync.clone(),
            state.clone(),
            bus.clone(),
            notifier.clone(),
            settings.requester_name.clone(),
            settings.booking_notification_ttl,
            settings.notification_ttl,
        );

        Self {
            state,
            bus,
            backend,
            sync,
            actions,
            notifier,
            settings,
            poller: Mutex::new(None),
        }
    }

    pub fn state(&self) -> &SharedState {
        &self.state
    }

    pub fn bus(&self) -> &SharedBus {
        &self.bus
    }

    pub fn login_url(&self) -> String {
        self.backend.login_url()
    }

    // ---------------------------------------------------------------------
    // Session lifecycle
    // ---------------------------------------------------------------------

    /// Probe the session. On success the identity is recorded and polling
    /// starts; the seat map arrives with the poller's first tick, which
    /// fires immediately. Returns whether signed in.
    pub async fn login(&self) -> bool {
        self.stop_polling().await;

        let result = probe(self.backend.as_ref()).await;
        let SessionProbe::Authenticated { identity } = result else {
            self.state.write().await.set_logged_out();
            self.bus.publish(DeskEvent::SessionChanged { logged_in: false });
            return false;
        };

        self.state.write().await.set_logged_in(identity);
        self.bus.publish(DeskEvent::SessionChanged { logged_in: true });
        self.start_polling().await;
        true
    }

    /// Drop to the logged-out view and stop polling. The service session
    /// itself is left alone.
    pub async fn logout(&self) {
        self.stop_polling().await;
        self.state.write().await.set_logged_out();
        self.bus.publish(DeskEvent::SessionChanged { logged_in: false });
        info!("Logged out");
    }

    /// Stop background work before the process exits.
    pub async fn shutdown(&self) {
        self.stop_polling().await;
    }

    /// Whether the poller task is still running
    pub async fn is_polling(&self) -> bool {
        self.poller
            .lock()
            .await
            .as_ref()
            .is_some_and(|p| !p.task.is_finished())
    }

    /// Hand over a session cookie copied from the browser.
    pub fn set_session_cookie(&self, value: &str) {
        self.backend.set_session_cookie(value);
    }

    async fn start_polling(&self) {
        let shutdown = CancellationToken::new();
        let task = spawn_poller(
            self.sync.clone(),
            self.settings.poll_interval,
            shutdown.clone(),
        );
        *self.poller.lock().await = Some(PollerHandle { shutdown, task });
    }

    async fn stop_polling(&self) {
        let Some(handle) = self.poller.lock().await.take() else {
            return;
        };
        handle.shutdown.cancel();
        if let Err(e) = handle.task.await {
            debug!("Poller task ended abnormally: {}", e);
        }
    }

    // ---------------------------------------------------------------------
    // Selection and view
    // ---------------------------------------------------------------------

    /// Select the seat whose id prints as `raw`.
    pub async fn select(&self, raw: &str) -> bool {
        let selected = self.state.write().await.select(raw);
        match selected {
            Some(seat_id) => {
                self.bus.publish(DeskEvent::SelectionChanged {
                    seat_id: Some(seat_id),
                });
                true
            }
            None => {
                self.notifier
                    .show(
                        NotificationKind::Error,
                        format!("Seat {} not found.", raw.trim()),
                        self.settings.notification_ttl,
                    )
                    .await;
                false
            }
        }
    }

    /// Select a random available seat.
    pub async fn smart_assign(&self) -> bool {
        let ttl = self.settings.notification_ttl;
        let (picked, notification_id) = {
            let mut state = self.state.write().await;
            let picked = state.smart_assign(&mut rand::thread_rng(), ttl);
            (picked, state.notification().map(|n| n.id))
        };

        if let Some(id) = notification_id {
            self.notifier.announce(id, ttl);
        }
        match picked {
            Some(seat_id) => {
                info!(%seat_id, "Smart Assign");
                self.bus.publish(DeskEvent::SelectionChanged {
                    seat_id: Some(seat_id),
                });
                true
            }
            None => false,
        }
    }

    pub async fn set_search(&self, query: &str) {
        self.state.write().await.set_search_query(query.trim());
        self.bus.publish(DeskEvent::ViewChanged);
    }

    pub async fn set_date(&self, date: &str) {
        self.state.write().await.set_date(date.trim());
        self.bus.publish(DeskEvent::ViewChanged);
    }

    pub async fn set_time_slot(&self, time_slot: &str) {
        self.state.write().await.set_time_slot(time_slot.trim());
        self.bus.publish(DeskEvent::ViewChanged);
    }

    // ---------------------------------------------------------------------
    // Actions
    // ---------------------------------------------------------------------

    pub async fn book(&self) -> ActionOutcome {
        self.actions.book().await
    }

    pub async fn release(&self) -> ActionOutcome {
        self.actions.release().await
    }

    pub async fn refresh(&self) {
        if self.state.read().await.is_logged_in() {
            self.actions.refresh().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::FakeBackend;
    use super::*;
    use reqwest::StatusCode;
    use seat_wire::SeatId;

    fn settings() -> ClientSettings {
        ClientSettings {
            poll_interval: Duration::from_millis(10),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_login_starts_polling() {
        let backend = Arc::new(FakeBackend::with_seats(6).signed_in_as("jdoe"));
        let client = DeskClient::new(backend.clone(), settings());

        assert!(client.login().await);
        assert!(client.is_polling().await);

        tokio::time::sleep(Duration::from_millis(60)).await;
        {
            let state = client.state().read().await;
            assert!(state.is_logged_in());
            assert_eq!(state.me().map(|me| me.w3_id.as_str()), Some("jdoe"));
            assert_eq!(state.seats().len(), 6);
        }

        client.shutdown().await;
        assert!(!client.is_polling().await);
    }

    #[tokio::test]
    async fn test_rejected_login_stays_logged_out() {
        let backend = Arc::new(FakeBackend::with_seats(6));
        backend.fail_seats(StatusCode::UNAUTHORIZED);
        let client = DeskClient::new(backend, settings());

        assert!(!client.login().await);
        assert!(!client.is_polling().await);
        assert!(!client.state().read().await.is_logged_in());
    }

    #[tokio::test]
    async fn test_logout_stops_polling() {
        let backend = Arc::new(FakeBackend::with_seats(6).signed_in_as("jdoe"));
        let client = DeskClient::new(backend.clone(), settings());
        client.login().await;
        tokio::time::sleep(Duration::from_millis(30)).await;

        client.logout().await;
        assert!(!client.is_polling().await);
        let fetched = backend.seat_fetches();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(backend.seat_fetches(), fetched);
        assert!(client.state().read().await.seats().is_empty());
    }

    #[tokio::test]
    async fn test_expired_session_stops_poller() {
        let backend = Arc::new(FakeBackend::with_seats(6).signed_in_as("jdoe"));
        let client = DeskClient::new(backend.clone(), settings());
        client.login().await;
        tokio::time::sleep(Duration::from_millis(30)).await;

        backend.fail_seats(StatusCode::UNAUTHORIZED);
        tokio::time::sleep(Duration::from_millis(80)).await;

        assert!(!client.is_polling().await);
        let state = client.state().read().await;
        assert!(!state.is_logged_in());
        assert_eq!(state.notification().unwrap().message, POLL_FAILED_MESSAGE);
    }

    #[tokio::test]
    async fn test_relogin_after_heal() {
        let backend = Arc::new(FakeBackend::with_seats(2).signed_in_as("jdoe"));
        backend.fail_seats(StatusCode::UNAUTHORIZED);
        let client = DeskClient::new(backend.clone(), settings());
        assert!(!client.login().await);

        backend.heal_seats();
        assert!(client.login().await);
        assert!(client.is_polling().await);
        client.shutdown().await;
    }

    #[tokio::test]
    async fn test_select_unknown_seat_notifies() {
        let backend = Arc::new(FakeBackend::with_seats(3).signed_in_as("jdoe"));
        let client = DeskClient::new(backend, settings());
        client.login().await;
        client.refresh().await;

        assert!(client.select("2").await);
        assert!(!client.select("42").await);

        let state = client.state().read().await;
        assert_eq!(state.selected().map(|s| &s.id), Some(&SeatId::Number(2)));
        assert_eq!(state.notification().unwrap().message, "Seat 42 not found.");
        drop(state);
        client.shutdown().await;
    }

    #[tokio::test]
    async fn test_smart_assign_publishes_selection() {
        let backend = Arc::new(FakeBackend::with_seats(3).signed_in_as("jdoe"));
        let client = DeskClient::new(backend, settings());
        client.login().await;
        client.refresh().await;
        let mut rx = client.bus().subscribe();

        assert!(client.smart_assign().await);

        let mut saw_selection = false;
        while let Ok(event) = rx.try_recv() {
            if let DeskEvent::SelectionChanged { seat_id: Some(_) } = event {
                saw_selection = true;
            }
        }
        assert!(saw_selection);
        assert!(client.state().read().await.selected().unwrap().is_available());
        client.shutdown().await;
    }
}
