//! Session probe.
//!
//! The client never handles credentials. It asks the service for
//! something that requires a session and reads the answer as signed in
//! or not.

use seat_wire::Identity;
use tracing::{info, warn};

use crate::api::BookingBackend;

#[derive(Debug, Clone, PartialEq)]
pub enum SessionProbe {
    /// The service accepted the session. `identity` is `None` if `/me`
    /// could not be read, in which case Release is never offered.
    Authenticated { identity: Option<Identity> },
    /// Network failure or rejected session
    Anonymous,
}

impl SessionProbe {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }
}

/// Probe with a harmless authenticated read, then fetch the identity once.
pub async fn probe(backend: &dyn BookingBackend) -> SessionProbe {
    if let Err(e) = backend.fetch_seats().await {
        info!("No usable session: {}", e);
        return SessionProbe::Anonymous;
    }

    let identity = match backend.fetch_identity().await {
        Ok(me) => {
            info!(w3_id = %me.w3_id, "Signed in");
            Some(me)
        }
        Err(e) => {
            warn!("Session accepted but identity lookup failed: {}", e);
            None
        }
    };

    SessionProbe::Authenticated { identity }
}
