//! Transient user-facing messages.

use std::time::Duration;

/// Default display window for a notification
pub const DEFAULT_TTL: Duration = Duration::from_secs(3);

/// Display window for booking outcomes
pub const BOOKING_TTL: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// A single message shown for `ttl`, then dismissed unless superseded first.
///
/// `id` is unique per state container and increases monotonically, so a
/// dismissal scheduled for an older notification can tell it is stale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: u64,
    pub kind: NotificationKind,
    pub message: String,
    pub ttl: Duration,
}

impl Notification {
    pub fn is_error(&self) -> bool {
        self.kind == NotificationKind::Error
    }
}
