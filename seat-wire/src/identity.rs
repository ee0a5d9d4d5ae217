//! The signed-in user as reported by `GET /me`.

use serde::{Deserialize, Serialize};

/// Session identity. Only `w3_id` is relied upon; the rest is display sugar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Identity-provider user id; the same value the backend stores in `booked_by`
    pub w3_id: String,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub name: Option<String>,
}

impl Identity {
    /// True when `holder` (a seat's `booked_by`) is this user
    pub fn holds(&self, holder: Option<&str>) -> bool {
        holder == Some(self.w3_id.as_str())
    }
}
