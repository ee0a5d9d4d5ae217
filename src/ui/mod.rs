//! Terminal presentation layer.
//!
//! Everything except [`terminal`] is pure: functions from state (and the
//! current time) to text, so rendering is testable without a terminal.

pub mod commands;
pub mod countdown;
pub mod render;
pub mod search;
#[cfg(feature = "client")]
pub mod terminal;
pub mod zone;

pub use commands::Command;
pub use countdown::{time_left, TimeLeft};
pub use render::{render, RenderOptions};
pub use search::matches_query;
pub use zone::Zone;
