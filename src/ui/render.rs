//! Text rendering of the desk map.

use std::fmt::Write;

use chrono::{DateTime, Utc};
use seat_wire::{Seat, SeatStatus};

use crate::notification::NotificationKind;
use crate::state::DeskState;
use crate::ui::countdown::time_left;
use crate::ui::search::matches_query;
use crate::ui::zone::Zone;

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const REVERSE: &str = "\x1b[7m";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Emit ANSI colors
    pub color: bool,
    /// Seats per grid row
    pub columns: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            color: true,
            columns: 10,
        }
    }
}

/// Render the whole screen for `state` as of `now`.
pub fn render(
    state: &DeskState,
    login_url: &str,
    now: DateTime<Utc>,
    options: &RenderOptions,
) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail
    let _ = if state.is_logged_in() {
        write_desk(&mut out, state, now, options)
    } else {
        write_sign_in(&mut out, login_url)
    };
    let _ = write_notification(&mut out, state);
    out
}

fn write_sign_in(out: &mut String, login_url: &str) -> std::fmt::Result {
    writeln!(out, "Blu-Reserve")?;
    writeln!(out, "Workplace Capacity Management")?;
    writeln!(out)?;
    writeln!(out, "Sign in with IBM W3ID: {}", login_url)?;
    writeln!(out, "Then paste the session cookie with `cookie <value>` and run `login`.")
}

fn write_desk(
    out: &mut String,
    state: &DeskState,
    now: DateTime<Utc>,
    options: &RenderOptions,
) -> std::fmt::Result {
    let who = state
        .me()
        .map(|me| me.name.clone().unwrap_or_else(|| me.w3_id.clone()))
        .unwrap_or_else(|| "unknown user".to_string());
    writeln!(out, "Blu-Reserve · signed in as {}", who)?;
    writeln!(
        out,
        "{} of {} seats available",
        state.available_count(),
        state.seats().len()
    )?;
    writeln!(out)?;

    if state.seats().is_empty() {
        writeln!(out, "  (no seats loaded yet)")?;
    }

    let columns = options.columns.max(1);
    let selected_id = state.selected().map(|s| &s.id);
    for row in state.seats().chunks(columns) {
        for seat in row {
            let selected = selected_id == Some(&seat.id);
            let searched = matches_query(seat, state.search_query());
            out.push_str(&seat_cell(seat, selected, searched, options.color));
        }
        out.push('\n');
    }

    writeln!(out)?;
    writeln!(out, "legend: . free  # taken  [ ] selected  * * search match")?;
    if !state.search_query().is_empty() {
        writeln!(out, "search: \"{}\"", state.search_query())?;
    }
    writeln!(out)?;

    write_summary(out, state, now)
}

fn seat_cell(seat: &Seat, selected: bool, searched: bool, color: bool) -> String {
    let (open, close) = if selected {
        ('[', ']')
    } else if searched {
        ('*', '*')
    } else {
        (' ', ' ')
    };
    let mark = match seat.status {
        SeatStatus::Available => '.',
        SeatStatus::Occupied => '#',
        SeatStatus::Other(_) => '?',
    };
    let cell = format!("{}{:>3}{}{}", open, seat.id.to_string(), mark, close);

    if !color {
        return cell;
    }

    let mut styled = String::from(Zone::for_seat(&seat.id).theme().ansi);
    if selected {
        styled.push_str(BOLD);
    }
    if searched {
        styled.push_str(REVERSE);
    }
    styled.push_str(&cell);
    styled.push_str(RESET);
    styled
}

/// Booking summary panel for the selected seat.
fn write_summary(out: &mut String, state: &DeskState, now: DateTime<Utc>) -> std::fmt::Result {
    let Some(seat) = state.selected() else {
        return writeln!(out, "No seat selected. Use `select <id>` or `auto`.");
    };

    let zone = Zone::for_seat(&seat.id);
    writeln!(
        out,
        "Seat {} · Zone {} ({}) · {}",
        seat.id,
        zone.number(),
        zone.theme().name,
        seat.status
    )?;

    let form = state.booking_form();
    if seat.is_available() {
        writeln!(out, "  Booking for: {} at {}", form.date, form.time_slot)?;
        return writeln!(out, "  `book` to reserve");
    }

    let holder = match (seat.occupant_name(), seat.booked_by.as_deref()) {
        (Some(name), Some(id)) => format!("{} ({})", name, id),
        (Some(name), None) => name.to_string(),
        (None, Some(id)) => id.to_string(),
        (None, None) => "unknown".to_string(),
    };
    writeln!(out, "  Held by: {}", holder)?;
    writeln!(out, "  Time left: {}", time_left(seat.booking_time.as_deref(), now))?;

    if state.can_release() {
        writeln!(out, "  `release` to check out")
    } else {
        writeln!(out, "  Reserved by someone else")
    }
}

fn write_notification(out: &mut String, state: &DeskState) -> std::fmt::Result {
    if let Some(n) = state.notification() {
        let icon = match n.kind {
            NotificationKind::Success => "✓",
            NotificationKind::Error => "✗",
        };
        writeln!(out)?;
        writeln!(out, "{} {}", icon, n.message)?;
    }
    Ok(())
}
