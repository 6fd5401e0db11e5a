//! # Visibility Window Filter
//!
//! Selects the subset of records whose effective interval intersects the
//! `[now - lookback, now + lookahead]` window, ordered ascending by start.
//!
//! The inclusion rule differs per record shape:
//!
//! - **All-day** records are date-granular: they are visible when their date
//!   lies in `[date(now), date(now + lookahead)]`, and the lookback is
//!   ignored entirely.
//! - **Timed records with an end** stay visible until they end. An event that
//!   started before the window but is still running is shown even with a
//!   zero lookback — don't hide a meeting you're currently in.
//! - **Timed records without an end** are assumed short: only their start is
//!   checked against the window. With a zero lookback this means strictly
//!   future starts; the price path uses a nonzero lookback so recent ticks
//!   stay on screen.

use crate::{TemporalRecord, Window};

/// Filter `records` down to the visible set, sorted ascending by start.
pub fn filter(mut records: Vec<TemporalRecord>, window: &Window) -> Vec<TemporalRecord> {
    let today = window.now.date_naive();
    let horizon = window.end();
    let horizon_date = horizon.date_naive();

    records.retain(|record| {
        if record.all_day {
            let date = record.start.date_naive();
            date >= today && date <= horizon_date
        } else if let Some(end) = record.end {
            // In-progress events remain visible until they end.
            end >= window.now && record.start <= horizon
        } else {
            record.start >= window.start() && record.start <= horizon
        }
    });

    records.sort_by_key(|record| record.start);
    records
}
