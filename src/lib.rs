//! # Home Panel Core Library
//!
//! This library turns irregularly-shaped temporal data — calendar events and
//! hourly energy price ticks — into small bitmap panels for an embedded
//! dashboard display. The interesting part is not the drawing but the
//! windowing and classification pipeline that runs before any pixel is set.
//!
//! ## Pipeline
//!
//! Two independent panels share the same core algorithms:
//!
//! - **agenda**: raw events → [`window::filter`] → [`agenda::group`] →
//!   [`render::render_agenda`]
//! - **prices**: raw ticks → [`window::filter`] → [`price::classify`] +
//!   [`price::locate`] → [`render::render_prices`]
//!
//! ## Design Philosophy
//!
//! ### Determinism
//! The pipeline is a pure function of the input snapshot and an injected
//! "now" instant. The core never reads the wall clock, never touches the
//! filesystem and keeps no state between invocations, so every stage is
//! directly testable with a fixed clock.
//!
//! ### Normalize once
//! Input timestamps arrive in several shapes (date-only strings, naive local
//! datetimes, RFC 3339 with offset, nested `{dateTime, date}` objects). The
//! [`ingest`] module resolves all of them into a single [`TemporalRecord`]
//! form before any filtering logic runs; nothing downstream branches on wire
//! shape.
//!
//! ### Per-record failure isolation
//! A single malformed record is skipped with a diagnostic. It must never
//! blank the whole display.

use chrono::{DateTime, NaiveDate};
use chrono_tz::Tz;

// Module declarations
pub mod agenda;
pub mod canvas;
pub mod config;
pub mod ingest;
pub mod price;
pub mod render;
pub mod textfit;
pub mod window;

/// Payload carried by a temporal record: a display label for agenda events,
/// a numeric value for price ticks.
#[derive(Clone, Debug, PartialEq)]
pub enum Payload {
    Label(String),
    Value(f64),
}

/// A timestamped record after ingestion has normalized all wire shapes.
///
/// All-day records are pinned to local midnight of their date and carry
/// `all_day = true`; their natural granularity is the calendar date, not the
/// instant. `end` is present only when the source supplied a real instant
/// (a date-only end on a timed event is treated as no end).
///
/// Invariant: `start <= end` whenever `end` is present.
#[derive(Clone, Debug, PartialEq)]
pub struct TemporalRecord {
    /// Start instant, resolved in the operative local zone.
    pub start: DateTime<Tz>,
    /// Optional end instant; absent means instantaneous or open-ended.
    pub end: Option<DateTime<Tz>>,
    /// True when the record is date-granular rather than instant-granular.
    pub all_day: bool,
    /// Display label or numeric value.
    pub payload: Payload,
}

impl TemporalRecord {
    /// Display label, or the empty string for value records.
    pub fn label(&self) -> &str {
        match &self.payload {
            Payload::Label(s) => s,
            Payload::Value(_) => "",
        }
    }

    /// Numeric value, if this record carries one.
    pub fn value(&self) -> Option<f64> {
        match self.payload {
            Payload::Value(v) => Some(v),
            Payload::Label(_) => None,
        }
    }
}

/// The visibility window `[now - lookback, now + lookahead]`.
///
/// Immutable per invocation; both panels build one from configuration and the
/// injected "now" instant.
#[derive(Clone, Copy, Debug)]
pub struct Window {
    pub now: DateTime<Tz>,
    pub lookback: chrono::Duration,
    pub lookahead: chrono::Duration,
}

impl Window {
    pub fn new(now: DateTime<Tz>, lookback: chrono::Duration, lookahead: chrono::Duration) -> Self {
        Self {
            now,
            lookback,
            lookahead,
        }
    }

    /// Earliest visible instant.
    pub fn start(&self) -> DateTime<Tz> {
        self.now - self.lookback
    }

    /// Latest visible instant.
    pub fn end(&self) -> DateTime<Tz> {
        self.now + self.lookahead
    }
}

/// Discrete magnitude tier, recomputed from the visible window on every
/// invocation. Never persisted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tier {
    Low,
    Mid,
    High,
}

/// One calendar day of the agenda: its date, display label and the records
/// that fall on it (all-day records first, then by start time).
#[derive(Clone, Debug, PartialEq)]
pub struct DayGroup {
    pub date: NaiveDate,
    pub label: String,
    pub records: Vec<TemporalRecord>,
}

/// Grouped agenda output. `overflow` is set when truncation dropped events
/// beyond the cap, so the renderer can draw an indicator instead of silently
/// losing data.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Agenda {
    pub days: Vec<DayGroup>,
    pub overflow: bool,
}

impl Agenda {
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Total number of records across all day groups.
    pub fn record_count(&self) -> usize {
        self.days.iter().map(|d| d.records.len()).sum()
    }
}
