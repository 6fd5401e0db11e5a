//! # Input Ingestion and Normalization
//!
//! Reads the raw JSON payloads the surrounding automation pipes in and
//! normalizes every timestamp shape into [`TemporalRecord`] before any
//! filtering logic runs.
//!
//! ## Wire shapes
//!
//! The agenda feed is either a bare array of events or `{"events": [...]}`.
//! Each event time field is a plain string or a `{"dateTime", "date"}`
//! object (dateTime preferred). Timestamps come in three flavors:
//!
//! - `YYYY-MM-DD` — no time component, the all-day signal
//! - `YYYY-MM-DDTHH:MM:SS` — naive local time, resolved in the configured zone
//! - RFC 3339 with explicit offset or trailing `Z`
//!
//! The price feed is `{"net_prices_today": [...], "net_prices_tomorrow":
//! [...]}` where either array may be `null` or absent (tomorrow's prices
//! publish mid-afternoon).
//!
//! ## Failure policy
//!
//! A malformed record is skipped with a warning; the rest of the batch goes
//! through. A whole stream that fails to parse degrades to "no records" —
//! the display then shows an empty panel rather than crashing the wrapper.

use crate::{Payload, TemporalRecord};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use chrono_tz::Tz;
use serde::Deserialize;
use std::io;
use thiserror::Error;

/// Summary shown for events that arrive without one.
const UNTITLED: &str = "Geen titel";

/// Per-record ingestion failures. These skip the record, never the batch.
#[derive(Error, Debug)]
pub enum RecordError {
    /// Neither a plain start string nor a `{dateTime, date}` value present.
    #[error("record has no resolvable start")]
    MissingStart,

    /// Timestamp matched none of the accepted shapes.
    #[error("unparseable timestamp `{0}`")]
    BadTimestamp(String),

    /// Naive local time that does not exist (or exists twice) in the zone.
    #[error("local time `{0}` is ambiguous or nonexistent in this zone")]
    AmbiguousLocal(String),

    /// Start after end violates the record invariant.
    #[error("start is after end")]
    Inverted,
}

/// A parsed timestamp, before all-day normalization: either a full instant
/// or a bare calendar date. Resolved exactly once, at ingestion.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TimeRef {
    Instant(DateTime<Tz>),
    DateOnly(NaiveDate),
}

/// Event time field as it appears on the wire.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum RawTime {
    Plain(String),
    Structured {
        #[serde(rename = "dateTime")]
        date_time: Option<String>,
        date: Option<String>,
    },
}

impl RawTime {
    fn as_str(&self) -> Option<&str> {
        match self {
            RawTime::Plain(s) => Some(s),
            RawTime::Structured { date_time, date } => {
                date_time.as_deref().or(date.as_deref())
            }
        }
    }
}

/// Calendar event as it appears on the wire. Unknown fields are ignored.
#[derive(Clone, Debug, Deserialize)]
pub struct RawEvent {
    pub summary: Option<String>,
    pub start: Option<RawTime>,
    pub end: Option<RawTime>,
}

/// Agenda feed: bare array or wrapped in an `events` key.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum RawAgenda {
    Events(Vec<RawEvent>),
    Wrapped { events: Vec<RawEvent> },
}

impl RawAgenda {
    fn into_events(self) -> Vec<RawEvent> {
        match self {
            RawAgenda::Events(events) | RawAgenda::Wrapped { events } => events,
        }
    }
}

/// Price feed with optional today/tomorrow arrays.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawPriceFeed {
    #[serde(default)]
    pub net_prices_today: Option<Vec<RawPrice>>,
    #[serde(default)]
    pub net_prices_tomorrow: Option<Vec<RawPrice>>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RawPrice {
    pub start: String,
    pub value: f64,
}

/// Read and normalize the agenda feed. Unparseable input degrades to an
/// empty record set.
pub fn read_agenda<R: io::Read>(reader: R, tz: Tz) -> Vec<TemporalRecord> {
    let raw: RawAgenda = match serde_json::from_reader(reader) {
        Ok(raw) => raw,
        Err(err) => {
            log::warn!("agenda input is not valid JSON: {err}");
            return Vec::new();
        }
    };
    events_to_records(raw.into_events(), tz)
}

/// Read and normalize the price feed. Unparseable input degrades to an
/// empty record set.
pub fn read_prices<R: io::Read>(reader: R, tz: Tz) -> Vec<TemporalRecord> {
    let feed: RawPriceFeed = match serde_json::from_reader(reader) {
        Ok(feed) => feed,
        Err(err) => {
            log::warn!("price input is not valid JSON: {err}");
            RawPriceFeed::default()
        }
    };
    prices_to_records(feed, tz)
}

/// Normalize raw events, skipping (with a diagnostic) any that fail to
/// resolve.
pub fn events_to_records(events: Vec<RawEvent>, tz: Tz) -> Vec<TemporalRecord> {
    let mut records = Vec::with_capacity(events.len());
    for event in events {
        let summary = event.summary.as_deref().unwrap_or(UNTITLED).to_owned();
        match event_to_record(event, tz) {
            Ok(record) => records.push(record),
            Err(err) => log::warn!("skipping event `{summary}`: {err}"),
        }
    }
    records
}

/// Normalize the price feed, concatenating today and tomorrow.
pub fn prices_to_records(feed: RawPriceFeed, tz: Tz) -> Vec<TemporalRecord> {
    let today = feed.net_prices_today.unwrap_or_default();
    let tomorrow = feed.net_prices_tomorrow.unwrap_or_default();

    let mut records = Vec::with_capacity(today.len() + tomorrow.len());
    for tick in today.into_iter().chain(tomorrow) {
        match tick_to_record(&tick, tz) {
            Ok(record) => records.push(record),
            Err(err) => log::warn!("skipping price tick at `{}`: {err}", tick.start),
        }
    }
    records
}

/// Parse one timestamp string into a [`TimeRef`]. Absence of a time
/// component (`T`) is the all-day signal.
pub fn parse_time(raw: &str, tz: Tz) -> Result<TimeRef, RecordError> {
    if raw.contains('T') {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Ok(TimeRef::Instant(dt.with_timezone(&tz)));
        }
        // No offset: a naive local time in the operative zone.
        let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
            .map_err(|_| RecordError::BadTimestamp(raw.to_owned()))?;
        let resolved = tz
            .from_local_datetime(&naive)
            .single()
            .ok_or_else(|| RecordError::AmbiguousLocal(raw.to_owned()))?;
        Ok(TimeRef::Instant(resolved))
    } else {
        let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map_err(|_| RecordError::BadTimestamp(raw.to_owned()))?;
        Ok(TimeRef::DateOnly(date))
    }
}

fn local_midnight(date: NaiveDate, tz: Tz) -> Result<DateTime<Tz>, RecordError> {
    tz.from_local_datetime(&date.and_time(NaiveTime::MIN))
        .earliest()
        .ok_or_else(|| RecordError::AmbiguousLocal(date.to_string()))
}

fn event_to_record(event: RawEvent, tz: Tz) -> Result<TemporalRecord, RecordError> {
    let RawEvent {
        summary,
        start,
        end,
    } = event;
    let summary = summary.unwrap_or_else(|| UNTITLED.to_owned());

    let start_raw = start
        .as_ref()
        .and_then(RawTime::as_str)
        .ok_or(RecordError::MissingStart)?;

    match parse_time(start_raw, tz)? {
        TimeRef::DateOnly(date) => Ok(TemporalRecord {
            start: local_midnight(date, tz)?,
            end: None,
            all_day: true,
            payload: Payload::Label(summary),
        }),
        TimeRef::Instant(start) => {
            // A date-only end on a timed event carries no usable instant;
            // the record is treated as having no end.
            let end = match end.as_ref().and_then(RawTime::as_str) {
                Some(raw) => match parse_time(raw, tz)? {
                    TimeRef::Instant(end) => Some(end),
                    TimeRef::DateOnly(_) => None,
                },
                None => None,
            };
            if matches!(end, Some(end) if end < start) {
                return Err(RecordError::Inverted);
            }
            Ok(TemporalRecord {
                start,
                end,
                all_day: false,
                payload: Payload::Label(summary),
            })
        }
    }
}

fn tick_to_record(tick: &RawPrice, tz: Tz) -> Result<TemporalRecord, RecordError> {
    let start = match parse_time(&tick.start, tz)? {
        TimeRef::Instant(start) => start,
        TimeRef::DateOnly(date) => local_midnight(date, tz)?,
    };
    Ok(TemporalRecord {
        start,
        end: None,
        all_day: false,
        payload: Payload::Value(tick.value),
    })
}
