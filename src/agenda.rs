//! # Agenda Grouper
//!
//! Groups the filtered, sorted event set by calendar day and caps the total
//! visible count. Truncation happens after sorting, so it always drops the
//! temporally latest tail, and it raises the `overflow` flag so the renderer
//! can draw an indicator instead of silently losing data.
//!
//! Within a day, all-day records sort before timed ones: they are background
//! for the day and anchor it.

use crate::{Agenda, DayGroup, TemporalRecord};
use chrono::{DateTime, Datelike, Days, NaiveDate};
use chrono_tz::Tz;

/// Localized weekday abbreviations, Monday first.
const WEEKDAYS: [&str; 7] = ["Ma", "Di", "Wo", "Do", "Vr", "Za", "Zo"];

/// Label for the group containing `date(now)`.
pub const TODAY_LABEL: &str = "Vandaag";
/// Label for the group containing `date(now) + 1`.
pub const TOMORROW_LABEL: &str = "Morgen";

/// Group `events` by local calendar day, capping the total record count at
/// `max_count`.
///
/// `events` is expected to come from [`crate::window::filter`]; the grouper
/// re-sorts with the all-day-first tiebreak before truncating, so a timed
/// midnight event never displaces an all-day record on the same date.
pub fn group(mut events: Vec<TemporalRecord>, now: DateTime<Tz>, max_count: usize) -> Agenda {
    events.sort_by(|a, b| {
        a.start
            .cmp(&b.start)
            .then_with(|| b.all_day.cmp(&a.all_day))
    });

    let overflow = events.len() > max_count;
    events.truncate(max_count);

    let today = now.date_naive();
    let mut days: Vec<DayGroup> = Vec::new();
    for event in events {
        let date = event.start.date_naive();
        match days.last_mut() {
            Some(group) if group.date == date => group.records.push(event),
            _ => days.push(DayGroup {
                date,
                label: day_label(date, today),
                records: vec![event],
            }),
        }
    }

    Agenda { days, overflow }
}

/// Human label for a day group: "Vandaag", "Morgen", or weekday + day/month.
fn day_label(date: NaiveDate, today: NaiveDate) -> String {
    if date == today {
        TODAY_LABEL.to_owned()
    } else if Some(date) == today.checked_add_days(Days::new(1)) {
        TOMORROW_LABEL.to_owned()
    } else {
        let weekday = WEEKDAYS[date.weekday().num_days_from_monday() as usize];
        format!("{} {}/{}", weekday, date.day(), date.month())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Payload;
    use chrono::{Duration, TimeZone};
    use chrono_tz::Europe::Amsterdam;

    fn now() -> DateTime<Tz> {
        // Monday 2025-06-16, 08:00 local
        Amsterdam.with_ymd_and_hms(2025, 6, 16, 8, 0, 0).unwrap()
    }

    fn event(start: DateTime<Tz>, label: &str) -> TemporalRecord {
        TemporalRecord {
            start,
            end: Some(start + Duration::hours(1)),
            all_day: false,
            payload: Payload::Label(label.into()),
        }
    }

    fn all_day_event(date: NaiveDate, label: &str) -> TemporalRecord {
        TemporalRecord {
            start: Amsterdam
                .from_local_datetime(&date.and_hms_opt(0, 0, 0).unwrap())
                .unwrap(),
            end: None,
            all_day: true,
            payload: Payload::Label(label.into()),
        }
    }

    #[test]
    fn truncation_sets_overflow_flag() {
        let base = now() + Duration::hours(1);
        let events: Vec<_> = (0..8)
            .map(|i| event(base + Duration::hours(i), &format!("e{i}")))
            .collect();

        let agenda = group(events, now(), 6);
        assert_eq!(agenda.record_count(), 6);
        assert!(agenda.overflow, "dropping events must raise the flag");
    }

    #[test]
    fn no_overflow_under_the_cap() {
        let base = now() + Duration::hours(1);
        let events: Vec<_> = (0..5)
            .map(|i| event(base + Duration::hours(i), &format!("e{i}")))
            .collect();

        let agenda = group(events, now(), 6);
        assert_eq!(agenda.record_count(), 5);
        assert!(!agenda.overflow);
    }

    #[test]
    fn truncation_drops_latest_tail() {
        let base = now() + Duration::hours(1);
        let events: Vec<_> = (0..4)
            .map(|i| event(base + Duration::hours(i), &format!("e{i}")))
            .collect();

        let agenda = group(events, now(), 2);
        let labels: Vec<_> = agenda.days[0]
            .records
            .iter()
            .map(|r| r.label().to_owned())
            .collect();
        assert_eq!(labels, vec!["e0", "e1"]);
    }

    #[test]
    fn day_labels_today_tomorrow_weekday() {
        let today = now().date_naive();
        let events = vec![
            event(now() + Duration::hours(2), "today"),
            event(now() + Duration::days(1), "tomorrow"),
            event(now() + Duration::days(2), "later"),
        ];

        let agenda = group(events, now(), 10);
        assert_eq!(agenda.days.len(), 3);
        assert_eq!(agenda.days[0].label, "Vandaag");
        assert_eq!(agenda.days[1].label, "Morgen");
        // 2025-06-18 is a Wednesday
        assert_eq!(agenda.days[2].label, "Wo 18/6");
        assert_eq!(agenda.days[0].date, today);
    }

    #[test]
    fn all_day_sorts_before_timed_on_same_date() {
        let date = now().date_naive();
        let events = vec![
            event(now() + Duration::hours(1), "timed"),
            all_day_event(date, "hele dag"),
        ];

        let agenda = group(events, now(), 10);
        assert_eq!(agenda.days.len(), 1);
        assert!(agenda.days[0].records[0].all_day);
        assert_eq!(agenda.days[0].records[1].label(), "timed");
    }

    #[test]
    fn empty_input_yields_empty_agenda() {
        let agenda = group(Vec::new(), now(), 6);
        assert!(agenda.is_empty());
        assert!(!agenda.overflow);
    }
}
