//! End-to-end pipeline tests: JSON in, grouped/classified structures and
//! rendered framebuffers out, with a fixed injected "now".

use chrono::{DateTime, Duration, TimeZone};
use chrono_tz::Europe::Amsterdam;
use chrono_tz::Tz;
use home_panel_lib::{agenda, config::Config, ingest, price, render, window, Tier, Window};

/// Monday 2025-06-16, 12:00 local time.
fn fixed_now() -> DateTime<Tz> {
    Amsterdam.with_ymd_and_hms(2025, 6, 16, 12, 0, 0).unwrap()
}

const AGENDA_JSON: &str = r#"[
    {"summary": "Standup", "start": "2025-06-16T11:30:00", "end": "2025-06-16T12:30:00"},
    {"summary": "Tandarts", "start": "2025-06-16T15:00:00", "end": "2025-06-16T16:00:00"},
    {"summary": "Vakantie", "start": {"date": "2025-06-17"}},
    {"summary": "Lunch met Kees", "start": "2025-06-17T12:00:00", "end": "2025-06-17T13:00:00"},
    {"summary": "Te ver weg", "start": "2025-06-20T10:00:00", "end": "2025-06-20T11:00:00"},
    {"summary": "Kapot", "start": "niet-een-tijdstip"}
]"#;

fn price_json() -> String {
    let ticks: Vec<String> = (0..24)
        .map(|h| {
            let value = 0.15 + 0.01 * ((h as f64) - 12.0).abs();
            format!(
                r#"{{"start": "2025-06-16T{h:02}:00:00+02:00", "value": {value:.3}}}"#
            )
        })
        .collect();
    format!(r#"{{"net_prices_today": [{}], "net_prices_tomorrow": null}}"#, ticks.join(","))
}

fn agenda_pipeline(input: &str, now: DateTime<Tz>, config: &Config) -> home_panel_lib::Agenda {
    let records = ingest::read_agenda(input.as_bytes(), now.timezone());
    let window = Window::new(
        now,
        Duration::zero(),
        Duration::days(config.agenda.lookahead_days),
    );
    let visible = window::filter(records, &window);
    agenda::group(visible, now, config.agenda.max_events)
}

#[test]
fn agenda_pipeline_filters_groups_and_labels() {
    let config = Config::default();
    let grouped = agenda_pipeline(AGENDA_JSON, fixed_now(), &config);

    // The malformed record and the event beyond the horizon are gone; the
    // in-progress standup survives the zero lookback.
    assert_eq!(grouped.record_count(), 4);
    assert!(!grouped.overflow);

    assert_eq!(grouped.days.len(), 2);
    assert_eq!(grouped.days[0].label, "Vandaag");
    assert_eq!(grouped.days[1].label, "Morgen");

    // All-day anchors its day ahead of the timed lunch.
    assert!(grouped.days[1].records[0].all_day);
    assert_eq!(grouped.days[1].records[1].label(), "Lunch met Kees");
}

#[test]
fn agenda_pipeline_truncates_with_signal() {
    let mut config = Config::default();
    config.agenda.max_events = 3;
    let grouped = agenda_pipeline(AGENDA_JSON, fixed_now(), &config);

    assert_eq!(grouped.record_count(), 3);
    assert!(grouped.overflow);
    // The temporally-latest event is the one dropped.
    let last_day = grouped.days.last().unwrap();
    assert_ne!(last_day.records.last().unwrap().label(), "Lunch met Kees");
}

#[test]
fn price_pipeline_windows_classifies_and_locates() {
    let config = Config::default();
    let now = Amsterdam.with_ymd_and_hms(2025, 6, 16, 12, 30, 0).unwrap();
    let records = ingest::read_prices(price_json().as_bytes(), now.timezone());
    assert_eq!(records.len(), 24);

    let window = Window::new(
        now,
        Duration::hours(config.prices.lookback_hours),
        Duration::hours(config.prices.lookahead_hours),
    );
    let buckets = window::filter(records, &window);
    // Window [08:30, tomorrow 08:30]: hours 09..=23 survive.
    assert_eq!(buckets.len(), 15);

    let tiers = price::classify(&buckets);
    assert_eq!(tiers.len(), buckets.len());
    // Midday values are the cheapest in this feed.
    let noon_index = buckets
        .iter()
        .position(|b| b.start.time() == chrono::NaiveTime::from_hms_opt(12, 0, 0).unwrap())
        .unwrap();
    assert_eq!(tiers[noon_index], Tier::Low);
    assert_eq!(*tiers.last().unwrap(), Tier::High);

    // 12:30 is halfway through the 12:00 bucket (buckets start at 09:00).
    let (index, offset) = price::locate(&buckets, now);
    assert_eq!(index, 3);
    assert!((offset - 0.5).abs() < 1e-6);
}

#[test]
fn rendered_output_is_deterministic() {
    let config = Config::default();
    let now = fixed_now();

    let first = agenda_pipeline(AGENDA_JSON, now, &config);
    let second = agenda_pipeline(AGENDA_JSON, now, &config);
    assert_eq!(first, second);

    let canvas_a = render::render_agenda(&first, &config).unwrap();
    let canvas_b = render::render_agenda(&second, &config).unwrap();
    assert_eq!(canvas_a.data(), canvas_b.data());

    let records = ingest::read_prices(price_json().as_bytes(), now.timezone());
    let window = Window::new(now, Duration::hours(4), Duration::hours(20));
    let buckets = window::filter(records, &window);
    let tiers = price::classify(&buckets);
    let marker = Some(price::locate(&buckets, now));

    let chart_a = render::render_prices(&buckets, &tiers, marker, &config).unwrap();
    let chart_b = render::render_prices(&buckets, &tiers, marker, &config).unwrap();
    assert_eq!(chart_a.data(), chart_b.data());
}

#[test]
fn empty_feeds_produce_empty_but_valid_output() {
    let config = Config::default();
    let now = fixed_now();

    let grouped = agenda_pipeline("[]", now, &config);
    assert!(grouped.is_empty());
    let canvas = render::render_agenda(&grouped, &config).unwrap();
    assert_eq!(
        canvas.data().len(),
        (config.agenda.width * config.agenda.height * 3) as usize
    );

    let records = ingest::read_prices(&b"{}"[..], now.timezone());
    assert!(records.is_empty());
    let chart = render::render_prices(&[], &[], None, &config).unwrap();
    assert_eq!(
        chart.data().len(),
        (config.prices.width * config.prices.height * 3) as usize
    );
}
