//! # Panel Rendering
//!
//! Draws the grouped agenda and the classified price timeline onto a
//! [`Canvas`] using embedded-graphics primitives, plus an ASCII rendition of
//! both panels for terminal development without an image viewer.
//!
//! Fonts are resolved through a prioritized fallback chain of mono font
//! names from configuration; the first known name wins. An exhausted chain
//! is a hard error — labels cannot be fitted without a measurement
//! capability, and guessing widths would silently clip text.

use crate::canvas::Canvas;
use crate::config::Config;
use crate::textfit::{self, TextMeasure};
use crate::{Agenda, TemporalRecord, Tier};
use embedded_graphics::{
    mono_font::{ascii, MonoFont, MonoTextStyle},
    pixelcolor::Rgb888,
    prelude::*,
    primitives::{Line, PrimitiveStyle, Rectangle},
    text::{Baseline, Text},
};
use chrono::Timelike;
use thiserror::Error;

/// Rendering failures that must propagate to the caller.
#[derive(Error, Debug)]
pub enum RenderError {
    /// No usable font in the fallback chain; text cannot be measured.
    #[error("no usable font in fallback chain {0:?}")]
    MeasurementUnavailable(Vec<String>),
}

/// Text shown when the agenda has nothing visible.
const NO_EVENTS: &str = "Geen afspraken";
/// Time-column text for all-day records.
const ALL_DAY: &str = "Hele dag";

/// Fixed-advance measurement for a mono font.
pub struct MonoMeasure {
    font: &'static MonoFont<'static>,
}

impl MonoMeasure {
    pub fn new(font: &'static MonoFont<'static>) -> Self {
        Self { font }
    }

    fn advance(&self) -> u32 {
        self.font.character_size.width + self.font.character_spacing
    }
}

impl TextMeasure for MonoMeasure {
    fn text_width(&self, text: &str) -> u32 {
        text.chars().count() as u32 * self.advance()
    }
}

/// Look up an embedded mono font by its size name.
fn font_by_name(name: &str) -> Option<&'static MonoFont<'static>> {
    match name {
        "10x20" => Some(&ascii::FONT_10X20),
        "9x18" => Some(&ascii::FONT_9X18),
        "9x15" => Some(&ascii::FONT_9X15),
        "8x13" => Some(&ascii::FONT_8X13),
        "7x13" => Some(&ascii::FONT_7X13),
        "7x14" => Some(&ascii::FONT_7X14),
        "6x13" => Some(&ascii::FONT_6X13),
        "6x12" => Some(&ascii::FONT_6X12),
        "6x10" => Some(&ascii::FONT_6X10),
        "6x9" => Some(&ascii::FONT_6X9),
        "5x8" => Some(&ascii::FONT_5X8),
        "5x7" => Some(&ascii::FONT_5X7),
        "4x6" => Some(&ascii::FONT_4X6),
        _ => None,
    }
}

/// Resolve a font fallback chain: candidates tried in order, first success
/// kept.
pub fn resolve_font(chain: &[String]) -> Result<&'static MonoFont<'static>, RenderError> {
    for name in chain {
        match font_by_name(name) {
            Some(font) => return Ok(font),
            None => log::warn!("unknown font `{name}`, trying next candidate"),
        }
    }
    Err(RenderError::MeasurementUnavailable(chain.to_vec()))
}

fn rgb(c: [u8; 3]) -> Rgb888 {
    Rgb888::new(c[0], c[1], c[2])
}

/// Render the grouped agenda to a fresh canvas.
pub fn render_agenda(agenda: &Agenda, config: &Config) -> Result<Canvas, RenderError> {
    let style = &config.style;
    let title_font = resolve_font(&style.title_fonts)?;
    let body_font = resolve_font(&style.body_fonts)?;
    let label_font = resolve_font(&style.label_fonts)?;

    let width = config.agenda.width;
    let height = config.agenda.height as i32;
    let mut canvas = Canvas::new(width, config.agenda.height, rgb(style.background));

    let title_style = MonoTextStyle::new(title_font, rgb(style.text_primary));
    let body_style = MonoTextStyle::new(body_font, rgb(style.text_primary));
    let secondary_style = MonoTextStyle::new(body_font, rgb(style.text_secondary));
    let time_style = MonoTextStyle::new(label_font, rgb(style.text_secondary));
    let header_style = MonoTextStyle::new(body_font, rgb(style.accent));

    let mut y: i32 = 10;
    Text::with_baseline("Agenda", Point::new(10, y), title_style, Baseline::Top)
        .draw(&mut canvas)
        .ok();
    y += 32;

    if agenda.is_empty() {
        Text::with_baseline(NO_EVENTS, Point::new(10, y), secondary_style, Baseline::Top)
            .draw(&mut canvas)
            .ok();
        return Ok(canvas);
    }

    // Column where event text starts; the time lives to its left.
    const EVENT_X: i32 = 110;
    const LINE_HEIGHT: i32 = 36;
    let body_measure = MonoMeasure::new(body_font);
    let max_text_width = width as i32 - EVENT_X - 10;

    let mut drew_more_marker = false;
    'days: for (day_index, day) in agenda.days.iter().enumerate() {
        if day_index > 0 {
            y += 7;
        }
        Text::with_baseline(&day.label, Point::new(10, y), header_style, Baseline::Top)
            .draw(&mut canvas)
            .ok();
        y += 24;

        for record in &day.records {
            if y > height - 45 {
                // Out of vertical space; signal that more exists.
                Text::with_baseline("...", Point::new(10, y), secondary_style, Baseline::Top)
                    .draw(&mut canvas)
                    .ok();
                drew_more_marker = true;
                break 'days;
            }

            let time_str = if record.all_day {
                ALL_DAY.to_owned()
            } else {
                record.start.format("%H:%M").to_string()
            };
            Text::with_baseline(&time_str, Point::new(10, y + 3), time_style, Baseline::Top)
                .draw(&mut canvas)
                .ok();

            let summary = textfit::fit(record.label(), &body_measure, max_text_width as u32);
            Text::with_baseline(&summary, Point::new(EVENT_X, y), body_style, Baseline::Top)
                .draw(&mut canvas)
                .ok();

            y += LINE_HEIGHT;
        }
    }

    if agenda.overflow && !drew_more_marker && y <= height - 12 {
        Text::with_baseline("...", Point::new(10, y), secondary_style, Baseline::Top)
            .draw(&mut canvas)
            .ok();
    }

    Ok(canvas)
}

/// Render the classified price timeline to a fresh canvas.
///
/// `tiers` pairs with `buckets` by index; `marker` is the now-locator
/// output. An empty bucket set produces a background-only panel.
pub fn render_prices(
    buckets: &[TemporalRecord],
    tiers: &[Tier],
    marker: Option<(usize, f32)>,
    config: &Config,
) -> Result<Canvas, RenderError> {
    let style = &config.style;
    let geometry = &config.prices;
    let mut canvas = Canvas::new(geometry.width, geometry.height, rgb(style.background));

    if buckets.is_empty() {
        return Ok(canvas);
    }

    let label_font = resolve_font(&style.label_fonts)?;
    let label_style = MonoTextStyle::new(label_font, rgb(style.text_secondary));
    let label_measure = MonoMeasure::new(label_font);

    let left = geometry.left_margin as i32;
    let top = geometry.top_margin as i32;
    let bar_height = geometry.bar_height;
    let available = geometry.width - geometry.left_margin - geometry.right_margin;
    // Float width keeps long timelines from accumulating rounding drift.
    let bar_width = available as f32 / buckets.len() as f32;
    let gap = 1;

    for (i, _) in buckets.iter().enumerate() {
        let x = left + (i as f32 * bar_width) as i32;
        let x_end = left + ((i + 1) as f32 * bar_width) as i32 - gap;
        if x_end <= x {
            continue;
        }
        let tier = tiers.get(i).copied().unwrap_or(Tier::Mid);
        let color = match tier {
            Tier::Low => rgb(style.tier_low),
            Tier::Mid => rgb(style.tier_mid),
            Tier::High => rgb(style.tier_high),
        };
        Rectangle::new(Point::new(x, top), Size::new((x_end - x) as u32, bar_height))
            .into_styled(PrimitiveStyle::with_fill(color))
            .draw(&mut canvas)
            .ok();
    }

    // Hour labels under whole-hour buckets.
    let label_y = top + bar_height as i32 + 3;
    for (i, bucket) in buckets.iter().enumerate() {
        if bucket.start.minute() != 0 {
            continue;
        }
        let hour_str = format!("{:02}", bucket.start.hour());
        let center = left + ((i as f32 + 0.5) * bar_width) as i32;
        let text_width = label_measure.text_width(&hour_str) as i32;
        Text::with_baseline(
            &hour_str,
            Point::new(center - text_width / 2, label_y),
            label_style,
            Baseline::Top,
        )
        .draw(&mut canvas)
        .ok();
    }

    if let Some((index, offset)) = marker {
        let now_x = left + ((index as f32 + offset) * bar_width) as i32;
        Line::new(
            Point::new(now_x, top),
            Point::new(now_x, top + bar_height as i32),
        )
        .into_styled(PrimitiveStyle::with_stroke(rgb(style.now_marker), 4))
        .draw(&mut canvas)
        .ok();
    }

    Ok(canvas)
}

/// Terminal rendition of the agenda for `--stdout` development mode.
pub fn agenda_ascii(agenda: &Agenda) -> String {
    let mut out = String::from("Agenda\n");
    if agenda.is_empty() {
        out.push_str(NO_EVENTS);
        out.push('\n');
        return out;
    }
    for day in &agenda.days {
        out.push_str(&format!("{}\n", day.label));
        for record in &day.records {
            let time_str = if record.all_day {
                ALL_DAY.to_owned()
            } else {
                record.start.format("%H:%M").to_string()
            };
            out.push_str(&format!("  {:<8} {}\n", time_str, record.label()));
        }
    }
    if agenda.overflow {
        out.push_str("  ...\n");
    }
    out
}

/// Terminal rendition of the price timeline: one glyph per bucket with a
/// caret row marking "now".
pub fn prices_ascii(
    buckets: &[TemporalRecord],
    tiers: &[Tier],
    marker: Option<(usize, f32)>,
) -> String {
    if buckets.is_empty() {
        return String::from("(geen prijzen)\n");
    }
    let bars: String = (0..buckets.len())
        .map(|i| match tiers.get(i).copied().unwrap_or(Tier::Mid) {
            Tier::Low => '_',
            Tier::Mid => '-',
            Tier::High => '#',
        })
        .collect();

    let mut out = bars;
    out.push('\n');
    if let Some((index, _)) = marker {
        let mut caret_row = " ".repeat(index);
        caret_row.push('^');
        out.push_str(&caret_row);
        out.push('\n');
    }
    out
}
