//! # Home Panel Application Entry Point
//!
//! Reads a JSON snapshot from stdin, runs the windowing/classification
//! pipeline for the requested panel and writes the resulting PNG for the
//! display host to pick up.
//!
//! ```text
//! home-panel <agenda|prices> [--stdout] [--config PATH]
//! ```
//!
//! "Now" is resolved exactly once, in the configured zone, before the
//! pipeline runs; everything downstream is deterministic in that instant.
//!
//! Hard failures (unknown zone, exhausted font chain, unwritable output)
//! exit nonzero with an error on stderr and leave any previously written
//! panel untouched, so the surrounding automation can keep serving its
//! last-known-good image instead of crash-looping.

// Test modules
#[cfg(test)]
mod tests;

use anyhow::{anyhow, bail, Context};
use chrono::{DateTime, Duration};
use chrono_tz::Tz;
use home_panel_lib::{agenda, config::Config, ingest, price, render, window, Window};
use std::env;
use std::io::{self, Read};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let mut mode: Option<String> = None;
    let mut config_path: Option<String> = None;
    let mut ascii_mode = false;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--stdout" => ascii_mode = true,
            "--config" => {
                config_path = iter.next().cloned();
                if config_path.is_none() {
                    bail!("--config requires a path");
                }
            }
            other if !other.starts_with("--") && mode.is_none() => {
                mode = Some(other.to_owned());
            }
            other => bail!("unrecognized argument `{other}`"),
        }
    }

    let Some(mode) = mode else {
        bail!("usage: home-panel <agenda|prices> [--stdout] [--config PATH]");
    };

    let config = match config_path {
        Some(path) => Config::load_from_path(path),
        None => Config::load(),
    };

    // The core never reads the wall clock; resolve "now" once, here.
    let tz = config
        .time
        .zone()
        .ok_or_else(|| anyhow!("unknown time zone `{}`", config.time.zone))?;
    let now = chrono::Utc::now().with_timezone(&tz);

    let stdin = io::stdin();
    match mode.as_str() {
        "agenda" => run_agenda(stdin.lock(), now, &config, ascii_mode),
        "prices" => run_prices(stdin.lock(), now, &config, ascii_mode),
        other => bail!("unknown mode `{other}`, expected `agenda` or `prices`"),
    }
}

/// Agenda pipeline: ingest → window filter → day grouping → render.
fn run_agenda<R: Read>(
    input: R,
    now: DateTime<Tz>,
    config: &Config,
    ascii_mode: bool,
) -> anyhow::Result<()> {
    let records = ingest::read_agenda(input, now.timezone());
    let window = Window::new(
        now,
        Duration::zero(),
        Duration::days(config.agenda.lookahead_days),
    );
    let visible = window::filter(records, &window);
    let grouped = agenda::group(visible, now, config.agenda.max_events);

    if ascii_mode {
        print!("{}", render::agenda_ascii(&grouped));
        return Ok(());
    }

    let canvas = render::render_agenda(&grouped, config)?;
    canvas
        .save_png(&config.agenda.output)
        .with_context(|| format!("writing {}", config.agenda.output))?;
    log::info!("agenda panel saved to {}", config.agenda.output);
    Ok(())
}

/// Price pipeline: ingest → window filter → classify + locate → render.
fn run_prices<R: Read>(
    input: R,
    now: DateTime<Tz>,
    config: &Config,
    ascii_mode: bool,
) -> anyhow::Result<()> {
    let records = ingest::read_prices(input, now.timezone());
    let window = Window::new(
        now,
        Duration::hours(config.prices.lookback_hours),
        Duration::hours(config.prices.lookahead_hours),
    );
    let buckets = window::filter(records, &window);
    let tiers = price::classify(&buckets);
    let marker = (!buckets.is_empty()).then(|| price::locate(&buckets, now));

    if ascii_mode {
        print!("{}", render::prices_ascii(&buckets, &tiers, marker));
        return Ok(());
    }

    let canvas = render::render_prices(&buckets, &tiers, marker, config)?;
    canvas
        .save_png(&config.prices.output)
        .with_context(|| format!("writing {}", config.prices.output))?;
    log::info!("price panel saved to {}", config.prices.output);
    Ok(())
}
