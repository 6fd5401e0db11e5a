//! # Configuration Management
//!
//! Loads runtime configuration from panel-config.toml: window sizes, event
//! caps, colors, font fallback chains and output paths. Everything the
//! pipeline parameterizes on flows through this value rather than
//! process-wide constants, so the core stays testable with varied parameters
//! and without environment mutation.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Application configuration loaded from panel-config.toml
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Config {
    /// Local time zone resolution
    pub time: TimeConfig,
    /// Agenda panel geometry and limits
    pub agenda: AgendaConfig,
    /// Price panel geometry and window
    pub prices: PriceConfig,
    /// Colors and font fallback chains shared by both panels
    pub style: StyleConfig,
}

/// Time zone configuration
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct TimeConfig {
    /// IANA zone name (e.g. "Europe/Amsterdam"); resolved once at startup
    pub zone: String,
}

impl TimeConfig {
    /// Resolve the configured zone name. `None` when the name is unknown;
    /// the binary treats that as a hard startup failure.
    pub fn zone(&self) -> Option<chrono_tz::Tz> {
        self.zone.parse().ok()
    }
}

/// Agenda panel configuration
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct AgendaConfig {
    /// Panel width in pixels
    pub width: u32,
    /// Panel height in pixels
    pub height: u32,
    /// Days ahead to show (lookahead horizon; lookback is always zero)
    pub lookahead_days: i64,
    /// Maximum events across all day groups
    pub max_events: usize,
    /// Output PNG path
    pub output: String,
}

/// Price panel configuration
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct PriceConfig {
    /// Panel width in pixels
    pub width: u32,
    /// Panel height in pixels
    pub height: u32,
    /// Hours of past ticks kept visible
    pub lookback_hours: i64,
    /// Hours of future ticks kept visible
    pub lookahead_hours: i64,
    /// Bar height in pixels
    pub bar_height: u32,
    /// Top margin above the bars
    pub top_margin: u32,
    /// Left margin so the first hour label isn't cut off
    pub left_margin: u32,
    /// Right margin
    pub right_margin: u32,
    /// Output PNG path
    pub output: String,
}

/// Colors (RGB triples) and font fallback chains
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct StyleConfig {
    pub background: [u8; 3],
    pub text_primary: [u8; 3],
    pub text_secondary: [u8; 3],
    pub accent: [u8; 3],
    pub tier_low: [u8; 3],
    pub tier_mid: [u8; 3],
    pub tier_high: [u8; 3],
    pub now_marker: [u8; 3],
    /// Font candidates for the panel title, tried in order
    pub title_fonts: Vec<String>,
    /// Font candidates for event text
    pub body_fonts: Vec<String>,
    /// Font candidates for small labels (times, hours)
    pub label_fonts: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            time: TimeConfig {
                zone: "Europe/Amsterdam".to_string(),
            },
            agenda: AgendaConfig {
                width: 314,
                height: 220,
                lookahead_days: 2,
                max_events: 6,
                output: "out/agenda.png".to_string(),
            },
            prices: PriceConfig {
                width: 648,
                height: 50,
                lookback_hours: 4,
                lookahead_hours: 20,
                bar_height: 18,
                top_margin: 8,
                left_margin: 8,
                right_margin: 8,
                output: "out/energieprijzen.png".to_string(),
            },
            style: StyleConfig {
                background: [26, 26, 28],      // #1A1A1C
                text_primary: [255, 255, 255], // white
                text_secondary: [156, 163, 175], // #9CA3AF
                accent: [0, 122, 255],         // blue
                tier_low: [34, 197, 94],       // #22c55e green
                tier_mid: [209, 213, 219],     // #d1d5db gray
                tier_high: [239, 68, 68],      // #ef4444 red
                now_marker: [0, 122, 255],     // blue
                title_fonts: vec!["10x20".to_string(), "9x18".to_string()],
                body_fonts: vec!["9x15".to_string(), "8x13".to_string()],
                label_fonts: vec!["6x10".to_string(), "5x8".to_string()],
            },
        }
    }
}

impl Config {
    /// Load configuration from panel-config.toml in the working directory.
    /// Falls back to default configuration if the file is missing or invalid.
    pub fn load() -> Self {
        Self::load_from_path("panel-config.toml")
    }

    /// Load configuration from the specified path.
    /// Falls back to default configuration if the file is missing or invalid.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match toml::from_str::<Config>(&contents) {
                Ok(config) => config,
                Err(e) => {
                    log::warn!("invalid config file format: {e}; using defaults");
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("no config file found, using defaults");
                Self::default()
            }
        }
    }

    /// Save current configuration to panel-config.toml
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let contents = toml::to_string_pretty(self)?;
        fs::write("panel-config.toml", contents)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.time.zone, "Europe/Amsterdam");
        assert_eq!(config.agenda.width, 314);
        assert_eq!(config.agenda.max_events, 6);
        assert_eq!(config.prices.lookback_hours, 4);
        assert_eq!(config.prices.lookahead_hours, 20);
    }

    #[test]
    fn test_zone_resolution() {
        let config = Config::default();
        assert_eq!(config.time.zone(), Some(chrono_tz::Europe::Amsterdam));

        let bad = TimeConfig {
            zone: "Mars/Olympus_Mons".to_string(),
        };
        assert!(bad.zone().is_none());
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(config.time.zone, parsed.time.zone);
        assert_eq!(config.agenda.max_events, parsed.agenda.max_events);
        assert_eq!(config.style.tier_low, parsed.style.tier_low);
    }

    #[test]
    fn test_load_nonexistent_file() {
        let config = Config::load_from_path("/nonexistent/path");
        // Should fall back to default
        assert_eq!(config.agenda.width, 314);
    }

    #[test]
    fn test_load_invalid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"geen geldige toml [[").unwrap();
        let config = Config::load_from_path(file.path());
        assert_eq!(config.prices.width, 648);
    }

    #[test]
    fn test_load_partial_override() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let contents = toml::to_string_pretty(&{
            let mut c = Config::default();
            c.agenda.max_events = 4;
            c
        })
        .unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        let config = Config::load_from_path(file.path());
        assert_eq!(config.agenda.max_events, 4);
    }
}
