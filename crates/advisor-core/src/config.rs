//! Display and report configuration
//!
//! ## Configuration Resolution
//!
//! Config is loaded with a two-layer resolution:
//! 1. An explicit path, or the user override (~/.config/advisor/config.toml)
//! 2. Fall back to embedded defaults (compiled into binary)
//!
//! Keys missing from an override keep their default values.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::ReportStatus;

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/advisor.toml");

/// Where the active configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Embedded,
    File(PathBuf),
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Embedded => write!(f, "built-in defaults"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Config {
    pub display: DisplayConfig,
    pub reports: ReportsConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayConfig {
    pub currency_symbol: String,
    pub decimal_places: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportsConfig {
    pub default_status: ReportStatus,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            display: DisplayConfig {
                currency_symbol: "$".to_string(),
                decimal_places: 2,
            },
            reports: ReportsConfig {
                default_status: ReportStatus::Pending,
            },
        }
    }
}

impl Config {
    /// Load using the standard resolution order
    ///
    /// An explicit `path` that does not exist is an error; a missing user
    /// override silently falls back to the embedded defaults.
    pub fn load(path: Option<&Path>) -> Result<(Self, ConfigSource)> {
        if let Some(path) = path {
            if !path.exists() {
                return Err(Error::NotFound(format!(
                    "Config file {}",
                    path.display()
                )));
            }
            return Ok((Self::from_file(path)?, ConfigSource::File(path.to_path_buf())));
        }

        if let Some(default_path) = default_config_path() {
            if default_path.exists() {
                let config = Self::from_file(&default_path)?;
                return Ok((config, ConfigSource::File(default_path)));
            }
        }

        debug!("Using embedded default config");
        Ok((parse_config(DEFAULT_CONFIG)?, ConfigSource::Embedded))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "Loading config");
        let content = fs::read_to_string(path)?;
        parse_config(&content)
    }

    /// Render an amount, e.g. `-$1,234.50`
    pub fn format_amount(&self, amount: f64) -> String {
        let places = self.display.decimal_places;
        let formatted = format!("{:.*}", places, amount.abs());
        let (whole, fraction) = match formatted.split_once('.') {
            Some((whole, fraction)) => (whole, Some(fraction)),
            None => (formatted.as_str(), None),
        };

        let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
        for (i, digit) in whole.chars().enumerate() {
            if i > 0 && (whole.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(digit);
        }

        // Rounding can turn a tiny negative into zero; don't print "-$0.00"
        let is_zero = whole.chars().all(|c| c == '0')
            && fraction.map_or(true, |f| f.chars().all(|c| c == '0'));
        let sign = if amount < 0.0 && !is_zero { "-" } else { "" };

        match fraction {
            Some(fraction) => format!(
                "{}{}{}.{}",
                sign, self.display.currency_symbol, grouped, fraction
            ),
            None => format!("{}{}{}", sign, self.display.currency_symbol, grouped),
        }
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("advisor").join("config.toml"))
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    display: Option<RawDisplay>,
    reports: Option<RawReports>,
}

#[derive(Debug, Deserialize)]
struct RawDisplay {
    currency_symbol: Option<String>,
    decimal_places: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct RawReports {
    default_status: Option<String>,
}

/// Parse config from TOML content, layering it over the defaults
fn parse_config(content: &str) -> Result<Config> {
    let raw: RawConfig = toml::from_str(content)
        .map_err(|e| Error::InvalidData(format!("Invalid config TOML: {}", e)))?;

    let mut config = Config::default();

    if let Some(display) = raw.display {
        if let Some(symbol) = display.currency_symbol {
            config.display.currency_symbol = symbol;
        }
        if let Some(places) = display.decimal_places {
            if places > 6 {
                return Err(Error::InvalidData(format!(
                    "decimal_places must be at most 6, got {}",
                    places
                )));
            }
            config.display.decimal_places = places;
        }
    }

    if let Some(reports) = raw.reports {
        if let Some(status) = reports.default_status {
            config.reports.default_status = status.parse().map_err(Error::InvalidData)?;
        }
    }

    Ok(config)
}
