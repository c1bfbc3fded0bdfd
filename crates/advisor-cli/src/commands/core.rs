//! Shared command utilities
//!
//! This module contains:
//! - `read_document` - Read a JSON document from a file or stdin
//! - `load_config` - Resolve the active configuration
//! - `cmd_config` - Show the active configuration

use std::fs;
use std::io::Read;
use std::path::Path;

use advisor_core::{Config, ConfigSource};
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use tracing::debug;

/// Read and parse a JSON document; a path of "-" reads stdin
pub fn read_document<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        buf
    } else {
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?
    };

    debug!(path = %path.display(), bytes = content.len(), "Read document");
    serde_json::from_str(&content).with_context(|| format!("Invalid JSON in {}", path.display()))
}

pub fn load_config(path: Option<&Path>) -> Result<(Config, ConfigSource)> {
    let (config, source) = Config::load(path).context("Failed to load config")?;
    debug!(source = %source, "Loaded config");
    Ok((config, source))
}

pub fn cmd_config(config: &Config, source: &ConfigSource) -> Result<()> {
    println!();
    println!("⚙️  Advisor Config");
    println!("   Source: {}", source);
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   Currency symbol:       {}", config.display.currency_symbol);
    println!("   Decimal places:        {}", config.display.decimal_places);
    println!("   Default report status: {}", config.reports.default_status);
    println!();
    println!("   Sample amount: {}", config.format_amount(-1234.5));
    Ok(())
}
