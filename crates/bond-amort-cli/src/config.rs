//! Stored CLI defaults.
//!
//! Kept as JSON under the platform config directory; `BAMORT_CONFIG` points
//! somewhere else. Command-line flags always take precedence.

use bond_amort_core::amortization::AmortizationMethod;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::debug;

use crate::OutputFormat;

pub const CONFIG_ENV: &str = "BAMORT_CONFIG";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CliConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<AmortizationMethod>,
    /// Annual discount rate in percent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_rate: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<OutputFormat>,
}

impl CliConfig {
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let path = config_path()?;
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(&path)
            .map_err(|e| format!("Failed to read '{}': {}", path.display(), e))?;
        let config = serde_json::from_str(&contents)
            .map_err(|e| format!("Failed to parse '{}': {}", path.display(), e))?;
        debug!(path = %path.display(), ?config, "loaded config");
        Ok(config)
    }

    pub fn save(&self) -> Result<PathBuf, Box<dyn std::error::Error>> {
        let path = config_path()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, serde_json::to_string_pretty(self)?)?;
        Ok(path)
    }
}

pub fn config_path() -> Result<PathBuf, Box<dyn std::error::Error>> {
    if let Some(custom) = std::env::var_os(CONFIG_ENV) {
        return Ok(PathBuf::from(custom));
    }
    let base = dirs::config_dir()
        .or_else(dirs::home_dir)
        .ok_or("Could not determine a configuration directory")?;
    Ok(base.join("bond-amort").join("config.json"))
}
