use clap::{Args, Subcommand};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use tracing::info;

use bond_amort_core::amortization::AmortizationMethod;

use crate::config::{config_path, CliConfig};
use crate::OutputFormat;

/// Arguments for the config command
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show stored defaults
    Show,
    /// Get one stored default
    Get {
        /// method, discount_rate or output
        key: String,
    },
    /// Store a default
    Set {
        /// method, discount_rate or output
        key: String,
        value: String,
    },
    /// Remove one default, or all of them when no key is given
    Reset { key: Option<String> },
    /// Show the configuration file location
    Path,
}

const KEYS: [&str; 3] = ["method", "discount_rate", "output"];

pub fn run_config(
    args: ConfigArgs,
    mut settings: CliConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    match args.command {
        ConfigCommand::Show => Ok(serde_json::to_value(&settings)?),
        ConfigCommand::Get { key } => {
            let value = match key_of(&key)? {
                "method" => settings.method.map(|m| json!(m)),
                "discount_rate" => settings.discount_rate.map(|r| json!(r.to_string())),
                _ => settings.output.map(|o| json!(o)),
            };
            Ok(json!({ key: value.unwrap_or(Value::Null) }))
        }
        ConfigCommand::Set { key, value } => {
            match key_of(&key)? {
                "method" => settings.method = Some(value.parse::<AmortizationMethod>()?),
                "discount_rate" => {
                    let rate: Decimal = value
                        .parse()
                        .map_err(|e| format!("Invalid discount_rate '{value}': {e}"))?;
                    if rate <= Decimal::from(-100) {
                        return Err("discount_rate must be greater than -100".into());
                    }
                    settings.discount_rate = Some(rate);
                }
                _ => {
                    let format = <OutputFormat as clap::ValueEnum>::from_str(&value, true)
                        .map_err(|_| format!("Invalid output '{value}': use json, table, csv or minimal"))?;
                    settings.output = Some(format);
                }
            }
            let path = settings.save()?;
            info!(path = %path.display(), %key, "config updated");
            Ok(serde_json::to_value(&settings)?)
        }
        ConfigCommand::Reset { key } => {
            match key.as_deref().map(key_of).transpose()? {
                Some("method") => settings.method = None,
                Some("discount_rate") => settings.discount_rate = None,
                Some(_) => settings.output = None,
                None => settings = CliConfig::default(),
            }
            settings.save()?;
            Ok(serde_json::to_value(&settings)?)
        }
        ConfigCommand::Path => Ok(json!({ "path": config_path()?.display().to_string() })),
    }
}

fn key_of(key: &str) -> Result<&'static str, Box<dyn std::error::Error>> {
    let normalized = key.trim().to_lowercase().replace('-', "_");
    KEYS.into_iter()
        .find(|k| *k == normalized)
        .ok_or_else(|| format!("Unknown config key '{key}': use method, discount_rate or output").into())
}
