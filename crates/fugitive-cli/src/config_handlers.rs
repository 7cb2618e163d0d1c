//! Handlers for the `config` subcommands.
//!
//! Also provides the TOML dotted-key helpers used by `config get`.

use std::io::Write;
use std::path::PathBuf;

use fugitive_core::{Error, Result};

use crate::cli::ConfigAction;
use crate::config::SetupConfig;

/// Dispatch a config subcommand.
pub fn handle_config_command(
    config_path: Option<&str>,
    action: ConfigAction,
    out: &mut impl Write,
) -> Result<()> {
    match action {
        ConfigAction::Path => cmd_config_path(config_path, out),
        ConfigAction::Init { force } => cmd_config_init(config_path, force, out),
        ConfigAction::Show => cmd_config_show(config_path, out),
        ConfigAction::Get { key } => cmd_config_get(config_path, &key, out),
    }
}

/// Show the resolved config file path.
pub fn cmd_config_path(config_path: Option<&str>, out: &mut impl Write) -> Result<()> {
    let path = SetupConfig::resolve_path(config_path)
        .ok_or_else(|| Error::config("Could not determine config directory for this platform"))?;
    writeln!(out, "{}", path.display())?;
    if !path.exists() {
        eprintln!("(file does not exist; run `fugitive-setup config init` to create it)");
    }
    Ok(())
}

/// Write a default configuration file.
pub fn cmd_config_init(config_path: Option<&str>, force: bool, out: &mut impl Write) -> Result<()> {
    let path: PathBuf = SetupConfig::resolve_path(config_path)
        .ok_or_else(|| Error::config("Could not determine config directory"))?;

    if path.exists() && !force {
        return Err(Error::config(format!(
            "Config file already exists at {}. Use --force to overwrite.",
            path.display()
        )));
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, SetupConfig::default().to_toml_string()?)?;

    tracing::info!(path = %path.display(), "Wrote default config");
    writeln!(out, "Config file created at {}", path.display())?;
    Ok(())
}

/// Print the effective configuration as TOML.
pub fn cmd_config_show(config_path: Option<&str>, out: &mut impl Write) -> Result<()> {
    let config = SetupConfig::load(config_path)?;
    write!(out, "{}", config.to_toml_string()?)?;
    Ok(())
}

/// Print one configuration value by dotted key.
pub fn cmd_config_get(config_path: Option<&str>, key: &str, out: &mut impl Write) -> Result<()> {
    let config = SetupConfig::load(config_path)?;
    let value = toml::Value::try_from(&config).map_err(|e| Error::config(e.to_string()))?;
    match get_nested_value(&value, key) {
        Some(val) => {
            writeln!(out, "{}", format_toml_value(val))?;
            Ok(())
        }
        None => Err(Error::config(format!(
            "Key '{key}' not found in configuration"
        ))),
    }
}

/// Navigate a dotted key path in a TOML value tree.
pub fn get_nested_value<'a>(value: &'a toml::Value, key: &str) -> Option<&'a toml::Value> {
    key.split('.')
        .try_fold(value, |current, part| current.as_table()?.get(part))
}

/// Format a TOML value for display on stdout.
pub fn format_toml_value(value: &toml::Value) -> String {
    match value {
        toml::Value::String(s) => s.clone(),
        toml::Value::Integer(i) => i.to_string(),
        toml::Value::Float(f) => f.to_string(),
        toml::Value::Boolean(b) => b.to_string(),
        toml::Value::Datetime(dt) => dt.to_string(),
        toml::Value::Array(_) | toml::Value::Table(_) => {
            toml::to_string_pretty(value).unwrap_or_else(|_| format!("{value:?}"))
        }
    }
}
