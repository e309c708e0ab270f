//! CLI command implementations

use anyhow::{Context, Result};
use pgstate_provider::{Provider, ProviderConfig};
use serde_json::Value;
use std::path::Path;

pub mod role;
pub mod status;

/// Load provider settings and connect
pub async fn configured_provider(config_path: Option<&Path>) -> Result<Provider> {
    let config = ProviderConfig::load(config_path).context("loading provider configuration")?;
    let mut provider = Provider::new(env!("CARGO_PKG_VERSION"));
    provider
        .configure(&config)
        .await
        .context("configuring provider")?;
    Ok(provider)
}

pub fn read_json(path: &Path) -> Result<Value> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
}

/// Write JSON to stdout
pub fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
