mod types;

pub use types::*;

use crate::{Error, Result};
use std::{env, path::Path};
use tracing::debug;

const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Loads `.env`, the YAML config file and environment overrides.
pub async fn load() -> Result<Config> {
    dotenvy::dotenv().ok();
    load_with(|key| env::var(key).ok()).await
}

/// Reads `CONFIG_PATH` and the overrides through `lookup`.
///
/// The config file is optional unless `CONFIG_PATH` names it explicitly.
pub async fn load_with<F>(lookup: F) -> Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    let explicit_path = lookup("CONFIG_PATH");
    let config_path = explicit_path
        .clone()
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

    let mut config = if explicit_path.is_some() || Path::new(&config_path).exists() {
        debug!("Loading configuration from: {}", config_path);
        let config_str = tokio::fs::read_to_string(&config_path).await?;
        parse(&config_str)?
    } else {
        debug!("No configuration file found, using defaults");
        Config::default()
    };

    config.apply_env_overrides(lookup)?;

    Ok(config)
}

pub fn parse(config_str: &str) -> Result<Config> {
    if config_str.trim().is_empty() {
        return Ok(Config::default());
    }
    Ok(serde_yaml::from_str(config_str)?)
}

impl Config {
    /// Applies `GEMINI_API_KEY`, `GEMINI_MODEL` and `PORT` from `lookup`.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(api_key) = lookup("GEMINI_API_KEY") {
            self.llm.api_key = Some(api_key);
        }

        if let Some(model) = lookup("GEMINI_MODEL").filter(|m| !m.is_empty()) {
            self.llm.model = model;
        }

        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|_| Error::config(format!("Invalid PORT value: '{}'", port)))?;
        }

        Ok(())
    }
}
