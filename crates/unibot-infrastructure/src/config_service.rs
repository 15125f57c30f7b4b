//! Loads the client configuration.
//!
//! Priority (highest first): explicit overrides from the command line,
//! environment variables, `config.toml`, built-in defaults.

use crate::storage::AtomicTomlFile;
use std::path::PathBuf;
use unibot_core::config::ClientConfig;
use unibot_core::error::{Result, UnibotError};

pub const ENV_BASE_URL: &str = "UNIBOT_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "UNIBOT_TIMEOUT_SECS";

/// Reads `config.toml` and applies environment overrides.
pub struct ConfigService {
    file: AtomicTomlFile<ClientConfig>,
}

impl ConfigService {
    pub fn new(path: PathBuf) -> Self {
        Self {
            file: AtomicTomlFile::new(path),
        }
    }

    /// Loads the configuration; a missing file yields the defaults.
    pub fn load(&self) -> Result<ClientConfig> {
        let mut config = self.file.load()?.unwrap_or_default();
        apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
        tracing::debug!(base_url = %config.base_url, "configuration loaded");
        Ok(config)
    }

    /// Writes the configuration, e.g. to seed a template file.
    pub fn save(&self, config: &ClientConfig) -> Result<()> {
        self.file.store(config)?;
        Ok(())
    }
}

fn apply_env_overrides<F>(config: &mut ClientConfig, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(base_url) = lookup(ENV_BASE_URL).filter(|v| !v.trim().is_empty()) {
        config.base_url = base_url;
    }
    if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
        config.request_timeout_secs = raw.trim().parse().map_err(|_| {
            UnibotError::config(format!("{ENV_TIMEOUT_SECS} must be a whole number of seconds, got '{raw}'"))
        })?;
    }
    Ok(())
}
