use std::fs;

use serde::Deserialize;
use tracing::{debug, warn};

use eventsphere_core::{Result, SphereError};

const CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub simulation: SimulationConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Session storage file, the localStorage stand-in.
    pub path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: "eventsphere-session.json".to_string(),
        }
    }
}

/// Delays for the simulated backend round trips, in milliseconds.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub checkout_delay_ms: u64,
    pub login_delay_ms: u64,
    pub signup_delay_ms: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            checkout_delay_ms: 2000,
            login_delay_ms: 1500,
            signup_delay_ms: 2000,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        let raw = fs::read_to_string(CONFIG_PATH).map_err(|e| {
            SphereError::Config(format!("failed to read '{CONFIG_PATH}': {e}"))
        })?;
        toml::from_str(&raw)
            .map_err(|e| SphereError::Config(format!("failed to parse '{CONFIG_PATH}': {e}")))
    }

    /// Loads `config.toml` when present, otherwise the defaults. A broken
    /// config is logged and ignored; nothing here is fatal.
    pub fn load_or_default() -> Self {
        match Self::load() {
            Ok(config) => config,
            Err(err) => {
                if fs::metadata(CONFIG_PATH).is_ok() {
                    warn!(%err, "ignoring unreadable config, using defaults");
                } else {
                    debug!("no config file, using defaults");
                }
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_the_simulated_ui_delays() {
        let config = AppConfig::default();
        assert_eq!(config.storage.path, "eventsphere-session.json");
        assert_eq!(config.simulation.checkout_delay_ms, 2000);
        assert_eq!(config.simulation.login_delay_ms, 1500);
        assert_eq!(config.simulation.signup_delay_ms, 2000);
    }

    #[test]
    fn test_partial_config_keeps_defaults_elsewhere() {
        let config: AppConfig = toml::from_str(
            "[storage]\npath = \"/tmp/session.json\"\n",
        )
        .unwrap();
        assert_eq!(config.storage.path, "/tmp/session.json");
        assert_eq!(config.simulation.checkout_delay_ms, 2000);
    }
}
