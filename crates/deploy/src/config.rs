//! Optional TOML configuration file.
//!
//! Everything here has a built-in default; the file only overrides. CLI
//! flags in turn override the file.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use alloy_core::primitives::Address;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::mocks::MockAggregator;
use crate::registry::PriceFeedRegistry;

/// The default name for the configuration file.
pub const CONFIG_FILENAME: &str = "Fundme.toml";

/// Per-network settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkSettings {
    /// Confirmation depth to wait for on this network.
    pub confirmations: Option<u64>,
}

/// Mock aggregator overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MockSettings {
    pub decimals: Option<u8>,
    pub initial_answer: Option<i128>,
}

/// Deployment configuration loaded from [`CONFIG_FILENAME`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployConfig {
    /// Settings keyed by network name.
    #[serde(default)]
    pub networks: BTreeMap<String, NetworkSettings>,

    /// Price feed registry overrides, keyed by chain id.
    ///
    /// TOML keys are strings, so chain ids appear quoted: `"11155111" = "0x…"`.
    #[serde(default)]
    pub price_feeds: BTreeMap<String, Address>,

    /// Mock aggregator constructor overrides.
    #[serde(default)]
    pub mock: MockSettings,
}

impl DeployConfig {
    /// Load the configuration from a TOML file, or from `Fundme.toml` inside
    /// a directory.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let config_path = if path.is_dir() {
            path.join(CONFIG_FILENAME)
        } else {
            path.to_path_buf()
        };

        let file_err = |reason: String| ConfigError::ConfigFile {
            path: config_path.clone(),
            reason,
        };

        let content = std::fs::read_to_string(&config_path).map_err(|e| file_err(e.to_string()))?;
        let config: Self = toml::from_str(&content).map_err(|e| file_err(e.to_string()))?;

        tracing::info!(path = %config_path.display(), "Configuration loaded");
        config.validate(&config_path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<(), ConfigError> {
        for key in self.price_feeds.keys() {
            if key.parse::<u64>().is_err() {
                return Err(ConfigError::ConfigFile {
                    path: path.to_path_buf(),
                    reason: format!("price_feeds key {key:?} is not a chain id"),
                });
            }
        }
        Ok(())
    }

    /// The built-in registry with this config's overrides applied.
    pub fn registry(&self) -> PriceFeedRegistry {
        let mut registry = PriceFeedRegistry::default();
        for (key, address) in &self.price_feeds {
            // validate() guarantees the keys parse.
            let chain_id = key.parse::<u64>().expect("validated chain id key");
            registry.insert(chain_id, *address);
        }
        registry
    }

    /// Configured confirmation depth for a network, if any.
    pub fn confirmations_for(&self, network: &str) -> Option<u64> {
        self.networks.get(network).and_then(|n| n.confirmations)
    }

    /// Mock aggregator parameters with this config's overrides applied.
    pub fn mock(&self) -> MockAggregator {
        let defaults = MockAggregator::default();
        MockAggregator {
            decimals: self.mock.decimals.unwrap_or(defaults.decimals),
            initial_answer: self.mock.initial_answer.unwrap_or(defaults.initial_answer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::NetworkDescriptor;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: DeployConfig = toml::from_str("").unwrap();
        assert_eq!(config.mock(), MockAggregator::default());
        assert_eq!(config.confirmations_for("sepolia"), None);

        let sepolia = NetworkDescriptor::classify("sepolia", 11155111);
        assert!(config.registry().address_for(&sepolia).is_ok());
    }

    #[test]
    fn test_full_config_parses_and_overrides() {
        let raw = r#"
            [networks.sepolia]
            confirmations = 3

            [price_feeds]
            "137" = "0xAB594600376Ec9fD91F8e885dADF0CE036862dE0"

            [mock]
            decimals = 18
        "#;
        let config: DeployConfig = toml::from_str(raw).unwrap();

        assert_eq!(config.confirmations_for("sepolia"), Some(3));
        assert_eq!(config.mock().decimals, 18);

        let polygon = NetworkDescriptor::classify("polygon", 137);
        assert!(config.registry().address_for(&polygon).is_ok());
    }

    #[test]
    fn test_bad_price_feed_key_is_rejected() {
        let config: DeployConfig = toml::from_str(
            r#"
            [price_feeds]
            "sepolia" = "0x694AA1769357215DE4FAC081bf1f309aDC325306"
            "#,
        )
        .unwrap();

        assert!(config.validate(&PathBuf::from("Fundme.toml")).is_err());
    }
}
