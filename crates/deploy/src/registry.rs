//! Static registry of pre-existing price feed addresses on live networks.

use std::collections::BTreeMap;

use alloy_core::primitives::{Address, address};

use crate::error::ConfigError;
use crate::network::NetworkDescriptor;

/// Chainlink ETH/USD aggregator on Ethereum mainnet.
const MAINNET_ETH_USD: Address = address!("5f4eC3Df9cbd43714FE2740f5E3616155c5b8419");
/// Chainlink ETH/USD aggregator on Sepolia.
const SEPOLIA_ETH_USD: Address = address!("694AA1769357215DE4FAC081bf1f309aDC325306");

/// Mapping from chain id to the address of the ETH/USD price feed already
/// deployed on that network.
///
/// An explicit value injected into the resolver at construction, never a
/// process-wide table. Absence of an entry for a targeted live network is a
/// fatal configuration error; the registry never falls back to a placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceFeedRegistry {
    entries: BTreeMap<u64, Address>,
}

impl Default for PriceFeedRegistry {
    fn default() -> Self {
        Self {
            entries: BTreeMap::from([(1, MAINNET_ETH_USD), (11155111, SEPOLIA_ETH_USD)]),
        }
    }
}

impl PriceFeedRegistry {
    /// Build a registry from explicit entries, without the built-in defaults.
    pub fn from_entries(entries: impl IntoIterator<Item = (u64, Address)>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    /// Add or override an entry.
    pub fn insert(&mut self, chain_id: u64, feed: Address) {
        self.entries.insert(chain_id, feed);
    }

    /// Look up the feed address for a live network.
    pub fn address_for(&self, network: &NetworkDescriptor) -> Result<Address, ConfigError> {
        self.entries
            .get(&network.chain_id)
            .copied()
            .ok_or_else(|| ConfigError::MissingPriceFeed {
                chain_id: network.chain_id,
                network: network.name.clone(),
            })
    }
}
