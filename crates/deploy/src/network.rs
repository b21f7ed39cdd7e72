//! Network classification.
//!
//! A network is either a development network (isolated, ephemeral, no real
//! price-feed infrastructure) or a live network (public, persistent, feeds
//! already deployed at known addresses). Everything downstream branches on
//! this single distinction.

use serde::{Deserialize, Serialize};

/// Names of networks treated as development networks.
///
/// Matching is by name only: an in-process Anvil instance and a standalone
/// local node are the two environments where mocks are deployed.
pub const DEV_CHAIN_NAMES: &[&str] = &["anvil", "localhost"];

/// Immutable description of the target network, read once at pipeline start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkDescriptor {
    /// The numeric chain id.
    pub chain_id: u64,
    /// The network name as supplied by the caller.
    pub name: String,
    /// Whether this is a development network.
    pub is_development: bool,
    /// How many inclusions to wait for after submitting a deployment.
    pub confirmations: u64,
}

impl NetworkDescriptor {
    /// Classify a network by name and chain id.
    ///
    /// Pure and deterministic: a case-insensitive membership test against
    /// [`DEV_CHAIN_NAMES`]. Confirmations default to 1; live networks
    /// typically want more, see [`with_confirmations`](Self::with_confirmations).
    pub fn classify(name: &str, chain_id: u64) -> Self {
        let lowered = name.to_lowercase();
        let is_development = DEV_CHAIN_NAMES.contains(&lowered.as_str());

        Self {
            chain_id,
            name: name.to_string(),
            is_development,
            confirmations: 1,
        }
    }

    /// Override the confirmation depth (e.g. from per-network config).
    pub fn with_confirmations(mut self, confirmations: u64) -> Self {
        self.confirmations = confirmations.max(1);
        self
    }
}
