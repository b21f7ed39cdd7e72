//! Mock price feed deployment for development networks.
//!
//! Live networks already carry real aggregators; development networks get a
//! minimal stand-in so the funding contract's constructor dependency can be
//! satisfied. Deployed at most once per network: a persisted record
//! short-circuits any later run.

use alloy_core::dyn_abi::DynSolValue;
use alloy_core::primitives::{I256, U256};

use crate::chain::{Artifact, ChainClient};
use crate::deployer::deploy_once;
use crate::error::PipelineError;
use crate::network::NetworkDescriptor;
use crate::record::{DeploymentRecord, RecordStore};

/// Artifact name of the mock aggregator contract.
pub const MOCK_AGGREGATOR: &str = "MockV3Aggregator";

/// Fixed-point decimals used by the mock feed.
pub const DECIMALS: u8 = 8;

/// Initial answer reported by the mock feed: 2000 USD at 8 decimals.
pub const INITIAL_ANSWER: i128 = 2_000 * 100_000_000;

/// Constructor parameters for the mock aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockAggregator {
    pub decimals: u8,
    pub initial_answer: i128,
}

impl Default for MockAggregator {
    fn default() -> Self {
        Self {
            decimals: DECIMALS,
            initial_answer: INITIAL_ANSWER,
        }
    }
}

impl MockAggregator {
    /// Constructor arguments in declaration order: (uint8, int256).
    pub fn constructor_args(&self) -> Vec<DynSolValue> {
        vec![
            DynSolValue::Uint(U256::from(self.decimals), 8),
            DynSolValue::Int(I256::try_from(self.initial_answer).expect("i128 fits in I256"), 256),
        ]
    }

    /// Ensure a mock aggregator exists on a development network, deploying
    /// one if no record exists yet.
    ///
    /// Must only be called for development networks; live networks use the
    /// real feed from the registry.
    pub async fn ensure<C: ChainClient, S: RecordStore>(
        &self,
        chain: &C,
        store: &S,
        network: &NetworkDescriptor,
        artifact: &Artifact,
    ) -> Result<DeploymentRecord, PipelineError> {
        debug_assert!(
            network.is_development,
            "mocks are only deployed on development networks"
        );

        tracing::info!(network = %network.name, "Local network detected, ensuring mock price feed");
        deploy_once(chain, store, network, artifact, &self.constructor_args()).await
    }
}
