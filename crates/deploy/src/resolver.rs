//! Price feed address resolution.
//!
//! The one branch point of the pipeline: development networks get a mock
//! (deploying it on first use), live networks get the registry entry for
//! their chain id. A live network missing from the registry is fatal before
//! any transaction is submitted.

use alloy_core::primitives::Address;

use crate::chain::{ArtifactStore, ChainClient};
use crate::error::PipelineError;
use crate::mocks::{MOCK_AGGREGATOR, MockAggregator};
use crate::network::NetworkDescriptor;
use crate::record::RecordStore;
use crate::registry::PriceFeedRegistry;

/// Resolves the price feed address the funding contract should be wired to.
#[derive(Debug, Clone, Default)]
pub struct PriceFeedResolver {
    pub registry: PriceFeedRegistry,
    pub mock: MockAggregator,
}

impl PriceFeedResolver {
    pub fn new(registry: PriceFeedRegistry, mock: MockAggregator) -> Self {
        Self { registry, mock }
    }

    /// Resolve the feed address for `network`.
    ///
    /// On development networks the mock artifact is loaded and deployed
    /// (idempotently) and its address returned. On live networks the registry
    /// is authoritative and its address is returned verbatim; the mock
    /// artifact is never touched.
    pub async fn resolve<C: ChainClient, S: RecordStore>(
        &self,
        chain: &C,
        store: &S,
        network: &NetworkDescriptor,
        artifacts: &ArtifactStore,
    ) -> Result<Address, PipelineError> {
        if network.is_development {
            let artifact = artifacts.load(MOCK_AGGREGATOR)?;
            let record = self.mock.ensure(chain, store, network, &artifact).await?;
            tracing::debug!(address = %record.address, "Using mock price feed");
            return Ok(record.address);
        }

        let address = self.registry.address_for(network)?;
        tracing::debug!(address = %address, chain_id = network.chain_id, "Using registered price feed");
        Ok(address)
    }
}
