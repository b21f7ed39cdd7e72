//! Idempotent contract deployment against the record store.

use alloy_core::dyn_abi::DynSolValue;

use crate::chain::{Artifact, ChainClient, display_arg};
use crate::error::{DeploymentError, PipelineError};
use crate::network::NetworkDescriptor;
use crate::record::{DeploymentRecord, RecordStore};

/// Deploy `artifact` on `network` unless a deployment record already exists.
///
/// This is the single get-or-create path every deployment goes through: the
/// store is consulted first, and an existing record is returned unchanged
/// without submitting anything. Otherwise the transaction is submitted, the
/// network's confirmation depth is awaited, and the new record is persisted
/// and returned. Rejection or timeout propagates as a fatal error.
pub async fn deploy_once<C: ChainClient, S: RecordStore>(
    chain: &C,
    store: &S,
    network: &NetworkDescriptor,
    artifact: &Artifact,
    args: &[DynSolValue],
) -> Result<DeploymentRecord, PipelineError> {
    let name = &artifact.contract_name;

    if let Some(existing) = store.get(&network.name, name).map_err(DeploymentError::from)? {
        tracing::info!(
            artifact = %name,
            address = %existing.address,
            network = %network.name,
            "Reusing existing deployment, skipping"
        );
        return Ok(existing);
    }

    tracing::info!(
        artifact = %name,
        network = %network.name,
        confirmations = network.confirmations,
        "Deploying..."
    );

    let deployed = chain
        .deploy_contract(artifact, args, network.confirmations)
        .await?;

    let record = DeploymentRecord {
        artifact: name.clone(),
        address: deployed.address,
        tx_hash: Some(deployed.tx_hash),
        constructor_args: args.iter().map(display_arg).collect(),
        abi: artifact.abi.clone(),
    };

    store
        .put(&network.name, &record)
        .map_err(DeploymentError::from)?;

    tracing::info!(artifact = %name, address = %record.address, "Deployed");
    Ok(record)
}
