//! Error taxonomy for the deployment pipeline.
//!
//! Configuration problems abort before any transaction is submitted.
//! Deployment problems abort the run with no rollback (deployed contracts
//! are not revocable). Verification problems never surface here at all:
//! they are classified into a [`VerificationOutcome`](crate::VerificationOutcome)
//! at the verification boundary.

use std::path::PathBuf;

use crate::rpc::RpcError;

/// Fatal configuration problems, raised before any transaction is submitted.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A live network was targeted without a registry entry for its price feed.
    ///
    /// Deliberately fatal: defaulting to a placeholder address would deploy a
    /// contract wired to the wrong feed.
    #[error(
        "no price feed registered for chain id {chain_id} ({network}); \
         add an entry to the price feed registry"
    )]
    MissingPriceFeed { chain_id: u64, network: String },

    /// A contract artifact could not be read or parsed.
    #[error("failed to load artifact {name} from {path}: {reason}")]
    Artifact {
        name: String,
        path: PathBuf,
        reason: String,
    },

    /// The TOML config file could not be read or parsed.
    #[error("invalid config file {path}: {reason}")]
    ConfigFile { path: PathBuf, reason: String },
}

/// Fatal deployment failures. The pipeline stops; nothing is rolled back.
#[derive(Debug, thiserror::Error)]
pub enum DeploymentError {
    /// The deployment transaction was mined but reverted.
    #[error("deployment of {artifact} reverted (tx {tx_hash})")]
    Rejected { artifact: String, tx_hash: String },

    /// The receipt or requested confirmation depth never materialized.
    #[error("timed out waiting for {confirmations} confirmation(s) of tx {tx_hash}")]
    ConfirmationTimeout { tx_hash: String, confirmations: u64 },

    /// The node rejected or failed an RPC request.
    #[error(transparent)]
    Rpc(#[from] RpcError),

    /// The deployment record store could not be read or written.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Failures of the on-disk deployment record store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to access deployment record at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed deployment record at {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Top-level error type returned by a pipeline run.
///
/// Verification failures are not represented here: deployment is the
/// authoritative outcome and a failed advisory verification still terminates
/// the run successfully.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Deployment(#[from] DeploymentError),
}
