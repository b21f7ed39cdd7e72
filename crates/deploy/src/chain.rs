//! The deployment transport: contract artifacts and the client that turns
//! them into on-chain contracts.
//!
//! [`ChainClient`] is the narrow seam between the orchestration logic and the
//! node. The pipeline only ever asks it to deploy an artifact and wait for
//! confirmations; signing, gas and compilation stay on the other side of it.

use std::future::Future;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use alloy_core::dyn_abi::DynSolValue;
use alloy_core::primitives::{Address, Bytes};
use serde::Deserialize;
use serde_json::Value;
use url::Url;

use crate::error::{ConfigError, DeploymentError};
use crate::rpc::{self, RpcError};

/// A compiled contract artifact, as loaded from a JSON file.
#[derive(Debug, Clone, Deserialize)]
pub struct Artifact {
    /// Contract name, e.g. "FundMe".
    #[serde(alias = "contractName")]
    pub contract_name: String,
    /// The contract ABI.
    pub abi: Value,
    /// Creation bytecode.
    pub bytecode: Bytes,
    /// Flattened source code, required only for verification.
    #[serde(default)]
    pub source: Option<String>,
    /// Full solc version string, required only for verification.
    #[serde(default, alias = "compilerVersion")]
    pub compiler_version: Option<String>,
}

/// Loads artifacts from a directory of `<Name>.json` files.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn load(&self, name: &str) -> Result<Artifact, ConfigError> {
        let path = self.dir.join(format!("{name}.json"));
        let artifact_err = |reason: String| ConfigError::Artifact {
            name: name.to_string(),
            path: path.clone(),
            reason,
        };

        let content = std::fs::read_to_string(&path).map_err(|e| artifact_err(e.to_string()))?;
        serde_json::from_str(&content).map_err(|e| artifact_err(e.to_string()))
    }
}

/// The result of a confirmed deployment transaction.
#[derive(Debug, Clone)]
pub struct Deployed {
    pub address: Address,
    pub tx_hash: String,
}

/// Narrow interface to whatever actually submits deployment transactions.
///
/// Tests inject a fake; production uses [`EthereumClient`].
pub trait ChainClient {
    /// Deploy `artifact` with the given ordered constructor arguments and
    /// block until `confirmations` inclusions are observed.
    fn deploy_contract(
        &self,
        artifact: &Artifact,
        args: &[DynSolValue],
        confirmations: u64,
    ) -> impl Future<Output = Result<Deployed, DeploymentError>> + Send;
}

/// Default time to wait for a receipt and for the confirmation depth.
const DEFAULT_CONFIRMATION_TIMEOUT: Duration = Duration::from_secs(180);

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TxReceipt {
    contract_address: Option<Address>,
    status: Option<String>,
    block_number: String,
}

/// [`ChainClient`] over a JSON-RPC endpoint with node-managed accounts.
#[derive(Debug, Clone)]
pub struct EthereumClient {
    client: reqwest::Client,
    url: Url,
    sender: Option<Address>,
    confirmation_timeout: Duration,
}

impl EthereumClient {
    pub fn new(url: Url) -> Result<Self, RpcError> {
        let client = rpc::create_client().map_err(|source| RpcError::Http {
            method: "client setup".to_string(),
            source,
        })?;

        Ok(Self {
            client,
            url,
            sender: None,
            confirmation_timeout: DEFAULT_CONFIRMATION_TIMEOUT,
        })
    }

    /// Use a fixed sender instead of the node's first unlocked account.
    pub fn with_sender(mut self, sender: Address) -> Self {
        self.sender = Some(sender);
        self
    }

    pub fn with_confirmation_timeout(mut self, timeout: Duration) -> Self {
        self.confirmation_timeout = timeout;
        self
    }

    /// The account deployments are sent from: the configured sender, or the
    /// node's first unlocked account.
    async fn sender(&self) -> Result<Address, RpcError> {
        if let Some(sender) = self.sender {
            return Ok(sender);
        }

        let accounts: Vec<Address> =
            rpc::json_rpc_call(&self.client, self.url.as_str(), "eth_accounts", vec![]).await?;
        accounts.first().copied().ok_or_else(|| RpcError::BadResponse {
            method: "eth_accounts".to_string(),
            reason: "node has no unlocked accounts and no sender was configured".to_string(),
        })
    }

    async fn wait_for_receipt(&self, tx_hash: &str) -> Result<Option<TxReceipt>, RpcError> {
        let start = Instant::now();
        loop {
            let receipt: Option<TxReceipt> = rpc::json_rpc_call(
                &self.client,
                self.url.as_str(),
                "eth_getTransactionReceipt",
                vec![Value::String(tx_hash.to_string())],
            )
            .await?;

            if receipt.is_some() {
                return Ok(receipt);
            }
            if start.elapsed() > self.confirmation_timeout {
                return Ok(None);
            }

            tracing::trace!(tx_hash, "No receipt yet, retrying...");
            tokio::time::sleep(rpc::POLL_INTERVAL).await;
        }
    }

    /// Block until the chain head is `confirmations - 1` blocks past the
    /// inclusion block, so the transaction has `confirmations` inclusions.
    async fn wait_for_depth(
        &self,
        inclusion_block: u64,
        confirmations: u64,
    ) -> Result<bool, RpcError> {
        let target = inclusion_block + confirmations.saturating_sub(1);
        let start = Instant::now();

        loop {
            let head: String =
                rpc::json_rpc_call(&self.client, self.url.as_str(), "eth_blockNumber", vec![])
                    .await?;
            let head = rpc::parse_hex_quantity("eth_blockNumber", &head)?;

            if head >= target {
                return Ok(true);
            }
            if start.elapsed() > self.confirmation_timeout {
                return Ok(false);
            }

            tracing::trace!(head, target, "Waiting for confirmation depth...");
            tokio::time::sleep(rpc::POLL_INTERVAL).await;
        }
    }
}

impl ChainClient for EthereumClient {
    async fn deploy_contract(
        &self,
        artifact: &Artifact,
        args: &[DynSolValue],
        confirmations: u64,
    ) -> Result<Deployed, DeploymentError> {
        let sender = self.sender().await?;

        let mut data = artifact.bytecode.to_vec();
        data.extend_from_slice(&DynSolValue::Tuple(args.to_vec()).abi_encode_params());

        let tx_hash: String = rpc::json_rpc_call(
            &self.client,
            self.url.as_str(),
            "eth_sendTransaction",
            vec![serde_json::json!({
                "from": sender,
                "data": format!("0x{}", hex::encode(&data)),
            })],
        )
        .await?;

        tracing::info!(artifact = %artifact.contract_name, tx_hash = %tx_hash, "Deployment transaction sent");

        let receipt = self.wait_for_receipt(&tx_hash).await?.ok_or_else(|| {
            DeploymentError::ConfirmationTimeout {
                tx_hash: tx_hash.clone(),
                confirmations,
            }
        })?;

        if receipt.status.as_deref() == Some("0x0") {
            return Err(DeploymentError::Rejected {
                artifact: artifact.contract_name.clone(),
                tx_hash,
            });
        }

        let address = receipt.contract_address.ok_or_else(|| {
            DeploymentError::Rpc(RpcError::BadResponse {
                method: "eth_getTransactionReceipt".to_string(),
                reason: "receipt has no contract address".to_string(),
            })
        })?;

        if confirmations > 1 {
            let inclusion_block =
                rpc::parse_hex_quantity("eth_getTransactionReceipt", &receipt.block_number)?;
            let confirmed = self.wait_for_depth(inclusion_block, confirmations).await?;
            if !confirmed {
                return Err(DeploymentError::ConfirmationTimeout {
                    tx_hash,
                    confirmations,
                });
            }
        }

        Ok(Deployed { address, tx_hash })
    }
}

/// Render a constructor argument for logs and deployment records.
pub fn display_arg(arg: &DynSolValue) -> String {
    match arg {
        DynSolValue::Address(a) => a.to_string(),
        DynSolValue::Uint(v, _) => v.to_string(),
        DynSolValue::Int(v, _) => v.to_string(),
        DynSolValue::Bool(b) => b.to_string(),
        DynSolValue::String(s) => s.clone(),
        DynSolValue::Bytes(b) => format!("0x{}", hex::encode(b)),
        other => format!("{other:?}"),
    }
}

/// ABI-encode constructor arguments the way verification services expect
/// them: the raw parameter encoding, hex, without a 0x prefix.
pub fn encode_constructor_args(args: &[DynSolValue]) -> String {
    hex::encode(DynSolValue::Tuple(args.to_vec()).abi_encode_params())
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_core::primitives::{I256, U256, address};

    #[test]
    fn test_artifact_parses_hardhat_style_json() {
        let raw = serde_json::json!({
            "contractName": "FundMe",
            "abi": [],
            "bytecode": "0x6080",
        });

        let artifact: Artifact = serde_json::from_value(raw).unwrap();
        assert_eq!(artifact.contract_name, "FundMe");
        assert_eq!(artifact.bytecode.to_vec(), vec![0x60, 0x80]);
        assert!(artifact.source.is_none());
    }

    #[test]
    fn test_display_arg_forms() {
        let feed = address!("694AA1769357215DE4FAC081bf1f309aDC325306");
        assert_eq!(
            display_arg(&DynSolValue::Address(feed)),
            feed.to_string()
        );
        assert_eq!(display_arg(&DynSolValue::Uint(U256::from(8u8), 8)), "8");
        assert_eq!(
            display_arg(&DynSolValue::Int(I256::try_from(-5i64).unwrap(), 256)),
            "-5"
        );
    }

    #[test]
    fn test_encode_constructor_args_is_padded_params_encoding() {
        let feed = address!("694AA1769357215DE4FAC081bf1f309aDC325306");
        let encoded = encode_constructor_args(&[DynSolValue::Address(feed)]);

        // One static parameter encodes to exactly one 32-byte word.
        assert_eq!(encoded.len(), 64);
        assert!(encoded.ends_with("694aa1769357215de4fac081bf1f309adc325306"));
        assert!(!encoded.starts_with("0x"));
    }
}
