use std::path::PathBuf;

use alloy_core::primitives::Address;
use clap::Parser;
use fundme_deploy::{DEFAULT_VERIFIER_URL, Tag};
use tracing::level_filters::LevelFilter;
use url::Url;

#[derive(Parser)]
#[command(name = "fundme")]
#[command(
    author,
    version,
    about = "Deploy the FundMe contract pair across development and live networks"
)]
pub struct Cli {
    /// The verbosity level.
    #[arg(short, long, env = "FUNDME_VERBOSITY", default_value_t = LevelFilter::INFO)]
    pub verbosity: LevelFilter,

    /// The target network name.
    ///
    /// "anvil" and "localhost" are treated as development networks: a mock
    /// price feed is deployed there and verification is skipped.
    #[arg(short, long, env = "FUNDME_NETWORK", default_value = "anvil")]
    pub network: String,

    /// The chain id of the target network.
    #[arg(long, env = "FUNDME_CHAIN_ID", default_value_t = 31337)]
    pub chain_id: u64,

    /// The JSON-RPC endpoint of the target node.
    #[arg(long, alias = "rpc", env = "FUNDME_RPC_URL", default_value = "http://127.0.0.1:8545")]
    pub rpc_url: Url,

    /// The account to deploy from.
    ///
    /// If not provided, the node's first unlocked account is used.
    #[arg(long, env = "FUNDME_FROM")]
    pub from: Option<Address>,

    /// Deployment stages to run: all, mocks, fundme.
    #[arg(short, long, env = "FUNDME_TAGS", value_delimiter = ',', default_value = "all")]
    pub tags: Vec<Tag>,

    /// Confirmations to wait for after each deployment.
    ///
    /// Overrides the config file and the default of 1.
    #[arg(long, env = "FUNDME_CONFIRMATIONS")]
    pub confirmations: Option<u64>,

    /// The directory deployment records are persisted to.
    #[arg(long, env = "FUNDME_DEPLOYMENTS", default_value = "deployments")]
    pub deployments: PathBuf,

    /// The directory holding compiled contract artifacts (`<Name>.json`).
    #[arg(long, env = "FUNDME_ARTIFACTS", default_value = "artifacts")]
    pub artifacts: PathBuf,

    /// Path to an optional Fundme.toml configuration file.
    #[arg(long, alias = "conf", env = "FUNDME_CONFIG")]
    pub config: Option<PathBuf>,

    /// Etherscan-compatible API key.
    ///
    /// If not provided, the verification stage is skipped entirely.
    #[arg(long, env = "ETHERSCAN_API_KEY")]
    pub etherscan_api_key: Option<String>,

    /// The verification API endpoint.
    #[arg(long, env = "FUNDME_VERIFIER_URL", default_value = DEFAULT_VERIFIER_URL)]
    pub verifier_url: Url,
}
