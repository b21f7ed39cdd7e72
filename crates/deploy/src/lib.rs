//! fundme-deploy - Deployment orchestration for the FundMe contract pair.
//!
//! This crate decides, per target network, whether a mock price feed must be
//! deployed, resolves the price feed address the FundMe contract is
//! constructed with, deploys it idempotently against a persisted record
//! store, and optionally submits the result for source verification.

mod chain;
pub use chain::{
    Artifact, ArtifactStore, ChainClient, Deployed, EthereumClient, display_arg,
    encode_constructor_args,
};

mod config;
pub use config::{CONFIG_FILENAME, DeployConfig, MockSettings, NetworkSettings};

mod deployer;
pub use deployer::deploy_once;

mod error;
pub use error::{ConfigError, DeploymentError, PipelineError, StoreError};

mod mocks;
pub use mocks::{DECIMALS, INITIAL_ANSWER, MOCK_AGGREGATOR, MockAggregator};

mod network;
pub use network::{DEV_CHAIN_NAMES, NetworkDescriptor};

mod pipeline;
pub use pipeline::{FUND_ME, Pipeline, PipelineReport, StageSet, Tag, should_verify};

mod record;
pub use record::{DeploymentRecord, FsRecordStore, RecordStore};

mod registry;
pub use registry::PriceFeedRegistry;

mod resolver;
pub use resolver::PriceFeedResolver;

pub mod rpc;
pub use rpc::RpcError;

mod verify;
pub use verify::{
    DEFAULT_VERIFIER_URL, EtherscanClient, SubmitError, VerificationApi, VerificationOutcome,
    VerificationRequest, classify_submission,
};
