//! fundme is a CLI tool that deploys the FundMe contract pair to a
//! development or live network and verifies it where that makes sense.

mod cli;

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;

use cli::Cli;
use fundme_deploy::{
    ArtifactStore, CONFIG_FILENAME, DeployConfig, EthereumClient, EtherscanClient, FsRecordStore,
    NetworkDescriptor, Pipeline, PriceFeedResolver, StageSet, VerificationOutcome,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize the logger.
    tracing_subscriber::fmt()
        .with_max_level(cli.verbosity)
        .init();

    // Load the config file if one was given or Fundme.toml is present.
    let config = match &cli.config {
        Some(path) => DeployConfig::load_from_file(path)?,
        None if Path::new(CONFIG_FILENAME).exists() => {
            DeployConfig::load_from_file(Path::new(CONFIG_FILENAME))?
        }
        None => DeployConfig::default(),
    };

    let mut network = NetworkDescriptor::classify(&cli.network, cli.chain_id);
    if let Some(confirmations) = cli
        .confirmations
        .or_else(|| config.confirmations_for(&network.name))
    {
        network = network.with_confirmations(confirmations);
    }

    let mut chain = EthereumClient::new(cli.rpc_url.clone())
        .context("Failed to create the JSON-RPC client")?;
    if let Some(from) = cli.from {
        chain = chain.with_sender(from);
    }

    // No credential means the verification stage is skipped, not attempted.
    let verifier = cli
        .etherscan_api_key
        .clone()
        .map(|key| EtherscanClient::new(cli.verifier_url.clone(), key, cli.chain_id))
        .transpose()
        .context("Failed to create the verification client")?;

    let pipeline = Pipeline::new(
        chain,
        FsRecordStore::new(&cli.deployments),
        verifier,
        network,
        PriceFeedResolver::new(config.registry(), config.mock()),
        ArtifactStore::new(&cli.artifacts),
    );

    let report = pipeline.run(StageSet::from_tags(&cli.tags)).await?;

    tracing::info!("Deployment run complete");
    if let Some(mock) = &report.mock {
        tracing::info!("{}: {}", mock.artifact, mock.address);
    }
    if let Some(fund_me) = &report.fund_me {
        tracing::info!("{}: {}", fund_me.artifact, fund_me.address);
    }
    match &report.verification {
        Some(VerificationOutcome::Verified) => tracing::info!("Verification: submitted"),
        Some(VerificationOutcome::AlreadyVerified) => tracing::info!("Verification: already verified"),
        Some(VerificationOutcome::Failed(reason)) => {
            tracing::warn!("Verification: failed ({reason})");
        }
        None => tracing::info!("Verification: skipped"),
    }

    Ok(())
}
