//! The deployment pipeline: stage selection and orchestration.
//!
//! A run walks `Classified -> DependencyResolved -> Deployed -> one of
//! {Verified, AlreadyVerified, VerificationFailed, VerificationSkipped}`.
//! Nothing ever transitions backwards; a deployed contract is never rolled
//! back. Configuration and deployment failures abort the run, verification
//! failures do not.

use alloy_core::dyn_abi::DynSolValue;

use crate::chain::{ArtifactStore, ChainClient, encode_constructor_args};
use crate::deployer::deploy_once;
use crate::error::PipelineError;
use crate::mocks::MOCK_AGGREGATOR;
use crate::network::NetworkDescriptor;
use crate::record::{DeploymentRecord, RecordStore};
use crate::resolver::PriceFeedResolver;
use crate::verify::{
    VerificationApi, VerificationOutcome, VerificationRequest, classify_submission,
};

/// Artifact name of the primary contract.
pub const FUND_ME: &str = "FundMe";

/// Stage selector tags accepted by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Tag {
    /// Run every stage.
    All,
    /// Deploy mocks only.
    Mocks,
    /// Resolve the feed, deploy FundMe and verify.
    FundMe,
}

/// The set of pipeline stages a run will execute.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StageSet {
    pub mocks: bool,
    pub fund_me: bool,
}

impl StageSet {
    /// Expand a tag list into stages; `all` selects everything.
    pub fn from_tags(tags: &[Tag]) -> Self {
        let mut stages = Self::default();
        for tag in tags {
            match tag {
                Tag::All => {
                    stages.mocks = true;
                    stages.fund_me = true;
                }
                Tag::Mocks => stages.mocks = true,
                Tag::FundMe => stages.fund_me = true,
            }
        }
        stages
    }
}

/// Whether the verification stage should run at all.
///
/// Verification is attempted if and only if the network is live and a
/// credential is configured; otherwise the stage is skipped and the service
/// is never called.
pub fn should_verify(network: &NetworkDescriptor, has_credential: bool) -> bool {
    !network.is_development && has_credential
}

/// What a pipeline run produced.
#[derive(Debug, Default)]
pub struct PipelineReport {
    /// Mock deployment record, when the mocks stage ran on a dev network.
    pub mock: Option<DeploymentRecord>,
    /// FundMe deployment record, when that stage ran.
    pub fund_me: Option<DeploymentRecord>,
    /// Verification outcome; `None` means the stage was skipped.
    pub verification: Option<VerificationOutcome>,
}

/// Orchestrates one deployment run over injected collaborators.
pub struct Pipeline<C, S, V> {
    chain: C,
    store: S,
    /// `None` models an unconfigured verification credential.
    verifier: Option<V>,
    network: NetworkDescriptor,
    resolver: PriceFeedResolver,
    artifacts: ArtifactStore,
}

impl<C, S, V> Pipeline<C, S, V>
where
    C: ChainClient,
    S: RecordStore,
    V: VerificationApi,
{
    pub fn new(
        chain: C,
        store: S,
        verifier: Option<V>,
        network: NetworkDescriptor,
        resolver: PriceFeedResolver,
        artifacts: ArtifactStore,
    ) -> Self {
        Self {
            chain,
            store,
            verifier,
            network,
            resolver,
            artifacts,
        }
    }

    /// Execute the selected stages.
    ///
    /// Each stage's network interaction completes before the next stage
    /// starts; its output is a hard input of the next. A verification
    /// failure is reported in the result, never as an `Err`.
    pub async fn run(&self, stages: StageSet) -> Result<PipelineReport, PipelineError> {
        let mut report = PipelineReport::default();

        tracing::info!(
            network = %self.network.name,
            chain_id = self.network.chain_id,
            development = self.network.is_development,
            "Starting deployment run"
        );

        if stages.mocks {
            report.mock = self.run_mocks_stage().await?;
        }

        if stages.fund_me {
            let record = self.run_fund_me_stage(&mut report).await?;
            report.fund_me = Some(record);
        }

        Ok(report)
    }

    /// Deploy mocks on development networks; a no-op elsewhere.
    async fn run_mocks_stage(&self) -> Result<Option<DeploymentRecord>, PipelineError> {
        if !self.network.is_development {
            tracing::info!(network = %self.network.name, "Live network, nothing to mock");
            return Ok(None);
        }

        let artifact = self.artifacts.load(MOCK_AGGREGATOR)?;
        let record = self
            .resolver
            .mock
            .ensure(&self.chain, &self.store, &self.network, &artifact)
            .await?;
        Ok(Some(record))
    }

    /// Resolve the feed, deploy FundMe, then verify when applicable.
    async fn run_fund_me_stage(
        &self,
        report: &mut PipelineReport,
    ) -> Result<DeploymentRecord, PipelineError> {
        let feed = self
            .resolver
            .resolve(&self.chain, &self.store, &self.network, &self.artifacts)
            .await?;

        let artifact = self.artifacts.load(FUND_ME)?;
        let args = vec![DynSolValue::Address(feed)];
        let record = deploy_once(&self.chain, &self.store, &self.network, &artifact, &args).await?;

        match &self.verifier {
            Some(verifier) if should_verify(&self.network, true) => {
                let request = VerificationRequest {
                    address: record.address,
                    contract_name: artifact.contract_name.clone(),
                    source: artifact.source.clone(),
                    compiler_version: artifact.compiler_version.clone(),
                    constructor_args: encode_constructor_args(&args),
                };

                let outcome = classify_submission(verifier.submit(&request).await);
                match &outcome {
                    VerificationOutcome::Verified => {
                        tracing::info!(address = %record.address, "Contract verified");
                    }
                    VerificationOutcome::AlreadyVerified => {
                        tracing::info!(address = %record.address, "Already verified");
                    }
                    VerificationOutcome::Failed(reason) => {
                        tracing::warn!(address = %record.address, %reason, "Verification failed; deployment stands");
                    }
                }
                report.verification = Some(outcome);
            }
            _ => {
                let reason = if self.network.is_development {
                    "development network"
                } else {
                    "no verification credential configured"
                };
                tracing::info!(reason, "Skipping verification");
            }
        }

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_parse_from_cli_form() {
        assert_eq!("all".parse::<Tag>().unwrap(), Tag::All);
        assert_eq!("mocks".parse::<Tag>().unwrap(), Tag::Mocks);
        assert_eq!("fundme".parse::<Tag>().unwrap(), Tag::FundMe);
        assert!("everything".parse::<Tag>().is_err());
    }

    #[test]
    fn test_all_tag_expands_to_every_stage() {
        let stages = StageSet::from_tags(&[Tag::All]);
        assert!(stages.mocks);
        assert!(stages.fund_me);
    }

    #[test]
    fn test_single_tags_select_single_stages() {
        assert_eq!(
            StageSet::from_tags(&[Tag::Mocks]),
            StageSet { mocks: true, fund_me: false }
        );
        assert_eq!(
            StageSet::from_tags(&[Tag::FundMe]),
            StageSet { mocks: false, fund_me: true }
        );
    }

    #[test]
    fn test_should_verify_truth_table() {
        let dev = NetworkDescriptor::classify("anvil", 31337);
        let live = NetworkDescriptor::classify("sepolia", 11155111);

        assert!(should_verify(&live, true));
        assert!(!should_verify(&live, false));
        assert!(!should_verify(&dev, true));
        assert!(!should_verify(&dev, false));
    }
}
