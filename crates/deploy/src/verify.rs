//! Best-effort source verification of deployed contracts.
//!
//! Deployment is authoritative; verification is advisory. A submission is
//! attempted exactly once and its result is classified into a
//! [`VerificationOutcome`]: the service reporting the contract as already
//! verified is recovered as success, any other failure is reported but never
//! aborts the pipeline.

use std::future::Future;

use alloy_core::primitives::Address;
use url::Url;

/// Classified result of one verification attempt. Logged, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationOutcome {
    /// The service accepted the submission.
    Verified,
    /// The service already knows this contract; treated as success.
    AlreadyVerified,
    /// Anything else; the deployment still stands.
    Failed(String),
}

/// Errors while submitting a verification request.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("verification request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service rejected the submission; carries its response text.
    #[error("{0}")]
    Api(String),
}

/// Classify the result of a verification submission.
///
/// The "already verified" detection is a case-insensitive substring match on
/// the error text, which is as much as Etherscan-style APIs expose; a
/// structured error code would be preferable where available.
pub fn classify_submission(result: Result<(), SubmitError>) -> VerificationOutcome {
    match result {
        Ok(()) => VerificationOutcome::Verified,
        Err(e) => {
            let message = e.to_string();
            if message.to_lowercase().contains("already verified") {
                VerificationOutcome::AlreadyVerified
            } else {
                VerificationOutcome::Failed(message)
            }
        }
    }
}

/// Everything a verification service needs about one deployed contract.
#[derive(Debug, Clone)]
pub struct VerificationRequest {
    pub address: Address,
    /// Fully qualified contract name, e.g. "contracts/FundMe.sol:FundMe".
    pub contract_name: String,
    /// Flattened source code.
    pub source: Option<String>,
    /// Full solc version string, e.g. "v0.8.8+commit.dddeac2f".
    pub compiler_version: Option<String>,
    /// ABI-encoded constructor arguments, hex without 0x prefix.
    pub constructor_args: String,
}

/// Narrow interface to the external verification API.
pub trait VerificationApi {
    fn submit(
        &self,
        request: &VerificationRequest,
    ) -> impl Future<Output = Result<(), SubmitError>> + Send;
}

/// Default endpoint: the Etherscan v2 multichain API.
pub const DEFAULT_VERIFIER_URL: &str = "https://api.etherscan.io/v2/api";

/// [`VerificationApi`] implementation for Etherscan-compatible explorers.
#[derive(Debug, Clone)]
pub struct EtherscanClient {
    client: reqwest::Client,
    url: Url,
    api_key: String,
    chain_id: u64,
}

impl EtherscanClient {
    pub fn new(url: Url, api_key: String, chain_id: u64) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: crate::rpc::create_client()?,
            url,
            api_key,
            chain_id,
        })
    }
}

#[derive(Debug, serde::Deserialize)]
struct EtherscanResponse {
    status: String,
    result: String,
}

impl VerificationApi for EtherscanClient {
    async fn submit(&self, request: &VerificationRequest) -> Result<(), SubmitError> {
        let source = request
            .source
            .as_deref()
            .ok_or_else(|| SubmitError::Api("artifact has no flattened source to submit".to_string()))?;
        let compiler_version = request.compiler_version.as_deref().ok_or_else(|| {
            SubmitError::Api("artifact does not record its compiler version".to_string())
        })?;

        tracing::info!(address = %request.address, contract = %request.contract_name, "Verifying contract...");

        let form = [
            ("chainid", self.chain_id.to_string()),
            ("apikey", self.api_key.clone()),
            ("module", "contract".to_string()),
            ("action", "verifysourcecode".to_string()),
            ("contractaddress", request.address.to_string()),
            ("sourceCode", source.to_string()),
            ("codeformat", "solidity-single-file".to_string()),
            ("contractname", request.contract_name.clone()),
            ("compilerversion", compiler_version.to_string()),
            // Etherscan's historical misspelling of the field name.
            ("constructorArguements", request.constructor_args.clone()),
        ];

        let response: EtherscanResponse = self
            .client
            .post(self.url.clone())
            .form(&form)
            .send()
            .await?
            .json()
            .await?;

        if response.status != "1" {
            return Err(SubmitError::Api(response.result));
        }

        tracing::debug!(guid = %response.result, "Verification submission accepted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_classifies_as_verified() {
        assert_eq!(classify_submission(Ok(())), VerificationOutcome::Verified);
    }

    #[test]
    fn test_already_verified_is_recovered_regardless_of_case() {
        for message in [
            "Contract source code already verified",
            "ALREADY VERIFIED",
            "Already Verified!",
            "smart-contract already verified.",
        ] {
            let outcome = classify_submission(Err(SubmitError::Api(message.to_string())));
            assert_eq!(
                outcome,
                VerificationOutcome::AlreadyVerified,
                "{message:?} should classify as AlreadyVerified"
            );
        }
    }

    #[test]
    fn test_other_errors_classify_as_failed_with_reason() {
        let outcome =
            classify_submission(Err(SubmitError::Api("Invalid API Key".to_string())));
        assert_eq!(
            outcome,
            VerificationOutcome::Failed("Invalid API Key".to_string())
        );
    }
}
