//! Persisted deployment records and the record store.
//!
//! One record exists per (network, artifact) pair. On re-run the pipeline
//! looks the record up before deploying and reuses it if present, which is
//! what makes both mock and primary deployments idempotent. The store is
//! append/lookup only; concurrent runs against the same network are not
//! serialized and may race (known limitation).

use std::path::{Path, PathBuf};

use alloy_core::primitives::Address;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::StoreError;

/// The persisted result of one contract deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentRecord {
    /// The artifact name, e.g. "FundMe".
    pub artifact: String,
    /// The address the contract was deployed at.
    pub address: Address,
    /// Hash of the deployment transaction, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<String>,
    /// Constructor arguments, in order, in display form.
    pub constructor_args: Vec<String>,
    /// The contract ABI, kept so the record is usable without the artifact.
    pub abi: Value,
}

/// Lookup/insert interface over persisted deployment records.
///
/// The seam for idempotency: the deployer asks the store before submitting
/// anything, so tests can inject an in-memory store and assert at-most-once
/// deployment without a node.
pub trait RecordStore {
    /// Fetch the record for (network, artifact), if one exists.
    fn get(&self, network: &str, artifact: &str) -> Result<Option<DeploymentRecord>, StoreError>;

    /// Persist a record under (network, record.artifact).
    fn put(&self, network: &str, record: &DeploymentRecord) -> Result<(), StoreError>;
}

/// Record store backed by one JSON file per record, laid out as
/// `<root>/<network>/<Artifact>.json`.
#[derive(Debug, Clone)]
pub struct FsRecordStore {
    root: PathBuf,
}

impl FsRecordStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn record_path(&self, network: &str, artifact: &str) -> PathBuf {
        self.root.join(network).join(format!("{artifact}.json"))
    }
}

fn io_err(path: &Path, source: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.to_path_buf(),
        source,
    }
}

impl RecordStore for FsRecordStore {
    fn get(&self, network: &str, artifact: &str) -> Result<Option<DeploymentRecord>, StoreError> {
        let path = self.record_path(network, artifact);
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(io_err(&path, e)),
        };

        let record = serde_json::from_str(&content)
            .map_err(|source| StoreError::Malformed { path, source })?;
        Ok(Some(record))
    }

    fn put(&self, network: &str, record: &DeploymentRecord) -> Result<(), StoreError> {
        let path = self.record_path(network, &record.artifact);
        let dir = path.parent().expect("record path always has a parent");
        std::fs::create_dir_all(dir).map_err(|e| io_err(dir, e))?;

        let content = serde_json::to_string_pretty(record)
            .expect("deployment record serialization is infallible");
        std::fs::write(&path, content).map_err(|e| io_err(&path, e))?;

        tracing::debug!(path = %path.display(), artifact = %record.artifact, "Deployment record saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_core::primitives::address;
    use tempdir::TempDir;

    fn sample_record() -> DeploymentRecord {
        DeploymentRecord {
            artifact: "FundMe".to_string(),
            address: address!("00000000000000000000000000000000000000aa"),
            tx_hash: Some("0xdeadbeef".to_string()),
            constructor_args: vec!["0x694aa1769357215de4fac081bf1f309adc325306".to_string()],
            abi: serde_json::json!([]),
        }
    }

    #[test]
    fn test_get_missing_record_is_none() {
        let dir = TempDir::new("records").unwrap();
        let store = FsRecordStore::new(dir.path());

        assert_eq!(store.get("sepolia", "FundMe").unwrap(), None);
    }

    #[test]
    fn test_put_then_get_round_trips() {
        let dir = TempDir::new("records").unwrap();
        let store = FsRecordStore::new(dir.path());
        let record = sample_record();

        store.put("sepolia", &record).unwrap();
        let loaded = store.get("sepolia", "FundMe").unwrap();

        assert_eq!(loaded, Some(record));
    }

    #[test]
    fn test_records_are_scoped_by_network() {
        let dir = TempDir::new("records").unwrap();
        let store = FsRecordStore::new(dir.path());

        store.put("sepolia", &sample_record()).unwrap();
        assert_eq!(store.get("anvil", "FundMe").unwrap(), None);
    }

    #[test]
    fn test_malformed_record_is_an_error() {
        let dir = TempDir::new("records").unwrap();
        let store = FsRecordStore::new(dir.path());

        let network_dir = dir.path().join("sepolia");
        std::fs::create_dir_all(&network_dir).unwrap();
        std::fs::write(network_dir.join("FundMe.json"), "not json").unwrap();

        assert!(matches!(
            store.get("sepolia", "FundMe"),
            Err(StoreError::Malformed { .. })
        ));
    }
}
