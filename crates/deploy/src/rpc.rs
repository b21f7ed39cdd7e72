//! Shared JSON-RPC plumbing for talking to an Ethereum node.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;

/// Default timeout for a single RPC request.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Interval between polling attempts when waiting for a receipt or block.
pub(crate) const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Errors from the JSON-RPC transport.
#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    #[error("rpc request {method} failed: {source}")]
    Http {
        method: String,
        #[source]
        source: reqwest::Error,
    },

    /// The node answered with a JSON-RPC error object.
    #[error("rpc method {method} returned an error: {message}")]
    Api { method: String, message: String },

    #[error("rpc method {method} returned an unusable result: {reason}")]
    BadResponse { method: String, reason: String },
}

/// Create an HTTP client configured for JSON-RPC requests.
pub fn create_client() -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder().timeout(DEFAULT_TIMEOUT).build()
}

/// Make a JSON-RPC call and deserialize the result.
pub async fn json_rpc_call<T: DeserializeOwned>(
    client: &reqwest::Client,
    url: &str,
    method: &str,
    params: Vec<Value>,
) -> Result<T, RpcError> {
    let http = |source| RpcError::Http {
        method: method.to_string(),
        source,
    };

    let response = client
        .post(url)
        .json(&serde_json::json!({
            "jsonrpc": "2.0",
            "method": method,
            "params": params,
            "id": 1
        }))
        .send()
        .await
        .map_err(http)?;

    let result: Value = response.json().await.map_err(http)?;

    if let Some(error) = result.get("error") {
        return Err(RpcError::Api {
            method: method.to_string(),
            message: error
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or("unknown")
                .to_string(),
        });
    }

    let result_value = result
        .get("result")
        .ok_or_else(|| RpcError::BadResponse {
            method: method.to_string(),
            reason: "no result field".to_string(),
        })?
        .clone();

    serde_json::from_value(result_value).map_err(|e| RpcError::BadResponse {
        method: method.to_string(),
        reason: e.to_string(),
    })
}

/// Parse a quantity returned by the node (`"0x1a"`) into a u64.
pub(crate) fn parse_hex_quantity(method: &str, value: &str) -> Result<u64, RpcError> {
    u64::from_str_radix(value.trim_start_matches("0x"), 16).map_err(|e| RpcError::BadResponse {
        method: method.to_string(),
        reason: format!("bad hex quantity {value:?}: {e}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_quantity() {
        assert_eq!(parse_hex_quantity("eth_blockNumber", "0x0").unwrap(), 0);
        assert_eq!(parse_hex_quantity("eth_blockNumber", "0x1a").unwrap(), 26);
        assert!(parse_hex_quantity("eth_blockNumber", "nonsense").is_err());
    }
}
