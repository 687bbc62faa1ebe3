//! RPC client - proxies gateway read endpoints to a remote NEAR node

use serde_json::Value;

use crate::{RpcRequest, RpcResponse};

/// Failures of a single best-effort query round-trip.
///
/// The gateway performs no retries and sets no timeout; a failure here is
/// surfaced to the HTTP layer as an upstream error rather than crashing the
/// request handler.
#[derive(Debug, thiserror::Error)]
pub enum NearRpcError {
    #[error("RPC transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("RPC node returned a non-JSON-RPC body")]
    InvalidResponse(#[source] reqwest::Error),

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("RPC response carried neither result nor error")]
    MissingResult,

    #[error("failed to encode query arguments: {0}")]
    Encode(#[from] serde_json::Error),
}

/// RPC client for querying the devhub contract on a remote node
pub struct NearRpcClient {
    endpoint: String,
    account_id: String,
    client: reqwest::Client,
}

impl NearRpcClient {
    /// Create new RPC client targeting one fixed endpoint and contract
    pub fn new(endpoint: impl Into<String>, account_id: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            account_id: account_id.into(),
            client: reqwest::Client::new(),
        }
    }

    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    /// Call a view method and return the raw contract result unchanged.
    ///
    /// The returned value is whatever the node put in `result.result`,
    /// typically a byte array; callers decode it separately.
    pub async fn call_function(
        &self,
        method_name: &str,
        args: &Value,
    ) -> Result<Value, NearRpcError> {
        let request = RpcRequest::call_function(&self.account_id, method_name, args)?;

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await?;

        let response: RpcResponse = response
            .json()
            .await
            .map_err(NearRpcError::InvalidResponse)?;

        if let Some(error) = response.error {
            return Err(NearRpcError::Rpc {
                code: error.code,
                message: error.message,
            });
        }

        response
            .result
            .map(|call| call.result)
            .ok_or(NearRpcError::MissingResult)
    }
}
