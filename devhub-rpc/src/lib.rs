//! JSON-RPC interface for read-only devhub contract queries
//! Wire types for the NEAR `query`/`call_function` protocol plus the client
//! that proxies gateway reads to a remote node.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Standard JSON-RPC request carrying a `call_function` query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub id: String,
    pub method: String,
    pub params: CallFunctionParams,
}

/// Parameters of a `call_function` state query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallFunctionParams {
    pub request_type: String,
    pub finality: String,
    pub account_id: String,
    pub method_name: String,
    pub args_base64: String,
}

/// Standard JSON-RPC response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcResponse {
    pub jsonrpc: String,
    #[serde(default)]
    pub id: Option<Value>,
    pub result: Option<CallResult>,
    pub error: Option<RpcErrorObject>,
}

/// Result of a `call_function` query.
///
/// `result` is the raw contract return value: a byte array for methods that
/// return serialized data, or an already-scalar value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallResult {
    pub result: Value,
    #[serde(default)]
    pub logs: Vec<String>,
    #[serde(default)]
    pub block_height: Option<u64>,
    #[serde(default)]
    pub block_hash: Option<String>,
}

/// RPC error object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcErrorObject {
    pub code: i64,
    pub message: String,
    pub data: Option<Value>,
}

/// View methods of the devhub contract
pub mod methods {
    /// Get community details by handle
    pub const GET_COMMUNITY: &str = "get_community";

    /// Get proposal details by numeric id
    pub const GET_PROPOSAL: &str = "get_proposal";
}

impl RpcRequest {
    /// Build the fixed `call_function` envelope for a contract view call.
    ///
    /// `args` is serialized to JSON text and base64-encoded, exactly as the
    /// remote query protocol expects. Fails only if `args` cannot be
    /// serialized.
    pub fn call_function(
        account_id: &str,
        method_name: &str,
        args: &Value,
    ) -> serde_json::Result<Self> {
        let args_json = serde_json::to_vec(args)?;
        Ok(Self {
            jsonrpc: "2.0".to_string(),
            id: "dontcare".to_string(),
            method: "query".to_string(),
            params: CallFunctionParams {
                request_type: "call_function".to_string(),
                finality: "final".to_string(),
                account_id: account_id.to_string(),
                method_name: method_name.to_string(),
                args_base64: STANDARD.encode(args_json),
            },
        })
    }
}

pub mod client;
pub mod decode;

// Re-exports for convenience
pub use client::{NearRpcClient, NearRpcError};
pub use decode::decode_call_result;
