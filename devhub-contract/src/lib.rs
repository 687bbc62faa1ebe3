//! Core types for talking to the devhub contract
//! Validation schemas and unsigned function-call action construction

use serde::{Deserialize, Serialize};

/// Error types for gateway request handling
#[derive(Debug, thiserror::Error, serde::Serialize)]
pub enum ContractError {
    /// Uniform validation failure. Deliberately carries no per-field
    /// diagnostics; the HTTP layer maps it to a generic 400 body.
    #[error("Invalid input")]
    InvalidInput,
}

pub type Result<T> = std::result::Result<T, ContractError>;

/// Fixed chain-side constants for the gateway.
///
/// Gas and deposit are decimal-string quantities attached to every
/// function-call action; they never vary per request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Account id of the contract every call targets
    pub contract_id: String,
    /// JSON-RPC endpoint queries are proxied to
    pub rpc_url: String,
    /// Gas budget attached to every action
    pub gas: String,
    /// Deposit attached to every action
    pub deposit: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            contract_id: "devhub.near".to_string(),
            rpc_url: "https://rpc.mainnet.near.org".to_string(),
            gas: "30000000000000".to_string(),
            deposit: "1".to_string(),
        }
    }
}

pub mod action;
pub mod schema;

// Re-exports for convenience
pub use action::{ActionBuilder, FunctionCallAction, FunctionCallParams};
pub use schema::{FieldCheck, FieldRule, MethodSchema};
