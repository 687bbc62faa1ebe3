//! Unsigned function-call action descriptors
//!
//! The gateway never signs or submits anything. It hands the caller a pure
//! data descriptor of the contract call; signing and submission happen in a
//! separate wallet step.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::GatewayConfig;

/// Parameters of a contract function call, wire-shaped for wallet tooling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionCallParams {
    pub method_name: String,
    pub args: Map<String, Value>,
    pub gas: String,
    pub deposit: String,
}

/// An unsigned function-call action descriptor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCallAction {
    /// Always `"FunctionCall"`
    #[serde(rename = "type")]
    pub action_type: String,
    pub params: FunctionCallParams,
}

/// Builds action descriptors with the gateway's fixed gas and deposit
#[derive(Debug, Clone)]
pub struct ActionBuilder {
    gas: String,
    deposit: String,
}

impl ActionBuilder {
    pub fn new(config: &GatewayConfig) -> Self {
        Self {
            gas: config.gas.clone(),
            deposit: config.deposit.clone(),
        }
    }

    /// Produce the descriptor for a validated call.
    ///
    /// Pure and infallible: the caller guarantees `args` is already
    /// validated, and the same input always yields a structurally identical
    /// descriptor.
    pub fn build(&self, method_name: &str, args: Map<String, Value>) -> FunctionCallAction {
        FunctionCallAction {
            action_type: "FunctionCall".to_string(),
            params: FunctionCallParams {
                method_name: method_name.to_string(),
                args,
                gas: self.gas.clone(),
                deposit: self.deposit.clone(),
            },
        }
    }
}
