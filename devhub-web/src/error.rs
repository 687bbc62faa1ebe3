//! HTTP error mapping for the gateway

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use devhub_contract::ContractError;
use devhub_rpc::NearRpcError;

/// Errors a request handler can surface.
///
/// Validation failures become a generic 400; upstream RPC failures become a
/// 502 instead of crashing the handler.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid input")]
    Invalid(#[from] ContractError),

    #[error("Upstream RPC failure")]
    Rpc(#[from] NearRpcError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Invalid(_) => (StatusCode::BAD_REQUEST, "Invalid input"),
            ApiError::Rpc(err) => {
                error!("upstream RPC call failed: {err}");
                (StatusCode::BAD_GATEWAY, "Upstream RPC failure")
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
