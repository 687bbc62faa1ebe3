//! Devhub Gateway Server
//!
//! HTTP gateway for the devhub.near contract. Write endpoints translate
//! JSON requests into unsigned function-call action descriptors; view
//! endpoints proxy `call_function` queries to a NEAR JSON-RPC node and
//! decode the byte-array results. The gateway is stateless: it signs
//! nothing, stores nothing, and trusts the caller to submit the returned
//! action elsewhere.

use axum::{
    extract::{Query, State},
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::info;

mod error;
mod manifest;

use crate::error::ApiError;
use crate::manifest::PluginConfig;
use devhub_contract::schema::{self, MethodSchema};
use devhub_contract::{ActionBuilder, FunctionCallAction, GatewayConfig};
use devhub_rpc::{decode_call_result, methods, NearRpcClient};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub builder: Arc<ActionBuilder>,
    pub rpc: Arc<NearRpcClient>,
    /// Public base URL advertised in the plugin manifest
    pub base_url: Arc<String>,
}

impl AppState {
    pub fn new(config: &GatewayConfig, base_url: String) -> Self {
        Self {
            builder: Arc::new(ActionBuilder::new(config)),
            rpc: Arc::new(NearRpcClient::new(
                config.rpc_url.clone(),
                config.contract_id.clone(),
            )),
            base_url: Arc::new(base_url),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(8080);

    let config = GatewayConfig::default();
    let plugin = PluginConfig::load("bitte.dev.json");
    let state = AppState::new(&config, plugin.base_url(port));

    info!(
        "Devhub gateway targeting {} via {}",
        config.contract_id, config.rpc_url
    );

    let app = router(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    info!("Server is running on port {port}");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the application router
fn router(state: AppState) -> Router {
    Router::new()
        // Write endpoints: request -> unsigned function-call action
        .route("/api/add_member", post(add_member))
        .route("/api/add_proposal", post(add_proposal))
        .route("/api/add_rfp", post(add_rfp))
        .route("/api/cancel_rfp", post(cancel_rfp))
        .route("/api/create_community", post(create_community))
        .route("/api/edit_member", post(edit_member))
        .route("/api/edit_proposal", post(edit_proposal))
        // View endpoints: proxied contract queries
        .route("/api/get_community", get(get_community))
        .route("/api/get_proposal", get(get_proposal))
        // Liveness probe
        .route("/api/ping", get(ping))
        // Capability manifest for assistant tooling
        .route("/.well-known/ai-plugin.json", get(plugin_manifest))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Shared flow for every write endpoint: validate against the method's
/// schema, then build the descriptor. An absent or malformed body behaves
/// like an empty object, so it fails validation with the uniform 400.
fn build_action(
    state: &AppState,
    method_schema: &MethodSchema,
    body: Option<Json<Value>>,
) -> Result<Json<FunctionCallAction>, ApiError> {
    let body = body.map(|Json(value)| value).unwrap_or_else(|| json!({}));
    let args = method_schema.validate(&body)?;
    Ok(Json(state.builder.build(method_schema.method, args)))
}

async fn add_member(
    State(state): State<AppState>,
    body: Option<Json<Value>>,
) -> Result<Json<FunctionCallAction>, ApiError> {
    build_action(&state, &schema::ADD_MEMBER, body)
}

async fn add_proposal(
    State(state): State<AppState>,
    body: Option<Json<Value>>,
) -> Result<Json<FunctionCallAction>, ApiError> {
    build_action(&state, &schema::ADD_PROPOSAL, body)
}

async fn add_rfp(
    State(state): State<AppState>,
    body: Option<Json<Value>>,
) -> Result<Json<FunctionCallAction>, ApiError> {
    build_action(&state, &schema::ADD_RFP, body)
}

async fn cancel_rfp(
    State(state): State<AppState>,
    body: Option<Json<Value>>,
) -> Result<Json<FunctionCallAction>, ApiError> {
    build_action(&state, &schema::CANCEL_RFP, body)
}

async fn create_community(
    State(state): State<AppState>,
    body: Option<Json<Value>>,
) -> Result<Json<FunctionCallAction>, ApiError> {
    build_action(&state, &schema::CREATE_COMMUNITY, body)
}

async fn edit_member(
    State(state): State<AppState>,
    body: Option<Json<Value>>,
) -> Result<Json<FunctionCallAction>, ApiError> {
    build_action(&state, &schema::EDIT_MEMBER, body)
}

async fn edit_proposal(
    State(state): State<AppState>,
    body: Option<Json<Value>>,
) -> Result<Json<FunctionCallAction>, ApiError> {
    build_action(&state, &schema::EDIT_PROPOSAL, body)
}

#[derive(Debug, Deserialize)]
struct GetCommunityQuery {
    handle: Option<String>,
}

async fn get_community(
    State(state): State<AppState>,
    Query(query): Query<GetCommunityQuery>,
) -> Result<Json<Value>, ApiError> {
    let input = json!({ "handle": query.handle });
    let args = schema::GET_COMMUNITY.validate(&input)?;

    let raw = state
        .rpc
        .call_function(methods::GET_COMMUNITY, &Value::Object(args))
        .await?;

    Ok(Json(decode_call_result(raw)))
}

#[derive(Debug, Deserialize)]
struct GetProposalQuery {
    proposal_id: Option<String>,
}

async fn get_proposal(
    State(state): State<AppState>,
    Query(query): Query<GetProposalQuery>,
) -> Result<Json<Value>, ApiError> {
    // The query param arrives as text; the contract expects a number.
    let proposal_id: u64 = query
        .proposal_id
        .as_deref()
        .and_then(|raw| raw.parse().ok())
        .ok_or(devhub_contract::ContractError::InvalidInput)?;

    let input = json!({ "proposal_id": proposal_id });
    let args = schema::GET_PROPOSAL.validate(&input)?;

    let raw = state
        .rpc
        .call_function(methods::GET_PROPOSAL, &Value::Object(args))
        .await?;

    Ok(Json(decode_call_result(raw)))
}

async fn ping() -> Json<Value> {
    Json(json!({ "message": "pong" }))
}

async fn plugin_manifest(State(state): State<AppState>) -> Json<Value> {
    Json(manifest::openapi_document(&state.base_url))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    /// State whose RPC endpoint refuses connections immediately, so any
    /// unexpected upstream call shows up as a 502 instead of a 400.
    fn test_app() -> Router {
        let config = GatewayConfig {
            rpc_url: "http://127.0.0.1:1/".to_string(),
            ..GatewayConfig::default()
        };
        router(AppState::new(&config, "http://localhost:8080".to_string()))
    }

    async fn send_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn send_get(app: Router, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_add_member_echoes_exact_args() {
        let body = json!({
            "member": {"account": "alice.near"},
            "metadata": {"role": "moderator"},
        });
        let (status, response) = send_json(test_app(), "/api/add_member", body.clone()).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            response,
            json!({
                "type": "FunctionCall",
                "params": {
                    "methodName": "add_member",
                    "args": body,
                    "gas": "30000000000000",
                    "deposit": "1",
                }
            })
        );
    }

    #[tokio::test]
    async fn test_every_write_route_builds_its_method() {
        let cases: &[(&str, Value)] = &[
            (
                "add_proposal",
                json!({"body": {"t": 1}, "labels": ["a"], "accepted_terms_and_conditions_version": 1}),
            ),
            ("add_rfp", json!({"body": {"t": 1}, "labels": ["a"]})),
            (
                "cancel_rfp",
                json!({"id": 3, "proposals_to_cancel": [1], "proposals_to_unlink": []}),
            ),
            ("create_community", json!({"inputs": {"handle": "near"}})),
            ("edit_member", json!({"member": "m", "metadata": {}})),
            (
                "edit_proposal",
                json!({"id": 9, "body": {"t": 1}, "labels": ["a"]}),
            ),
        ];

        for (method, body) in cases {
            let (status, response) =
                send_json(test_app(), &format!("/api/{method}"), body.clone()).await;
            assert_eq!(status, StatusCode::OK, "{method} rejected valid input");
            assert_eq!(response["type"], "FunctionCall");
            assert_eq!(response["params"]["methodName"], *method);
            assert_eq!(response["params"]["args"], *body);
            assert_eq!(response["params"]["gas"], "30000000000000");
            assert_eq!(response["params"]["deposit"], "1");
        }
    }

    #[tokio::test]
    async fn test_missing_field_yields_400() {
        let (status, response) =
            send_json(test_app(), "/api/add_member", json!({"member": "m"})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response, json!({"error": "Invalid input"}));
    }

    #[tokio::test]
    async fn test_missing_terms_version_yields_400() {
        let (status, _) = send_json(
            test_app(),
            "/api/add_proposal",
            json!({"body": {"t": 1}, "labels": ["a"]}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_absent_body_yields_400_not_422() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/add_rfp")
            .body(Body::empty())
            .unwrap();
        let response = test_app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_cancel_rfp_accepts_id_zero() {
        let body = json!({
            "id": 0,
            "proposals_to_cancel": [],
            "proposals_to_unlink": [],
        });
        let (status, response) = send_json(test_app(), "/api/cancel_rfp", body).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(response["params"]["args"]["id"], 0);
    }

    #[tokio::test]
    async fn test_cancel_rfp_rejects_non_array() {
        let body = json!({
            "id": 1,
            "proposals_to_cancel": "nope",
            "proposals_to_unlink": [],
        });
        let (status, _) = send_json(test_app(), "/api/cancel_rfp", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_get_community_without_handle_yields_400() {
        let (status, response) = send_get(test_app(), "/api/get_community").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response, json!({"error": "Invalid input"}));
    }

    #[tokio::test]
    async fn test_get_proposal_rejects_non_numeric_id() {
        let (status, _) = send_get(test_app(), "/api/get_proposal?proposal_id=abc").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send_get(test_app(), "/api/get_proposal").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_view_route_maps_rpc_failure_to_502() {
        let (status, response) = send_get(test_app(), "/api/get_community?handle=near").await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(response, json!({"error": "Upstream RPC failure"}));
    }

    #[tokio::test]
    async fn test_ping() {
        let (status, response) = send_get(test_app(), "/api/ping").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(response, json!({"message": "pong"}));
    }

    #[tokio::test]
    async fn test_manifest_served() {
        let (status, response) = send_get(test_app(), "/.well-known/ai-plugin.json").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(response["openapi"], "3.0.0");
        assert_eq!(response["servers"][0]["url"], "http://localhost:8080");
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let request = Request::builder()
            .uri("/api/nonexistent")
            .body(Body::empty())
            .unwrap();
        let response = test_app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
