// Inbound payment webhooks relayed to the backend

use crate::error::ApiError;
use crate::http::{HttpClient, HttpMethod, RequestBody};
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde_json::{json, Map, Value};
use thiserror::Error;
use tracing::{error, info, warn};

pub const SUCCESS_MESSAGE: &str = "Webhook traité avec succès";

// Headers worth passing on: content negotiation, origin and provider signatures
const FORWARDED_HEADERS: &[&str] = &[
    "content-type",
    "user-agent",
    "x-forwarded-for",
    "x-request-id",
    "x-signature",
    "x-webhook-signature",
    "stripe-signature",
    "x-callback-token",
];

#[derive(Clone)]
pub struct RelayState {
    pub http: HttpClient,
    pub forward_path: String,
}

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Invalid webhook payload: {0}")]
    InvalidPayload(String),

    // The backend could not be reached
    #[error(transparent)]
    Backend(#[from] ApiError),

    // The backend answered with a non-2xx status
    #[error("backend rejected webhook with status {status}")]
    Rejected { status: u16, body: Value },
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        match self {
            RelayError::InvalidPayload(reason) => failure(
                StatusCode::INTERNAL_SERVER_ERROR,
                Map::new(),
                &format!("Invalid webhook payload: {reason}"),
            ),
            RelayError::Backend(err) => {
                failure(StatusCode::INTERNAL_SERVER_ERROR, Map::new(), err.message())
            }
            RelayError::Rejected { status, body } => {
                // Same default text the client uses when the body carries no message
                let fallback = ApiError::from_response(status, &body);
                let fields = match body {
                    Value::Object(map) => map,
                    _ => Map::new(),
                };
                let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                failure(status, fields, fallback.message())
            }
        }
    }
}

// The backend's own body, marked as failed and guaranteed a message
fn failure(status: StatusCode, mut body: Map<String, Value>, message: &str) -> Response {
    body.insert("success".to_string(), Value::Bool(false));
    if !body.get("message").map_or(false, Value::is_string) {
        body.insert("message".to_string(), json!(message));
    }
    (status, Json(Value::Object(body))).into_response()
}

pub fn router(state: RelayState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/webhooks", post(relay_webhook))
        .route("/api/webhooks/:provider", post(relay_provider_webhook))
        .with_state(state)
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "webhook-relay",
        "timestamp": Utc::now().to_rfc3339()
    }))
}

async fn relay_webhook(
    State(state): State<RelayState>,
    headers: HeaderMap,
    uri: Uri,
    body: Bytes,
) -> Result<Json<Value>, RelayError> {
    relay(&state, None, &headers, &uri, &body).await
}

async fn relay_provider_webhook(
    State(state): State<RelayState>,
    Path(provider): Path<String>,
    headers: HeaderMap,
    uri: Uri,
    body: Bytes,
) -> Result<Json<Value>, RelayError> {
    relay(&state, Some(provider), &headers, &uri, &body).await
}

async fn relay(
    state: &RelayState,
    provider: Option<String>,
    headers: &HeaderMap,
    uri: &Uri,
    body: &[u8],
) -> Result<Json<Value>, RelayError> {
    let payload = build_payload(provider.as_deref(), headers, uri, body).map_err(|e| {
        warn!(error = %e, "rejected webhook payload");
        e
    })?;
    info!(provider = provider.as_deref().unwrap_or("default"), "relaying webhook");

    let response = state
        .http
        .send(
            HttpMethod::Post,
            &state.forward_path,
            Vec::new(),
            RequestBody::Json(payload),
        )
        .await
        .map_err(|e| {
            error!(error = %e, "webhook forwarding failed");
            RelayError::from(e)
        })?;

    if !response.is_success() {
        warn!(status = response.status, "backend rejected webhook");
        return Err(RelayError::Rejected {
            status: response.status,
            body: response.body,
        });
    }
    let data = response.body;

    Ok(Json(json!({
        "success": true,
        "message": SUCCESS_MESSAGE,
        "data": data,
    })))
}

// The received object, enriched with where and when it arrived. A payload
// that is not an object is kept under `payload`.
pub fn build_payload(
    provider: Option<&str>,
    headers: &HeaderMap,
    uri: &Uri,
    body: &[u8],
) -> Result<Value, RelayError> {
    let received: Value =
        serde_json::from_slice(body).map_err(|e| RelayError::InvalidPayload(e.to_string()))?;

    let mut payload = match received {
        Value::Object(map) => map,
        other => {
            let mut map = Map::new();
            map.insert("payload".to_string(), other);
            map
        }
    };

    payload.insert("received_at".to_string(), json!(Utc::now().to_rfc3339()));
    payload.insert("source_url".to_string(), json!(source_url(headers, uri)));
    payload.insert("headers".to_string(), Value::Object(selected_headers(headers)));
    if let Some(provider) = provider {
        payload.insert("provider".to_string(), json!(provider));
    }
    Ok(Value::Object(payload))
}

fn source_url(headers: &HeaderMap, uri: &Uri) -> String {
    let scheme = header_text(headers, "x-forwarded-proto").unwrap_or("http");
    let host = header_text(headers, header::HOST.as_str()).unwrap_or("localhost");
    let path = uri.path_and_query().map_or("/", |pq| pq.as_str());
    format!("{}://{}{}", scheme, host, path)
}

fn selected_headers(headers: &HeaderMap) -> Map<String, Value> {
    FORWARDED_HEADERS
        .iter()
        .filter_map(|name| header_text(headers, name).map(|value| (name.to_string(), json!(value))))
        .collect()
}

fn header_text<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}
