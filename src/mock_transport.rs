// In-process stand-in for the backend used by the unit tests

use crate::error::{ApiError, ApiResult};
use crate::http::{ApiRequest, ApiResponse, HttpClient, HttpMethod, Transport};
use crate::session::Session;
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub struct MockTransport {
    routes: Mutex<HashMap<(HttpMethod, String), ApiResponse>>,
    failures: Mutex<HashMap<(HttpMethod, String), ApiError>>,
    requests: Mutex<Vec<ApiRequest>>,
    call_count: AtomicUsize,
    delay_ms: AtomicU64,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            routes: Mutex::new(HashMap::new()),
            failures: Mutex::new(HashMap::new()),
            requests: Mutex::new(Vec::new()),
            call_count: AtomicUsize::new(0),
            delay_ms: AtomicU64::new(0),
        }
    }

    pub fn respond(&self, method: HttpMethod, path: &str, status: u16, body: Value) {
        self.routes
            .lock()
            .insert((method, path.to_string()), ApiResponse { status, body });
    }

    pub fn fail(&self, method: HttpMethod, path: &str, error: ApiError) {
        self.failures.lock().insert((method, path.to_string()), error);
    }

    pub fn set_delay(&self, delay_ms: u64) {
        self.delay_ms.store(delay_ms, Ordering::SeqCst);
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().clone()
    }

    pub fn last_request(&self) -> Option<ApiRequest> {
        self.requests.lock().last().cloned()
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    // Client authenticated with a fixed token, talking to this mock
    pub fn client(self: &Arc<Self>) -> HttpClient {
        HttpClient::with_transport(
            self.clone(),
            Arc::new(Session::server(Some("test-token".to_string()))),
        )
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: ApiRequest) -> ApiResult<ApiResponse> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        let key = (request.method, request.path.clone());
        self.requests.lock().push(request);

        let delay = self.delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }

        if let Some(error) = self.failures.lock().get(&key) {
            return Err(error.clone());
        }

        let response = self.routes.lock().get(&key).cloned();
        Ok(response.unwrap_or_else(|| ApiResponse {
            status: 404,
            body: json!({"message": format!("No route for {} {}", key.0, key.1)}),
        }))
    }
}
