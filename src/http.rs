// HTTP client adapter: bearer injection, base URL, status → error mapping

use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult, ClientError};
use crate::multipart::MultipartForm;
use crate::session::Session;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

pub type QueryParams = Vec<(String, String)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        };
        f.write_str(name)
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(Value),
    Multipart(MultipartForm),
}

impl RequestBody {
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            RequestBody::Json(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_multipart(&self) -> Option<&MultipartForm> {
        match self {
            RequestBody::Multipart(form) => Some(form),
            _ => None,
        }
    }
}

// One outgoing call, path relative to the API base URL
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: HttpMethod,
    pub path: String,
    pub query: QueryParams,
    pub body: RequestBody,
    pub bearer: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

// Wire seam between the adapter and the network. Returning Err means no
// response was received; any HTTP status comes back as Ok.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    async fn send(&self, request: ApiRequest) -> ApiResult<ApiResponse>;
}

pub struct ReqwestTransport {
    inner: reqwest::Client,
    base_url: String,
}

impl ReqwestTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let inner = reqwest::Client::builder()
            .timeout(config.timeout())
            .default_headers(headers)
            .build()
            .map_err(|e| ClientError::InitError(e.to_string()))?;

        Ok(Self {
            inner,
            base_url: config.base_url.clone(),
        })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: ApiRequest) -> ApiResult<ApiResponse> {
        let url = join_url(&self.base_url, &request.path);
        let mut builder = self.inner.request(request.method.into(), &url);

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }
        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Multipart(form) => builder.multipart(form.into_reqwest()?),
        };

        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        };
        Ok(ApiResponse { status, body })
    }
}

pub fn join_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

fn normalize_path(path: &str) -> String {
    format!("/{}", path.trim_start_matches('/'))
}

// Shared by every service; cloning is cheap
#[derive(Clone)]
pub struct HttpClient {
    transport: Arc<dyn Transport>,
    session: Arc<Session>,
}

impl HttpClient {
    pub fn new(config: &ClientConfig, session: Arc<Session>) -> Result<Self, ClientError> {
        config.validate()?;
        let transport = ReqwestTransport::new(config)?;
        Ok(Self::with_transport(Arc::new(transport), session))
    }

    pub fn with_transport(transport: Arc<dyn Transport>, session: Arc<Session>) -> Self {
        Self { transport, session }
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    // Sends the request and hands back whatever status the backend answered.
    // Only a missing response is an error here.
    #[instrument(skip(self, query, body))]
    pub async fn send(
        &self,
        method: HttpMethod,
        path: &str,
        query: QueryParams,
        body: RequestBody,
    ) -> ApiResult<ApiResponse> {
        let request = ApiRequest {
            method,
            path: normalize_path(path),
            query,
            body,
            bearer: self.session.token(),
        };

        let response = self.transport.send(request).await.map_err(|e| {
            warn!(error = %e, "no response from backend");
            e
        })?;

        if response.status == 401 {
            self.session.mark_invalid();
            warn!("backend answered 401, session marked invalid");
        }
        Ok(response)
    }

    // JSON body on 2xx, the matching `ApiError` otherwise
    pub async fn execute(
        &self,
        method: HttpMethod,
        path: &str,
        query: QueryParams,
        body: RequestBody,
    ) -> ApiResult<Value> {
        let response = self.send(method, path, query, body).await?;
        if response.is_success() {
            debug!(status = response.status, "request succeeded");
            return Ok(response.body);
        }

        let error = ApiError::from_response(response.status, &response.body);
        debug!(status = response.status, error = %error, "request failed");
        Err(error)
    }

    pub async fn get(&self, path: &str, query: QueryParams) -> ApiResult<Value> {
        self.execute(HttpMethod::Get, path, query, RequestBody::Empty)
            .await
    }

    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ApiResult<Value> {
        let body = serde_json::to_value(body)?;
        self.execute(HttpMethod::Post, path, Vec::new(), RequestBody::Json(body))
            .await
    }

    pub async fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ApiResult<Value> {
        let body = serde_json::to_value(body)?;
        self.execute(HttpMethod::Put, path, Vec::new(), RequestBody::Json(body))
            .await
    }

    pub async fn patch<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ApiResult<Value> {
        let body = serde_json::to_value(body)?;
        self.execute(HttpMethod::Patch, path, Vec::new(), RequestBody::Json(body))
            .await
    }

    pub async fn delete(&self, path: &str) -> ApiResult<Value> {
        self.execute(HttpMethod::Delete, path, Vec::new(), RequestBody::Empty)
            .await
    }

    pub async fn post_multipart(&self, path: &str, form: MultipartForm) -> ApiResult<Value> {
        self.execute(HttpMethod::Post, path, Vec::new(), RequestBody::Multipart(form))
            .await
    }
}
