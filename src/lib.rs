// Client core for the hospitality marketplace: HTTP adapter, resource
// services, cached data hooks, forms and the payment webhook relay

pub mod badge;
pub mod config;
pub mod envelope;
pub mod error;
pub mod forms;
pub mod hooks;
pub mod http;
pub mod models;
pub mod multipart;
pub mod notify;
pub mod query;
pub mod services;
pub mod session;
pub mod webhook;

#[cfg(test)]
mod mock_transport;

// Re-export key types for convenience
pub use badge::{Badge, StatusBadge, Tone};
pub use config::{ClientConfig, ExecutionContext, RelayConfig};
pub use envelope::{Envelope, PageLinks, PageMeta, Paginated};
pub use error::{ApiError, ApiResult, ClientError, ErrorKind, FieldErrors};
pub use forms::{submit, Form, FormState};
pub use hooks::{Hooks, Navigator, RechargeRedirect, ResourceHooks, WalletHooks};
pub use http::{HttpClient, HttpMethod, ReqwestTransport, Transport};
pub use multipart::{MultipartForm, UploadFile};
pub use notify::{Notification, Notifier, RecordingNotifier, TracingNotifier};
pub use query::{QueryClient, QueryConfig, QueryKey, QueryStatsReport};
pub use services::{ListParams, Resource, ResourceService, Services};
pub use session::{MemoryTokenStore, Session, TokenStore};
