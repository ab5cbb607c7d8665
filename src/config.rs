// Client and relay configuration, read from the environment

use crate::error::ClientError;
use std::env;
use std::time::Duration;
use tracing::{info, warn};

pub const API_URL_VAR: &str = "MARKETPLACE_API_URL";
pub const API_TOKEN_VAR: &str = "MARKETPLACE_API_TOKEN";
pub const API_TIMEOUT_VAR: &str = "MARKETPLACE_API_TIMEOUT_MS";
pub const RELAY_PORT_VAR: &str = "WEBHOOK_RELAY_PORT";

const DEFAULT_API_URL: &str = "http://localhost:8000/api";
const DEFAULT_TIMEOUT_MS: u64 = 30_000;
const DEFAULT_RELAY_PORT: u16 = 3001;

// Backend endpoint every inbound webhook is forwarded to
pub const WEBHOOK_FORWARD_PATH: &str = "payments/webhook";

// Where the client runs: a browser reads the token from client storage on
// every request, a server uses the token handed in by the environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionContext {
    Browser,
    Server,
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub api_token: Option<String>,
    pub timeout_ms: u64,
    pub context: ExecutionContext,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            api_token: None,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            context: ExecutionContext::Browser,
        }
    }
}

impl ClientConfig {
    pub fn from_env(context: ExecutionContext) -> Result<Self, ClientError> {
        let base_url = env::var(API_URL_VAR).unwrap_or_else(|_| {
            warn!("{API_URL_VAR} not set, using default: {DEFAULT_API_URL}");
            DEFAULT_API_URL.to_string()
        });

        let api_token = match context {
            ExecutionContext::Server => env::var(API_TOKEN_VAR).ok().filter(|t| !t.is_empty()),
            ExecutionContext::Browser => None,
        };

        let timeout_ms = match env::var(API_TIMEOUT_VAR) {
            Ok(raw) => raw.parse().map_err(|e| {
                ClientError::ConfigError(format!("invalid {API_TIMEOUT_VAR} value {raw:?}: {e}"))
            })?,
            Err(_) => DEFAULT_TIMEOUT_MS,
        };

        let config = Self {
            base_url,
            api_token,
            timeout_ms,
            context,
        };
        config.validate()?;
        info!(base_url = %config.base_url, context = ?config.context, "loaded client configuration");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ClientError> {
        if self.base_url.trim().is_empty() {
            return Err(ClientError::ConfigError("base_url cannot be empty".to_string()));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ClientError::ConfigError(format!(
                "base_url must start with http:// or https://, got {}",
                self.base_url
            )));
        }
        if self.timeout_ms == 0 {
            return Err(ClientError::ConfigError("timeout_ms must be positive".to_string()));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

// Settings for the webhook relay binary
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub port: u16,
    pub forward_path: String,
    pub api: ClientConfig,
}

impl RelayConfig {
    pub fn from_env() -> Result<Self, ClientError> {
        let port = match env::var(RELAY_PORT_VAR) {
            Ok(raw) => raw.parse().map_err(|e| {
                ClientError::ConfigError(format!("invalid {RELAY_PORT_VAR} value {raw:?}: {e}"))
            })?,
            Err(_) => {
                info!("{RELAY_PORT_VAR} not set, using default: {DEFAULT_RELAY_PORT}");
                DEFAULT_RELAY_PORT
            }
        };

        Ok(Self {
            port,
            forward_path: WEBHOOK_FORWARD_PATH.to_string(),
            api: ClientConfig::from_env(ExecutionContext::Server)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ClientConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.context, ExecutionContext::Browser);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let empty = ClientConfig {
            base_url: "  ".to_string(),
            ..ClientConfig::default()
        };
        assert!(matches!(empty.validate(), Err(ClientError::ConfigError(_))));

        let no_scheme = ClientConfig {
            base_url: "api.example.com".to_string(),
            ..ClientConfig::default()
        };
        assert!(no_scheme.validate().is_err());

        let zero_timeout = ClientConfig {
            timeout_ms: 0,
            ..ClientConfig::default()
        };
        assert!(zero_timeout.validate().is_err());
    }
}
