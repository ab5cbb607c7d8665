// Authenticated session passed explicitly to the HTTP adapter

use crate::config::{ClientConfig, ExecutionContext};
use crate::models::User;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

// Client-storage key the bearer token lives under
pub const TOKEN_STORAGE_KEY: &str = "auth_token";

// Key/value client storage (browser local storage or an equivalent)
pub trait TokenStore: Send + Sync + 'static {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries.write().insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries.write().remove(key);
    }
}

enum TokenSource {
    Storage(Arc<dyn TokenStore>),
    Fixed(Option<String>),
}

pub struct Session {
    source: TokenSource,
    user: RwLock<Option<User>>,
    invalid: AtomicBool,
}

impl Session {
    // Browser variant: the token is looked up in storage on every request
    pub fn from_store(store: Arc<dyn TokenStore>) -> Self {
        let has_token = store.get(TOKEN_STORAGE_KEY).is_some();
        debug!(has_token, "session initialised from client storage");
        Self {
            source: TokenSource::Storage(store),
            user: RwLock::new(None),
            invalid: AtomicBool::new(false),
        }
    }

    // Server variant: the token comes from the environment
    pub fn server(token: Option<String>) -> Self {
        Self {
            source: TokenSource::Fixed(token),
            user: RwLock::new(None),
            invalid: AtomicBool::new(false),
        }
    }

    // Picks the token source from the configured context. A browser session
    // without a store of its own keeps the token in memory.
    pub fn for_config(config: &ClientConfig, store: Option<Arc<dyn TokenStore>>) -> Self {
        match config.context {
            ExecutionContext::Server => Self::server(config.api_token.clone()),
            ExecutionContext::Browser => {
                Self::from_store(store.unwrap_or_else(|| Arc::new(MemoryTokenStore::new())))
            }
        }
    }

    pub fn anonymous() -> Self {
        Self::server(None)
    }

    pub fn token(&self) -> Option<String> {
        match &self.source {
            TokenSource::Storage(store) => store.get(TOKEN_STORAGE_KEY),
            TokenSource::Fixed(token) => token.clone(),
        }
    }

    pub fn login(&self, token: &str, user: User) {
        if let TokenSource::Storage(store) = &self.source {
            store.set(TOKEN_STORAGE_KEY, token);
        }
        info!(user_id = user.id, "user logged in");
        *self.user.write() = Some(user);
        self.invalid.store(false, Ordering::SeqCst);
    }

    pub fn logout(&self) {
        if let TokenSource::Storage(store) = &self.source {
            store.remove(TOKEN_STORAGE_KEY);
        }
        *self.user.write() = None;
        info!("user logged out");
    }

    pub fn user(&self) -> Option<User> {
        self.user.read().clone()
    }

    pub fn set_user(&self, user: Option<User>) {
        *self.user.write() = user;
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some() && self.is_valid()
    }

    // Set after a 401; redirecting to login is up to the caller
    pub fn mark_invalid(&self) {
        self.invalid.store(true, Ordering::SeqCst);
    }

    pub fn is_valid(&self) -> bool {
        !self.invalid.load(Ordering::SeqCst)
    }
}
