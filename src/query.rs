// Keyed query cache sitting between views and the resource services.
// Identical concurrent reads share one request; mutations invalidate by key prefix.

use crate::error::{ApiError, ApiResult};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use futures::future::{BoxFuture, FutureExt, Shared};
use std::any::Any;
use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

type CachedValue = Arc<dyn Any + Send + Sync>;
type SharedFetch = Shared<BoxFuture<'static, Result<CachedValue, ApiError>>>;

// Resource name first, then the parameters the result depends on
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    pub fn new(resource: impl Into<String>) -> Self {
        Self(vec![resource.into()])
    }

    pub fn with(mut self, part: impl ToString) -> Self {
        self.0.push(part.to_string());
        self
    }

    pub fn parts(&self) -> &[String] {
        &self.0
    }

    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(":"))
    }
}

#[derive(Debug, Clone)]
pub struct QueryConfig {
    // How long a fetched value is served without going back to the API
    pub stale_time: Duration,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            stale_time: Duration::from_secs(300),
        }
    }
}

#[derive(Debug, Default)]
pub struct QueryStats {
    pub hit_count: AtomicUsize,
    pub miss_count: AtomicUsize,
    pub shared_count: AtomicUsize,
    pub error_count: AtomicUsize,
    pub invalidation_count: AtomicUsize,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct QueryStatsReport {
    pub items_count: usize,
    pub in_flight_count: usize,
    pub hit_count: usize,
    pub miss_count: usize,
    pub shared_count: usize,
    pub error_count: usize,
    pub invalidation_count: usize,
}

struct CacheEntry {
    value: CachedValue,
    fetched_at: Instant,
    invalidated: bool,
}

impl CacheEntry {
    fn is_fresh(&self, stale_time: Duration) -> bool {
        !self.invalidated && self.fetched_at.elapsed() < stale_time
    }
}

struct Inner {
    entries: DashMap<QueryKey, CacheEntry>,
    in_flight: DashMap<QueryKey, (u64, SharedFetch)>,
    next_fetch_id: AtomicU64,
    config: QueryConfig,
    stats: QueryStats,
}

#[derive(Clone)]
pub struct QueryClient {
    inner: Arc<Inner>,
}

impl Default for QueryClient {
    fn default() -> Self {
        Self::new(QueryConfig::default())
    }
}

impl QueryClient {
    pub fn new(config: QueryConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                entries: DashMap::new(),
                in_flight: DashMap::new(),
                next_fetch_id: AtomicU64::new(0),
                config,
                stats: QueryStats::default(),
            }),
        }
    }

    // Serve a fresh cached value, join an identical in-flight request, or
    // start a new one. The fetcher is only invoked in the last case.
    pub async fn fetch<T, F, Fut>(&self, key: QueryKey, fetcher: F) -> ApiResult<Arc<T>>
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ApiResult<T>> + Send + 'static,
    {
        if let Some(value) = self.fresh_value(&key) {
            self.inner.stats.hit_count.fetch_add(1, Ordering::SeqCst);
            debug!(%key, "query cache hit");
            return downcast(&key, value);
        }

        let shared = match self.inner.in_flight.entry(key.clone()) {
            Entry::Occupied(existing) => {
                self.inner.stats.shared_count.fetch_add(1, Ordering::SeqCst);
                debug!(%key, "joining in-flight query");
                existing.get().1.clone()
            }
            Entry::Vacant(slot) => {
                // A request may have stored its entry and released the slot since the first look
                if let Some(value) = self.fresh_value(&key) {
                    drop(slot);
                    self.inner.stats.hit_count.fetch_add(1, Ordering::SeqCst);
                    return downcast(&key, value);
                }
                self.inner.stats.miss_count.fetch_add(1, Ordering::SeqCst);
                debug!(%key, "query cache miss, fetching");
                let fetch_id = self.inner.next_fetch_id.fetch_add(1, Ordering::SeqCst);
                let request = Self::run_fetch(Arc::clone(&self.inner), key.clone(), fetch_id, fetcher);
                slot.insert((fetch_id, request.clone()));
                request
            }
        };

        let value = shared.await?;
        downcast(&key, value)
    }

    fn run_fetch<T, F, Fut>(inner: Arc<Inner>, key: QueryKey, fetch_id: u64, fetcher: F) -> SharedFetch
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ApiResult<T>> + Send + 'static,
    {
        async move {
            let outcome = fetcher().await.map(|value| Arc::new(value) as CachedValue);

            match &outcome {
                Ok(value) => {
                    // The slot stays registered until the entry is stored, so a
                    // concurrent read finds one or the other. Holding it also
                    // keeps `invalidate` from detaching us between check and insert.
                    let slot = inner.in_flight.get(&key);
                    let still_current = slot.as_ref().map_or(false, |slot| slot.0 == fetch_id);
                    inner.entries.insert(
                        key.clone(),
                        CacheEntry {
                            value: Arc::clone(value),
                            fetched_at: Instant::now(),
                            // detached by an invalidation while the request was out
                            invalidated: !still_current,
                        },
                    );
                    drop(slot);
                }
                Err(e) => {
                    inner.stats.error_count.fetch_add(1, Ordering::SeqCst);
                    warn!(%key, error = %e, "query failed");
                }
            }
            inner.in_flight.remove_if(&key, |_, (id, _)| *id == fetch_id);
            outcome
        }
        .boxed()
        .shared()
    }

    fn fresh_value(&self, key: &QueryKey) -> Option<CachedValue> {
        let entry = self.inner.entries.get(key)?;
        if entry.is_fresh(self.inner.config.stale_time) {
            Some(Arc::clone(&entry.value))
        } else {
            None
        }
    }

    // Run a write. `on_success` runs once the call has resolved and before
    // the dependent keys are marked invalid.
    pub async fn mutate<T, Fut, S>(&self, call: Fut, on_success: S, invalidate: &[QueryKey]) -> ApiResult<T>
    where
        Fut: Future<Output = ApiResult<T>>,
        S: FnOnce(&T),
    {
        let value = call.await?;
        on_success(&value);
        for key in invalidate {
            self.invalidate(key);
        }
        Ok(value)
    }

    // Mark every entry under `prefix` stale; returns how many were marked
    pub fn invalidate(&self, prefix: &QueryKey) -> usize {
        // Detach in-flight requests first; one finishing meanwhile stores its
        // entry before releasing its slot, and the sweep below catches it
        self.inner.in_flight.retain(|key, _| !key.starts_with(prefix));

        let mut count = 0;
        for mut entry in self.inner.entries.iter_mut() {
            if entry.key().starts_with(prefix) && !entry.invalidated {
                entry.invalidated = true;
                count += 1;
            }
        }

        self.inner
            .stats
            .invalidation_count
            .fetch_add(count, Ordering::SeqCst);
        debug!(%prefix, count, "invalidated queries");
        count
    }

    // Drop every entry under `prefix`
    pub fn remove(&self, prefix: &QueryKey) -> usize {
        let before = self.inner.entries.len();
        self.inner.entries.retain(|key, _| !key.starts_with(prefix));
        before.saturating_sub(self.inner.entries.len())
    }

    pub fn clear(&self) {
        self.inner.entries.clear();
        self.inner.in_flight.clear();
    }

    pub fn get_query_data<T: Send + Sync + 'static>(&self, key: &QueryKey) -> Option<Arc<T>> {
        let value = Arc::clone(&self.inner.entries.get(key)?.value);
        value.downcast::<T>().ok()
    }

    pub fn set_query_data<T: Send + Sync + 'static>(&self, key: QueryKey, value: T) {
        self.inner.entries.insert(
            key,
            CacheEntry {
                value: Arc::new(value),
                fetched_at: Instant::now(),
                invalidated: false,
            },
        );
    }

    // None when nothing is cached under `key`
    pub fn is_stale(&self, key: &QueryKey) -> Option<bool> {
        self.inner
            .entries
            .get(key)
            .map(|entry| !entry.is_fresh(self.inner.config.stale_time))
    }

    pub fn stats(&self) -> QueryStatsReport {
        let stats = &self.inner.stats;
        QueryStatsReport {
            items_count: self.inner.entries.len(),
            in_flight_count: self.inner.in_flight.len(),
            hit_count: stats.hit_count.load(Ordering::SeqCst),
            miss_count: stats.miss_count.load(Ordering::SeqCst),
            shared_count: stats.shared_count.load(Ordering::SeqCst),
            error_count: stats.error_count.load(Ordering::SeqCst),
            invalidation_count: stats.invalidation_count.load(Ordering::SeqCst),
        }
    }
}

fn downcast<T: Send + Sync + 'static>(key: &QueryKey, value: CachedValue) -> ApiResult<Arc<T>> {
    value
        .downcast::<T>()
        .map_err(|_| ApiError::Other(format!("cached value for {key} has a different type")))
}
