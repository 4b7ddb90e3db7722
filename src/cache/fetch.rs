//! Fetch coordinator: at most one in-flight fetch per key, plus the
//! freshness policy.
//!
//! Every fetch runs inside a [`Shared`] future registered in a per-key
//! in-flight map. Callers that request a key while its fetch is running
//! attach to the same future and resolve with the same result, so concurrent
//! queries for one key issue exactly one network call. A spawned driver task
//! polls the shared future to completion, so a fetch finishes and updates
//! the cache even when every interested caller has been dropped.
//!
//! Freshness follows stale-while-revalidate: a fresh cached value is
//! returned without fetching, a stale one is returned immediately while a
//! deduplicated revalidation runs in the background, and a cold key awaits
//! the fetch.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use futures_util::FutureExt;
use futures_util::future::{BoxFuture, Shared};
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::Result;
use crate::telemetry;

use super::key::QueryKey;
use super::store::{QueryCache, StaleTime};

type SharedFetch<V> = Shared<BoxFuture<'static, Result<V>>>;
type InFlightMap<V> = Mutex<HashMap<QueryKey, SharedFetch<V>>>;

/// Coordinates remote fetches against a shared [`QueryCache`].
pub struct FetchCoordinator<V> {
    store: Arc<QueryCache<V>>,
    in_flight: Arc<InFlightMap<V>>,
}

impl<V> FetchCoordinator<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// Create a coordinator over an existing store.
    pub fn new(store: Arc<QueryCache<V>>) -> Self {
        Self {
            store,
            in_flight: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// The underlying store.
    pub fn store(&self) -> &Arc<QueryCache<V>> {
        &self.store
    }

    /// Resolve `key` per the freshness policy, fetching with `fetch` when
    /// needed.
    ///
    /// A failed fetch leaves the cache untouched; every attached waiter
    /// receives the failure, and a previously cached (stale) value stays
    /// available for later reads.
    pub async fn query<F, Fut>(&self, key: QueryKey, stale_time: StaleTime, fetch: F) -> Result<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V>> + Send + 'static,
    {
        match self.store.freshness(&key, Instant::now()) {
            Some((value, true)) => {
                metrics::counter!(telemetry::CACHE_HITS_TOTAL, "freshness" => "fresh")
                    .increment(1);
                debug!(key = %key, "cache hit");
                Ok(value)
            }
            Some((value, false)) => {
                // Stale-while-revalidate: serve the stale value now, refresh
                // in the background.
                metrics::counter!(telemetry::CACHE_HITS_TOTAL, "freshness" => "stale")
                    .increment(1);
                debug!(key = %key, "stale cache hit, revalidating in background");
                let _ = self.attach_or_start(key, stale_time, fetch);
                Ok(value)
            }
            None => {
                metrics::counter!(telemetry::CACHE_MISSES_TOTAL).increment(1);
                self.attach_or_start(key, stale_time, fetch).await
            }
        }
    }

    /// Whether a fetch for `key` is currently in flight.
    pub fn is_in_flight(&self, key: &QueryKey) -> bool {
        self.in_flight
            .lock()
            .expect("in-flight map lock poisoned")
            .contains_key(key)
    }

    /// Attach to the in-flight fetch for `key`, or start (and register) one.
    fn attach_or_start<F, Fut>(&self, key: QueryKey, stale_time: StaleTime, fetch: F) -> SharedFetch<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V>> + Send + 'static,
    {
        let mut in_flight = self.in_flight.lock().expect("in-flight map lock poisoned");
        if let Some(existing) = in_flight.get(&key) {
            metrics::counter!(telemetry::FETCHES_COALESCED_TOTAL).increment(1);
            debug!(key = %key, "attaching to in-flight fetch");
            return existing.clone();
        }

        debug!(key = %key, "starting fetch");
        let store = Arc::clone(&self.store);
        let fetch_key = key.clone();
        let fut = fetch();
        let shared: SharedFetch<V> = async move {
            let result = fut.await;
            match &result {
                Ok(value) => {
                    metrics::counter!(telemetry::FETCHES_TOTAL, "status" => "ok").increment(1);
                    store.store_fetched(fetch_key, value.clone(), stale_time);
                }
                Err(err) => {
                    metrics::counter!(telemetry::FETCHES_TOTAL, "status" => "error").increment(1);
                    warn!(key = %fetch_key, error = %err, "fetch failed, cache left untouched");
                }
            }
            result
        }
        .boxed()
        .shared();

        // Register before spawning the driver so the completion path always
        // finds (and clears) the marker.
        in_flight.insert(key.clone(), shared.clone());
        drop(in_flight);

        // Driver task: polls the fetch to completion even if every caller is
        // dropped, then clears the in-flight marker.
        let driver = shared.clone();
        let map = Arc::clone(&self.in_flight);
        tokio::spawn(async move {
            let _ = driver.await;
            map.lock().expect("in-flight map lock poisoned").remove(&key);
        });

        shared
    }
}

impl<V> Clone for FetchCoordinator<V> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            in_flight: Arc::clone(&self.in_flight),
        }
    }
}
