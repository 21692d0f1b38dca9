//! Fetch strategies.
//!
//! Each executor resolves to a response for every outcome of the network and
//! the cache. Cache storage failures are treated as misses (reads) or logged
//! (writes); only `OnNetworkFailure::Refetch` can surface a `FetchError`.

use tracing::{debug, warn};

use super::error::FetchError;
use super::network::Network;
use super::request::{Request, Response};
use super::storage::CacheStorage;

/// What a cache-first strategy does when the network fetch fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnNetworkFailure {
    /// Answer with an empty 404.
    NotFound,
    /// Try the network once more and hand back whatever that yields.
    Refetch,
}

async fn lookup(storage: &dyn CacheStorage, namespace: &str, request: &Request) -> Option<Response> {
    let key = request.key();
    if let Err(e) = storage.open_namespace(namespace).await {
        warn!(namespace, error = %e, "Failed to open cache namespace");
        return None;
    }
    match storage.match_entry(namespace, &key).await {
        Ok(hit) => hit,
        Err(e) => {
            warn!(namespace, key = %key, error = %e, "Cache read failed, treating as miss");
            None
        }
    }
}

/// Store a copy of a successful response. Non-OK responses are never stored.
async fn store(storage: &dyn CacheStorage, namespace: &str, request: &Request, response: &Response) {
    if !response.is_ok() {
        return;
    }
    let key = request.key();
    match storage.put(namespace, &key, response.clone()).await {
        Ok(()) => debug!(namespace, key = %key, "Cached response"),
        Err(e) => warn!(namespace, key = %key, error = %e, "Failed to cache response"),
    }
}

/// Serve from cache when present, otherwise fetch and populate.
pub async fn cache_first(
    storage: &dyn CacheStorage,
    network: &dyn Network,
    namespace: &str,
    request: &Request,
    on_failure: OnNetworkFailure,
) -> Result<Response, FetchError> {
    if let Some(cached) = lookup(storage, namespace, request).await {
        debug!(namespace, url = %request.url, "Cache hit");
        return Ok(cached);
    }

    match network.fetch(request).await {
        Ok(response) => {
            store(storage, namespace, request, &response).await;
            Ok(response)
        }
        Err(e) => {
            debug!(url = %request.url, error = %e, ?on_failure, "Network failed on cache miss");
            match on_failure {
                OnNetworkFailure::NotFound => Ok(Response::synthetic(404, "Not Found", "")),
                OnNetworkFailure::Refetch => network.fetch(request).await,
            }
        }
    }
}

/// Prefer the live network; fall back to the cached copy, then to a 503.
pub async fn network_first(
    storage: &dyn CacheStorage,
    network: &dyn Network,
    namespace: &str,
    request: &Request,
) -> Response {
    match network.fetch(request).await {
        Ok(response) => {
            store(storage, namespace, request, &response).await;
            response
        }
        Err(e) => {
            debug!(url = %request.url, error = %e, "Network failed, trying cache");
            match lookup(storage, namespace, request).await {
                Some(cached) => cached,
                None => Response::synthetic(503, "Service Unavailable", "Offline"),
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted network fake shared by the offline tests.

    use std::collections::{HashMap, VecDeque};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;

    /// Per-URL queue of outcomes. Once a queue has a single outcome left it
    /// repeats; URLs with no script fail as offline.
    #[derive(Default)]
    pub struct FakeNetwork {
        script: Mutex<HashMap<String, VecDeque<Result<Response, FetchError>>>>,
        calls: AtomicUsize,
    }

    impl FakeNetwork {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn respond(self, url: &str, outcome: Result<Response, FetchError>) -> Self {
            self.script
                .lock()
                .unwrap()
                .entry(url.to_string())
                .or_default()
                .push_back(outcome);
            self
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Network for FakeNetwork {
        async fn fetch(&self, request: &Request) -> Result<Response, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut script = self.script.lock().unwrap();
            match script.get_mut(request.url.as_str()) {
                Some(queue) if queue.len() > 1 => queue.pop_front().unwrap(),
                Some(queue) => queue.front().cloned().unwrap(),
                None => Err(FetchError::Network("offline".to_string())),
            }
        }
    }

    pub fn offline() -> Result<Response, FetchError> {
        Err(FetchError::Network("offline".to_string()))
    }
}
