//! Cache storage abstraction and the in-memory backend.
//!
//! Storage is a set of named namespaces, each mapping a `RequestKey` to a
//! response snapshot. Every call is atomic from the caller's point of view;
//! entries are only ever removed together with their whole namespace.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::error::CacheError;
use super::request::{RequestKey, Response};

#[async_trait]
pub trait CacheStorage: Send + Sync {
    /// Create the namespace if it does not exist yet.
    async fn open_namespace(&self, name: &str) -> Result<(), CacheError>;

    /// Look up an entry. A missing namespace is a miss, not an error.
    async fn match_entry(
        &self,
        namespace: &str,
        key: &RequestKey,
    ) -> Result<Option<Response>, CacheError>;

    /// Insert or replace an entry, creating the namespace if needed.
    async fn put(
        &self,
        namespace: &str,
        key: &RequestKey,
        response: Response,
    ) -> Result<(), CacheError>;

    async fn namespace_names(&self) -> Result<Vec<String>, CacheError>;

    /// Remove a namespace and all of its entries. Returns whether it existed.
    async fn delete_namespace(&self, name: &str) -> Result<bool, CacheError>;
}

/// Process-local storage, lost when dropped.
#[derive(Debug, Default)]
pub struct MemoryCacheStorage {
    namespaces: RwLock<HashMap<String, HashMap<RequestKey, Response>>>,
}

impl MemoryCacheStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries in a namespace (0 when it does not exist).
    pub async fn len(&self, namespace: &str) -> usize {
        self.namespaces
            .read()
            .await
            .get(namespace)
            .map(HashMap::len)
            .unwrap_or(0)
    }
}

#[async_trait]
impl CacheStorage for MemoryCacheStorage {
    async fn open_namespace(&self, name: &str) -> Result<(), CacheError> {
        self.namespaces
            .write()
            .await
            .entry(name.to_string())
            .or_default();
        Ok(())
    }

    async fn match_entry(
        &self,
        namespace: &str,
        key: &RequestKey,
    ) -> Result<Option<Response>, CacheError> {
        Ok(self
            .namespaces
            .read()
            .await
            .get(namespace)
            .and_then(|entries| entries.get(key))
            .cloned())
    }

    async fn put(
        &self,
        namespace: &str,
        key: &RequestKey,
        response: Response,
    ) -> Result<(), CacheError> {
        self.namespaces
            .write()
            .await
            .entry(namespace.to_string())
            .or_default()
            .insert(key.clone(), response);
        Ok(())
    }

    async fn namespace_names(&self) -> Result<Vec<String>, CacheError> {
        let mut names: Vec<String> = self.namespaces.read().await.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    async fn delete_namespace(&self, name: &str) -> Result<bool, CacheError> {
        Ok(self.namespaces.write().await.remove(name).is_some())
    }
}
