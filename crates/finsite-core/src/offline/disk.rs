//! On-disk cache storage.
//!
//! Each namespace is a directory under the cache root; each entry is a JSON
//! file named after the SHA-256 of its request key. Entries record when they
//! were stored so their age can be shown, but age never causes eviction.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use super::error::CacheError;
use super::request::{RequestKey, Response};
use super::storage::CacheStorage;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedData<T> {
    pub data: T,
    pub cached_at: DateTime<Utc>,
}

impl<T> CachedData<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            cached_at: Utc::now(),
        }
    }

    pub fn age_minutes(&self) -> i64 {
        (Utc::now() - self.cached_at).num_minutes()
    }

    pub fn age_display(&self) -> String {
        let minutes = self.age_minutes();
        if minutes < 1 {
            // Also covers clock skew
            "just now".to_string()
        } else if minutes < 60 {
            format!("{}m ago", minutes)
        } else if minutes < 1440 {
            format!("{}h ago", minutes / 60)
        } else {
            format!("{}d ago", minutes / 1440)
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredEntry {
    key: RequestKey,
    response: Response,
}

/// Listing row for a stored entry.
#[derive(Debug, Clone)]
pub struct EntrySummary {
    pub key: RequestKey,
    pub status: u16,
    pub size: usize,
    pub age: String,
}

pub struct DiskCacheStorage {
    root: PathBuf,
    /// Suffix for temp files so concurrent writes of one key don't collide.
    tmp_counter: AtomicU64,
}

impl DiskCacheStorage {
    pub fn new(root: PathBuf) -> Result<Self, CacheError> {
        std::fs::create_dir_all(&root)?;
        Ok(Self {
            root,
            tmp_counter: AtomicU64::new(0),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn namespace_path(&self, name: &str) -> Result<PathBuf, CacheError> {
        let valid = !name.is_empty()
            && !name.starts_with('.')
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
        if !valid {
            return Err(CacheError::InvalidNamespace(name.to_string()));
        }
        Ok(self.root.join(name))
    }

    fn entry_path(&self, namespace: &str, key: &RequestKey) -> Result<PathBuf, CacheError> {
        let digest = Sha256::digest(key.as_str().as_bytes());
        Ok(self
            .namespace_path(namespace)?
            .join(format!("{}.json", hex::encode(digest))))
    }

    async fn read_entry(path: &Path) -> Result<Option<CachedData<StoredEntry>>, CacheError> {
        match tokio::fs::read_to_string(path).await {
            Ok(contents) => Ok(Some(serde_json::from_str(&contents)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// All entries of a namespace, sorted by key. Unreadable files are skipped.
    pub async fn list_entries(&self, namespace: &str) -> Result<Vec<EntrySummary>, CacheError> {
        let dir = self.namespace_path(namespace)?;
        let mut entries = Vec::new();
        let mut read_dir = match tokio::fs::read_dir(&dir).await {
            Ok(rd) => rd,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(entries),
            Err(e) => return Err(e.into()),
        };

        while let Some(item) = read_dir.next_entry().await? {
            let path = item.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match Self::read_entry(&path).await {
                Ok(Some(cached)) => entries.push(EntrySummary {
                    status: cached.data.response.status,
                    size: cached.data.response.body.len(),
                    age: cached.age_display(),
                    key: cached.data.key,
                }),
                Ok(None) => {}
                Err(e) => {
                    debug!(path = %path.display(), error = %e, "Skipping unreadable cache entry");
                }
            }
        }

        entries.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(entries)
    }
}

#[async_trait]
impl CacheStorage for DiskCacheStorage {
    async fn open_namespace(&self, name: &str) -> Result<(), CacheError> {
        tokio::fs::create_dir_all(self.namespace_path(name)?).await?;
        Ok(())
    }

    async fn match_entry(
        &self,
        namespace: &str,
        key: &RequestKey,
    ) -> Result<Option<Response>, CacheError> {
        let path = self.entry_path(namespace, key)?;
        match Self::read_entry(&path).await? {
            Some(cached) if &cached.data.key == key => Ok(Some(cached.data.response)),
            Some(cached) => {
                warn!(expected = %key, found = %cached.data.key, "Cache entry key mismatch");
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn put(
        &self,
        namespace: &str,
        key: &RequestKey,
        response: Response,
    ) -> Result<(), CacheError> {
        self.open_namespace(namespace).await?;
        let path = self.entry_path(namespace, key)?;
        let cached = CachedData::new(StoredEntry {
            key: key.clone(),
            response,
        });
        let contents = serde_json::to_vec(&cached)?;

        // Write then rename so readers never see a partial entry.
        let seq = self.tmp_counter.fetch_add(1, Ordering::Relaxed);
        let tmp = path.with_extension(format!("json.{}.{}.tmp", std::process::id(), seq));
        tokio::fs::write(&tmp, contents).await?;
        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }

    async fn namespace_names(&self) -> Result<Vec<String>, CacheError> {
        let mut names = Vec::new();
        let mut read_dir = tokio::fs::read_dir(&self.root).await?;
        while let Some(item) = read_dir.next_entry().await? {
            if item.file_type().await?.is_dir() {
                if let Some(name) = item.file_name().to_str() {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    async fn delete_namespace(&self, name: &str) -> Result<bool, CacheError> {
        let path = self.namespace_path(name)?;
        match tokio::fs::remove_dir_all(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
