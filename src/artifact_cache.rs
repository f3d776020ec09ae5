/*!
 * Ephemeral artifact cache.
 *
 * Process-wide keyed store mapping a short identifier to a produced file's
 * location and display name, so a caller can retrieve the artifact
 * out-of-band after a pipeline run finishes. Entries are single-shot: a
 * successful take removes the entry, and a second take under the same key
 * misses. The backing file is deleted at most once, either by the consumer
 * after retrieval or by eviction here.
 *
 * Expiry policy: there is no background sweeper. Staleness is enforced
 * lazily at take time against the configured TTL, and hosts may call
 * `evict_expired` explicitly. Every removal path holds the same write lock,
 * so a sweep can never race a retrieval into a double delete.
 */

use chrono::{DateTime, Duration, Utc};
use log::{debug, warn};
use parking_lot::RwLock;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::errors::CacheError;
use crate::file_utils::FileManager;

/// Number of hex characters kept from the identifier hash
const KEY_LEN: usize = 8;

/// One cached artifact awaiting retrieval
#[derive(Debug, Clone, PartialEq)]
pub struct ArtifactEntry {
    /// Cache key the entry is registered under
    pub key: String,

    /// Location of the produced file
    pub path: PathBuf,

    /// Name the artifact should be presented under
    pub display_name: String,

    /// Registration time, used for TTL checks
    pub created_at: DateTime<Utc>,
}

/// Injected cache service interface. Pipeline code depends on this trait so
/// the in-memory store can be swapped for a time-expiring or distributed one
/// without touching pipeline logic.
pub trait ArtifactStore: Send + Sync {
    /// Insert or overwrite the entry for `key`
    fn put(&self, key: &str, path: PathBuf, display_name: &str);

    /// Atomically remove and return the entry for `key`. Misses when the key
    /// is absent, already consumed, expired, or its backing file vanished.
    fn take(&self, key: &str) -> Result<ArtifactEntry, CacheError>;
}

/// In-memory artifact store over a hash map guarded by a single lock
pub struct InMemoryArtifactStore {
    entries: RwLock<HashMap<String, ArtifactEntry>>,

    /// Entries older than this are stale; None disables the check
    ttl: Option<Duration>,
}

impl InMemoryArtifactStore {
    /// Create a store whose entries expire `ttl_secs` after registration
    pub fn new(ttl_secs: u64) -> Self {
        let ttl = if ttl_secs == 0 {
            None
        } else {
            Some(Duration::seconds(ttl_secs as i64))
        };
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Create a store whose entries never expire
    pub fn unbounded() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl: None,
        }
    }

    /// Number of entries currently registered
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Remove every expired entry, deleting each backing file. Returns the
    /// number of entries evicted.
    pub fn evict_expired(&self) -> usize {
        let Some(ttl) = self.ttl else {
            return 0;
        };

        let cutoff = Utc::now() - ttl;
        let mut entries = self.entries.write();
        let stale: Vec<String> = entries
            .iter()
            .filter(|(_, e)| e.created_at < cutoff)
            .map(|(k, _)| k.clone())
            .collect();

        for key in &stale {
            if let Some(entry) = entries.remove(key) {
                warn!("Evicting expired artifact '{}' ({})", entry.display_name, key);
                FileManager::remove_file_quiet(&entry.path);
            }
        }

        stale.len()
    }

    fn is_expired(&self, entry: &ArtifactEntry) -> bool {
        match self.ttl {
            Some(ttl) => entry.created_at < Utc::now() - ttl,
            None => false,
        }
    }
}

impl ArtifactStore for InMemoryArtifactStore {
    fn put(&self, key: &str, path: PathBuf, display_name: &str) {
        let entry = ArtifactEntry {
            key: key.to_string(),
            path,
            display_name: display_name.to_string(),
            created_at: Utc::now(),
        };

        let mut entries = self.entries.write();
        if entries.insert(key.to_string(), entry).is_some() {
            debug!("Overwrote cached artifact under key '{}'", key);
        } else {
            debug!("Registered artifact under key '{}'", key);
        }
    }

    fn take(&self, key: &str) -> Result<ArtifactEntry, CacheError> {
        let mut entries = self.entries.write();

        let Some(entry) = entries.remove(key) else {
            return Err(CacheError::Miss(key.to_string()));
        };

        // The entry is already out of the map at this point, so no caller
        // can observe a key whose file has been removed.
        if self.is_expired(&entry) {
            debug!("Cache entry '{}' expired, removing backing file", key);
            FileManager::remove_file_quiet(&entry.path);
            return Err(CacheError::Miss(key.to_string()));
        }

        if !FileManager::file_exists(&entry.path) {
            warn!("Cached artifact file vanished for key '{}': {:?}", key, entry.path);
            return Err(CacheError::Miss(key.to_string()));
        }

        Ok(entry)
    }
}

/// Derive the cache key for a caller-supplied identifier: the SHA-256 digest
/// truncated to eight hex characters. Deterministic within and across
/// process lifetimes.
pub fn cache_key(identifier: &str) -> String {
    let digest = Sha256::digest(identifier.as_bytes());
    let hex: String = digest.iter().map(|b| format!("{:02x}", b)).collect();
    hex[..KEY_LEN].to_string()
}
