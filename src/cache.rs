use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

#[derive(Serialize, Deserialize)]
struct Entry<T> {
    stored_at: DateTime<Utc>,
    value: T,
}

#[derive(Deserialize)]
struct Stamp {
    stored_at: DateTime<Utc>,
}

/// File-backed result cache with a fixed expiry.
#[derive(Debug, Clone)]
pub struct ResultCache {
    dir: PathBuf,
    ttl: Duration,
}

impl ResultCache {
    pub fn new(dir: impl Into<PathBuf>, ttl: Duration) -> Self {
        Self {
            dir: dir.into(),
            ttl,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let file: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{file}.json"))
    }

    fn is_expired(&self, stored_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        match (now - stored_at).to_std() {
            Ok(age) => age >= self.ttl,
            // stored in the future: clock moved, do not trust it
            Err(_) => true,
        }
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.get_at(key, Utc::now())
    }

    fn get_at<T: DeserializeOwned>(&self, key: &str, now: DateTime<Utc>) -> Option<T> {
        let path = self.path_for(key);
        let raw = std::fs::read(&path).ok()?;

        let entry: Entry<T> = match serde_json::from_slice(&raw) {
            Ok(entry) => entry,
            Err(err) => {
                warn!(key, error = %err, "discarding unreadable cache entry");
                let _ = std::fs::remove_file(&path);
                return None;
            }
        };

        if self.is_expired(entry.stored_at, now) {
            debug!(key, "cache entry expired");
            let _ = std::fs::remove_file(&path);
            return None;
        }

        debug!(key, "cache hit");
        Some(entry.value)
    }

    pub fn put<T: Serialize>(&self, key: &str, value: &T) -> anyhow::Result<()> {
        self.put_at(key, value, Utc::now())
    }

    fn put_at<T: Serialize>(&self, key: &str, value: &T, now: DateTime<Utc>) -> anyhow::Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("failed to create cache dir {}", self.dir.display()))?;
        let swept = self.sweep_expired(now);
        if swept > 0 {
            debug!(swept, "expired cache entries removed");
        }
        let entry = Entry {
            stored_at: now,
            value,
        };
        let path = self.path_for(key);
        let body = serde_json::to_vec(&entry)?;
        std::fs::write(&path, body)
            .with_context(|| format!("failed to write cache entry {}", path.display()))?;
        Ok(())
    }

    /// Deletes entries past the TTL (and unreadable ones) under any key.
    fn sweep_expired(&self, now: DateTime<Utc>) -> usize {
        let Ok(entries) = std::fs::read_dir(&self.dir) else {
            return 0;
        };

        let mut removed = 0usize;
        for path in entries.flatten().map(|entry| entry.path()) {
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            let stale = match std::fs::read(&path) {
                Ok(raw) => serde_json::from_slice::<Stamp>(&raw)
                    .map(|stamp| self.is_expired(stamp.stored_at, now))
                    .unwrap_or(true),
                Err(_) => continue,
            };
            if stale && std::fs::remove_file(&path).is_ok() {
                removed += 1;
            }
        }
        removed
    }

    /// Removes every entry; returns how many were deleted.
    pub fn clear(&self) -> anyhow::Result<usize> {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(err) => return Err(err).context("failed to read cache dir"),
        };

        let mut removed = 0usize;
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) == Some("json") {
                std::fs::remove_file(&path)
                    .with_context(|| format!("failed to remove {}", path.display()))?;
                removed += 1;
            }
        }
        Ok(removed)
    }
}

/// Returns the cached value for `key`, or runs `fetch` and caches its result.
/// Without a cache every call fetches.
pub async fn read_through<T, F, Fut>(
    cache: Option<&ResultCache>,
    key: &str,
    fetch: F,
) -> anyhow::Result<T>
where
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> Fut,
    Fut: Future<Output = anyhow::Result<T>>,
{
    if let Some(cached) = cache.and_then(|cache| cache.get::<T>(key)) {
        return Ok(cached);
    }

    let value = fetch().await?;
    if let Some(cache) = cache {
        cache.put(key, &value)?;
    }
    Ok(value)
}
