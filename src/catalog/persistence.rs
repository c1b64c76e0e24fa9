//! Local cache file plus optional remote backend.
//!
//! The cache is the JSON array written by [`InventoryStore::to_json`]. Writes
//! go to a temporary file in the same directory which is then renamed over
//! the cache, so a crash never leaves a half-written file behind.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tempfile::NamedTempFile;
use thiserror::Error;

use crate::catalog::store::{InventoryStore, StoreError};
use crate::core::record::InventoryRecord;

/// Default location of the local cache file
pub const DEFAULT_CACHE_FILE: &str = "inventory.json";

/// Default timeout for remote requests
pub const DEFAULT_REMOTE_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Error, Debug)]
pub enum PersistError {
    #[error("Failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read inventory cache: {0}")]
    Store(#[from] StoreError),

    #[error("Remote request failed: {0}")]
    Remote(#[from] reqwest::Error),
}

/// Where the inventory is persisted
#[derive(Debug, Clone)]
pub struct PersistenceConfig {
    /// Local JSON cache, always written
    pub cache_path: PathBuf,
    /// Base URL of a remote backend serving `/api/inventory`
    pub remote_url: Option<String>,
    /// Timeout for each remote request
    pub remote_timeout: Duration,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            cache_path: PathBuf::from(DEFAULT_CACHE_FILE),
            remote_url: None,
            remote_timeout: DEFAULT_REMOTE_TIMEOUT,
        }
    }
}

/// Result of loading the inventory
#[derive(Debug)]
pub struct LoadOutcome {
    pub store: InventoryStore,
    /// True if a remote is configured but could not be reached
    pub offline: bool,
}

/// What happened to the remote copy during a save
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncStatus {
    /// No remote configured
    LocalOnly,
    /// Remote accepted the collection
    Synced,
    /// Remote write failed; the local cache is still up to date
    RemoteFailed(String),
    /// The cache could not be written; `synced` is true if the remote still
    /// accepted the collection
    LocalFailed { reason: String, synced: bool },
}

pub struct Persistence {
    config: PersistenceConfig,
    client: reqwest::Client,
}

impl Persistence {
    #[must_use]
    pub fn new(config: PersistenceConfig) -> Self {
        let client = match reqwest::Client::builder()
            .timeout(config.remote_timeout)
            .build()
        {
            Ok(client) => client,
            Err(e) => {
                tracing::warn!("HTTP client setup failed, remote timeout not applied: {e}");
                reqwest::Client::default()
            }
        };
        Self { config, client }
    }

    /// Persistence backed only by a cache file
    #[must_use]
    pub fn local(cache_path: impl Into<PathBuf>) -> Self {
        Self::new(PersistenceConfig {
            cache_path: cache_path.into(),
            ..PersistenceConfig::default()
        })
    }

    /// Load the inventory, preferring the remote backend.
    ///
    /// When the remote cannot be reached the local cache is used instead and
    /// the outcome is flagged offline.
    ///
    /// # Errors
    ///
    /// Returns an error only if the local cache exists but cannot be read or
    /// parsed.
    pub async fn load(&self) -> Result<LoadOutcome, PersistError> {
        if let Some(url) = self.inventory_url() {
            match self.fetch_remote(&url).await {
                Ok(records) => {
                    tracing::info!("loaded {} records from {url}", records.len());
                    return Ok(LoadOutcome {
                        store: InventoryStore::from_records(records),
                        offline: false,
                    });
                }
                Err(e) => {
                    tracing::warn!("remote {url} unavailable, using local cache: {e}");
                    return Ok(LoadOutcome {
                        store: self.read_cache()?,
                        offline: true,
                    });
                }
            }
        }

        Ok(LoadOutcome {
            store: self.read_cache()?,
            offline: false,
        })
    }

    /// Write the local cache, then push to the remote if one is configured.
    ///
    /// Neither write is fatal: failures are logged and reported through the
    /// returned status, and the in-memory store is left as it is.
    pub async fn save(&self, store: &InventoryStore) -> SyncStatus {
        let local = self.write_cache(store);
        if let Err(e) = &local {
            tracing::warn!("failed to write local cache: {e}");
        }

        let remote = match self.inventory_url() {
            None => None,
            Some(url) => match self.push_remote(&url, store.records()).await {
                Ok(()) => Some(Ok(())),
                Err(e) => {
                    tracing::warn!("failed to sync {} records to {url}: {e}", store.len());
                    Some(Err(e.to_string()))
                }
            },
        };

        match (local, remote) {
            (Err(e), remote) => SyncStatus::LocalFailed {
                reason: e.to_string(),
                synced: matches!(remote, Some(Ok(()))),
            },
            (Ok(()), None) => SyncStatus::LocalOnly,
            (Ok(()), Some(Ok(()))) => SyncStatus::Synced,
            (Ok(()), Some(Err(reason))) => SyncStatus::RemoteFailed(reason),
        }
    }

    /// Read the cache file; a missing or empty file is an empty inventory
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid inventory
    /// JSON.
    pub fn read_cache(&self) -> Result<InventoryStore, PersistError> {
        let path = &self.config.cache_path;
        if !path.exists() {
            tracing::debug!("no cache at {}, starting empty", path.display());
            return Ok(InventoryStore::new());
        }
        let json = std::fs::read_to_string(path).map_err(|source| PersistError::Io {
            path: path.clone(),
            source,
        })?;
        Ok(InventoryStore::from_json(&json)?)
    }

    /// Atomically replace the cache file
    ///
    /// # Errors
    ///
    /// Returns an error if the temporary file cannot be created, written or
    /// renamed over the cache.
    pub fn write_cache(&self, store: &InventoryStore) -> Result<(), PersistError> {
        let path = &self.config.cache_path;
        let dir = cache_dir(path);
        let io_err = |source: std::io::Error| PersistError::Io {
            path: path.clone(),
            source,
        };

        std::fs::create_dir_all(&dir).map_err(io_err)?;
        let json = store.to_json()?;
        let mut tmp = NamedTempFile::new_in(&dir).map_err(io_err)?;
        tmp.write_all(json.as_bytes()).map_err(io_err)?;
        tmp.persist(path).map_err(|e| io_err(e.error))?;

        tracing::debug!("wrote {} records to {}", store.len(), path.display());
        Ok(())
    }

    fn inventory_url(&self) -> Option<String> {
        self.config
            .remote_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .map(|u| format!("{}/api/inventory", u.trim_end_matches('/')))
    }

    async fn fetch_remote(&self, url: &str) -> Result<Vec<InventoryRecord>, reqwest::Error> {
        self.client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
    }

    async fn push_remote(&self, url: &str, records: &[InventoryRecord]) -> Result<(), reqwest::Error> {
        self.client
            .post(url)
            .json(records)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

fn cache_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Source;
    use tempfile::TempDir;

    // Nothing listens on the discard port
    const DEAD_REMOTE: &str = "http://127.0.0.1:9";

    fn store_with(parts: &[&str]) -> InventoryStore {
        let mut store = InventoryStore::new();
        store.append(
            parts
                .iter()
                .map(|p| {
                    let mut r = InventoryRecord::new(Source::DigiKey);
                    r.part_number = (*p).to_string();
                    r
                })
                .collect(),
        );
        store
    }

    #[tokio::test]
    async fn test_save_then_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let persistence = Persistence::local(dir.path().join("nested").join("inv.json"));

        let store = store_with(&["A", "B"]);
        let status = persistence.save(&store).await;
        assert_eq!(status, SyncStatus::LocalOnly);

        let loaded = persistence.load().await.unwrap();
        assert!(!loaded.offline);
        assert_eq!(loaded.store.records(), store.records());
    }

    #[tokio::test]
    async fn test_missing_cache_is_empty() {
        let dir = TempDir::new().unwrap();
        let persistence = Persistence::local(dir.path().join("absent.json"));
        let loaded = persistence.load().await.unwrap();
        assert!(loaded.store.is_empty());
    }

    #[test]
    fn test_corrupt_cache_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("inv.json");
        std::fs::write(&path, "not json").unwrap();
        let persistence = Persistence::local(&path);
        assert!(matches!(
            persistence.read_cache(),
            Err(PersistError::Store(_))
        ));
    }

    #[tokio::test]
    async fn test_failing_remote_still_writes_cache() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("inv.json");
        let persistence = Persistence::new(PersistenceConfig {
            cache_path: path.clone(),
            remote_url: Some(DEAD_REMOTE.to_string()),
            remote_timeout: Duration::from_secs(2),
        });

        let store = store_with(&["A"]);
        let status = persistence.save(&store).await;
        assert!(matches!(status, SyncStatus::RemoteFailed(_)));
        assert!(path.exists());

        let loaded = persistence.load().await.unwrap();
        assert!(loaded.offline);
        assert_eq!(loaded.store.len(), 1);
    }

    #[tokio::test]
    async fn test_remote_timeout_is_applied() {
        // Accepts connections but never answers
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let hold = tokio::spawn(async move {
            let mut open = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                open.push(socket);
            }
        });

        let dir = TempDir::new().unwrap();
        let persistence = Persistence::new(PersistenceConfig {
            cache_path: dir.path().join("inv.json"),
            remote_url: Some(format!("http://{addr}")),
            remote_timeout: Duration::from_millis(300),
        });

        let start = std::time::Instant::now();
        let status = persistence.save(&store_with(&["A"])).await;
        assert!(matches!(status, SyncStatus::RemoteFailed(_)));
        assert!(start.elapsed() < Duration::from_secs(10));
        hold.abort();
    }

    #[tokio::test]
    async fn test_unwritable_cache_is_reported() {
        let dir = TempDir::new().unwrap();
        // A directory where the cache file should be
        let persistence = Persistence::local(dir.path());

        let status = persistence.save(&store_with(&["A"])).await;
        assert!(matches!(
            status,
            SyncStatus::LocalFailed { synced: false, .. }
        ));
    }

    #[test]
    fn test_inventory_url() {
        let persistence = Persistence::new(PersistenceConfig {
            remote_url: Some("http://host:5000/".to_string()),
            ..PersistenceConfig::default()
        });
        assert_eq!(
            persistence.inventory_url().as_deref(),
            Some("http://host:5000/api/inventory")
        );

        let persistence = Persistence::new(PersistenceConfig {
            remote_url: Some("  ".to_string()),
            ..PersistenceConfig::default()
        });
        assert!(persistence.inventory_url().is_none());
    }

    #[test]
    fn test_cache_dir() {
        assert_eq!(cache_dir(Path::new("inv.json")), PathBuf::from("."));
        assert_eq!(cache_dir(Path::new("/tmp/x/inv.json")), PathBuf::from("/tmp/x"));
    }
}
