use std::fmt;
use std::future::Future;

use serde::Serialize;
use thiserror::Error;

use crate::catalog::persistence::{PersistError, Persistence, SyncStatus};
use crate::catalog::store::{InventoryStore, StoreError};
use crate::core::record::{InventoryRecord, ManualEntry};
use crate::core::types::{RecordId, Source};
use crate::matching::engine::{SearchConfig, SearchEngine};
use crate::parsing::ingest::parse_with_report;
use crate::utils::dates;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Persist(#[from] PersistError),
}

/// Severity of a user-visible message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Warning,
}

/// A short message for the user, shown after an operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Result of importing one file
#[derive(Debug, Clone, Serialize)]
pub struct IngestOutcome {
    pub filename: String,
    pub imported: usize,
    pub source: Source,
    pub notices: Vec<Notice>,
}

/// Entry points the presentation layer calls into.
///
/// Mutating hooks persist the inventory before returning.
pub trait InventoryHooks {
    /// Parse an export and append its records
    fn on_ingest(
        &mut self,
        text: &str,
        filename: &str,
    ) -> impl Future<Output = Result<IngestOutcome, ServiceError>> + Send;

    /// Ranked matches for `query`, or a random sample when it is blank
    fn on_search(&self, query: &str) -> Vec<InventoryRecord>;

    /// Set the storage location of one record
    fn on_location_edit(
        &mut self,
        id: &RecordId,
        location: &str,
    ) -> impl Future<Output = Result<Vec<Notice>, ServiceError>> + Send;
}

/// The inventory store wired to search and persistence
pub struct InventoryService {
    store: InventoryStore,
    persistence: Persistence,
    search: SearchConfig,
}

impl InventoryService {
    #[must_use]
    pub fn new(store: InventoryStore, persistence: Persistence) -> Self {
        Self {
            store,
            persistence,
            search: SearchConfig::default(),
        }
    }

    /// Load the inventory and build the service.
    ///
    /// Returns an "Offline Mode" notice when the remote backend was
    /// configured but unreachable.
    ///
    /// # Errors
    ///
    /// Returns an error if the local cache cannot be read.
    pub async fn open(persistence: Persistence) -> Result<(Self, Vec<Notice>), ServiceError> {
        let loaded = persistence.load().await?;
        let mut notices = Vec::new();
        if loaded.offline {
            notices.push(Notice::warning(
                "Offline Mode: backend unreachable, using the local cache",
            ));
        }
        Ok((Self::new(loaded.store, persistence), notices))
    }

    #[must_use]
    pub fn with_search_config(mut self, search: SearchConfig) -> Self {
        self.search = search;
        self
    }

    #[must_use]
    pub fn store(&self) -> &InventoryStore {
        &self.store
    }

    /// Add a hand-entered item dated today
    ///
    /// # Errors
    ///
    /// Returns an error for an incomplete or oversized entry.
    pub async fn add_manual(
        &mut self,
        entry: ManualEntry,
    ) -> Result<(InventoryRecord, Vec<Notice>), ServiceError> {
        let record = self.store.add_manual(entry, dates::today())?.clone();
        tracing::info!("added {} manually", record.id);

        let mut notices = self.persist().await;
        notices.insert(0, Notice::info("Item Added Successfully"));
        Ok((record, notices))
    }

    /// Assign `location` to every record in `ids`.
    ///
    /// Replaces any pending selection. Returns the number of records updated.
    ///
    /// # Errors
    ///
    /// Returns an error for an empty location or when none of `ids` is
    /// known.
    pub async fn bulk_location(
        &mut self,
        ids: &[RecordId],
        location: &str,
    ) -> Result<(usize, Vec<Notice>), ServiceError> {
        self.store.clear_selection();
        self.store.select_all(ids);
        self.apply_selection(location).await
    }

    /// Assign `location` to the pending selection, then clear it
    ///
    /// # Errors
    ///
    /// Returns an error for an empty location or selection.
    pub async fn apply_selection(
        &mut self,
        location: &str,
    ) -> Result<(usize, Vec<Notice>), ServiceError> {
        let updated = match self.store.apply_location_to_selection(location) {
            Ok(n) => n,
            Err(e) => {
                self.store.clear_selection();
                return Err(e.into());
            }
        };
        tracing::info!("set location of {updated} records");

        let mut notices = self.persist().await;
        notices.insert(0, Notice::info(format!("Updated location for {updated} items.")));
        Ok((updated, notices))
    }

    /// Replace the whole collection, as posted by a client
    pub async fn replace_all(&mut self, records: Vec<InventoryRecord>) -> Vec<Notice> {
        self.store = InventoryStore::from_records(records);
        tracing::info!("replaced inventory with {} records", self.store.len());
        self.persist().await
    }

    /// Remove every record
    pub async fn clear(&mut self) -> Vec<Notice> {
        let removed = self.store.len();
        self.store.clear();
        tracing::info!("cleared {removed} records");

        let mut notices = self.persist().await;
        notices.insert(0, Notice::info("All data cleared."));
        notices
    }

    /// Save the inventory; any failure becomes a warning notice since the
    /// change has already been applied in memory
    async fn persist(&self) -> Vec<Notice> {
        match self.persistence.save(&self.store).await {
            SyncStatus::LocalOnly | SyncStatus::Synced => Vec::new(),
            SyncStatus::RemoteFailed(_) => vec![Notice::warning(
                "Sync failed: changes are saved locally only",
            )],
            SyncStatus::LocalFailed { synced: true, .. } => vec![Notice::warning(
                "Local save failed: changes are stored on the backend only",
            )],
            SyncStatus::LocalFailed { synced: false, .. } => vec![Notice::warning(
                "Save failed: changes are kept in memory only",
            )],
        }
    }
}

impl InventoryHooks for InventoryService {
    async fn on_ingest(
        &mut self,
        text: &str,
        filename: &str,
    ) -> Result<IngestOutcome, ServiceError> {
        let parsed = parse_with_report(text, filename);
        let imported = parsed.records.len();

        if imported == 0 {
            tracing::warn!("{filename}: no records recognized");
            return Ok(IngestOutcome {
                filename: filename.to_string(),
                imported,
                source: parsed.source,
                notices: vec![Notice::warning(format!(
                    "Could not recognize data in {filename}"
                ))],
            });
        }

        self.store.append(parsed.records);
        tracing::info!("{filename}: imported {imported} records ({})", parsed.source);

        let mut notices = vec![Notice::info(format!(
            "Imported {imported} items ({})",
            parsed.source
        ))];
        if parsed.truncated_rows > 0 {
            notices.push(Notice::warning(format!(
                "{filename}: {} rows over the import limit were skipped",
                parsed.truncated_rows
            )));
        }
        notices.extend(self.persist().await);

        Ok(IngestOutcome {
            filename: filename.to_string(),
            imported,
            source: parsed.source,
            notices,
        })
    }

    fn on_search(&self, query: &str) -> Vec<InventoryRecord> {
        let engine = SearchEngine::with_config(self.store.records(), self.search.clone());
        if query.trim().is_empty() {
            return engine.sample().into_iter().cloned().collect();
        }
        engine
            .search(query)
            .into_iter()
            .map(|hit| hit.record.clone())
            .collect()
    }

    async fn on_location_edit(
        &mut self,
        id: &RecordId,
        location: &str,
    ) -> Result<Vec<Notice>, ServiceError> {
        self.store.update_location(id, location)?;
        tracing::debug!("set location of {id}");
        Ok(self.persist().await)
    }
}
