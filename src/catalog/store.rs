use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use crate::core::record::{InventoryRecord, ManualEntry};
use crate::core::types::RecordId;
use crate::utils::validation::{normalize_location, ValidationError};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Unknown record: {0}")]
    UnknownRecord(RecordId),

    #[error("Location must not be empty")]
    EmptyLocation,

    #[error("No items selected")]
    EmptySelection,

    #[error("A part number or description is required")]
    IncompleteEntry,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Failed to parse inventory: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Maximum number of records offered for bulk location editing
pub const BULK_VIEW_LIMIT: usize = 500;

/// Records eligible for bulk editing, capped, with the overflow count
#[derive(Debug, Clone, Serialize)]
pub struct BulkView<'a> {
    pub records: Vec<&'a InventoryRecord>,
    /// Eligible records left out by the cap
    pub hidden: usize,
}

/// The in-memory inventory with an id index and the bulk selection
#[derive(Debug, Default)]
pub struct InventoryStore {
    records: Vec<InventoryRecord>,

    /// Index: record id -> position in records vec
    id_to_index: HashMap<RecordId, usize>,

    /// Ids selected for bulk location assignment
    selection: HashSet<RecordId>,
}

impl InventoryStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from loaded records, giving fresh ids to records whose id
    /// is missing or repeats an earlier one
    #[must_use]
    pub fn from_records(records: Vec<InventoryRecord>) -> Self {
        let mut store = Self::new();
        let migrated = store.append(records);
        if migrated > 0 {
            tracing::info!("assigned new ids to {migrated} records");
        }
        store
    }

    /// Parse a persisted JSON array
    ///
    /// # Errors
    ///
    /// Returns `StoreError::ParseError` if the text is not a JSON array of
    /// records.
    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        if json.trim().is_empty() {
            return Ok(Self::new());
        }
        let records: Vec<InventoryRecord> = serde_json::from_str(json)?;
        Ok(Self::from_records(records))
    }

    /// Serialize all records as a pretty-printed JSON array
    ///
    /// # Errors
    ///
    /// Returns `StoreError::ParseError` if serialization fails.
    pub fn to_json(&self) -> Result<String, StoreError> {
        Ok(serde_json::to_string_pretty(&self.records)?)
    }

    /// Append records to the end of the collection.
    ///
    /// Returns how many records needed a new id.
    pub fn append(&mut self, records: Vec<InventoryRecord>) -> usize {
        let mut reassigned = 0;
        self.records.reserve(records.len());
        for mut record in records {
            if record.id.is_empty() || self.id_to_index.contains_key(&record.id) {
                record.id = RecordId::generate();
                reassigned += 1;
            }
            self.id_to_index
                .insert(record.id.clone(), self.records.len());
            self.records.push(record);
        }
        reassigned
    }

    /// Add a hand-entered item at the front of the collection.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::IncompleteEntry` if the entry has neither a part
    /// number nor a description, or a validation error for an oversized
    /// location.
    pub fn add_manual(
        &mut self,
        entry: ManualEntry,
        today: NaiveDate,
    ) -> Result<&InventoryRecord, StoreError> {
        let location = normalize_location(&entry.location)?;
        let mut record = entry
            .into_record(today)
            .ok_or(StoreError::IncompleteEntry)?;
        record.location = location;

        self.records.insert(0, record);
        self.rebuild_index();
        Ok(&self.records[0])
    }

    /// Set the storage location of a single record.
    ///
    /// An empty location marks the record unassigned again.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::UnknownRecord` for an id not in the store, or a
    /// validation error for an oversized location.
    pub fn update_location(
        &mut self,
        id: &RecordId,
        location: &str,
    ) -> Result<&InventoryRecord, StoreError> {
        let location = normalize_location(location)?;
        let index = *self
            .id_to_index
            .get(id)
            .ok_or_else(|| StoreError::UnknownRecord(id.clone()))?;
        let record = &mut self.records[index];
        record.location = location;
        Ok(record)
    }

    /// Add a record to the bulk selection.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::UnknownRecord` for an id not in the store.
    pub fn select(&mut self, id: &RecordId) -> Result<(), StoreError> {
        if !self.id_to_index.contains_key(id) {
            return Err(StoreError::UnknownRecord(id.clone()));
        }
        self.selection.insert(id.clone());
        Ok(())
    }

    /// Remove a record from the bulk selection; returns whether it was selected
    pub fn deselect(&mut self, id: &RecordId) -> bool {
        self.selection.remove(id)
    }

    /// Select every known id in `ids`; unknown ids are ignored.
    ///
    /// Returns the number of ids selected.
    pub fn select_all<'i>(&mut self, ids: impl IntoIterator<Item = &'i RecordId>) -> usize {
        let mut count = 0;
        for id in ids {
            if self.id_to_index.contains_key(id) {
                self.selection.insert(id.clone());
                count += 1;
            }
        }
        count
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    #[must_use]
    pub fn selection_len(&self) -> usize {
        self.selection.len()
    }

    #[must_use]
    pub fn is_selected(&self, id: &RecordId) -> bool {
        self.selection.contains(id)
    }

    /// Assign `location` to every selected record, then clear the selection.
    ///
    /// Returns the number of records updated.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::EmptyLocation` if the trimmed location is empty,
    /// `StoreError::EmptySelection` if nothing is selected, or a validation
    /// error for an oversized location. The selection is kept on error.
    pub fn apply_location_to_selection(&mut self, location: &str) -> Result<usize, StoreError> {
        let location = normalize_location(location)?;
        if location.is_empty() {
            return Err(StoreError::EmptyLocation);
        }
        if self.selection.is_empty() {
            return Err(StoreError::EmptySelection);
        }

        let mut updated = 0;
        for id in self.selection.drain() {
            if let Some(&index) = self.id_to_index.get(&id) {
                self.records[index].location.clone_from(&location);
                updated += 1;
            }
        }
        Ok(updated)
    }

    /// Records offered for bulk editing, in collection order
    #[must_use]
    pub fn bulk_candidates(&self, only_unassigned: bool, limit: usize) -> BulkView<'_> {
        let eligible: Vec<&InventoryRecord> = self
            .records
            .iter()
            .filter(|r| !only_unassigned || r.is_unassigned())
            .collect();
        let hidden = eligible.len().saturating_sub(limit);
        let mut records = eligible;
        records.truncate(limit);
        BulkView { records, hidden }
    }

    /// Remove all records and the selection
    pub fn clear(&mut self) {
        self.records.clear();
        self.id_to_index.clear();
        self.selection.clear();
    }

    /// Get a record by id
    #[must_use]
    pub fn get(&self, id: &RecordId) -> Option<&InventoryRecord> {
        self.id_to_index.get(id).map(|&idx| &self.records[idx])
    }

    #[must_use]
    pub fn records(&self) -> &[InventoryRecord] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn rebuild_index(&mut self) {
        self.id_to_index = self
            .records
            .iter()
            .enumerate()
            .map(|(i, r)| (r.id.clone(), i))
            .collect();
    }
}
