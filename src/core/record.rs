use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::core::tags::{generate_tags, tag_text, TagSet};
use crate::core::types::{RecordId, Source};
use crate::utils::dates;

/// One component line item in the inventory.
///
/// The serialized shape (camelCase field names) is the persisted JSON format
/// shared with the backend. Unknown fields are ignored on read and missing
/// fields fall back to their empty values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryRecord {
    /// Stable identifier, unique across the collection
    #[serde(default)]
    pub id: RecordId,

    /// Vendor's own part identifier (e.g. LCSC `C25804`)
    #[serde(default)]
    pub part_number: String,

    /// Manufacturer part number
    #[serde(default)]
    pub mfr_part: String,

    #[serde(default)]
    pub manufacturer: String,

    #[serde(default)]
    pub description: String,

    /// Digits only; empty when unknown
    #[serde(default)]
    pub quantity: String,

    /// ISO-8601 date or date-time, absent when no date could be recovered
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_date: Option<String>,

    #[serde(default)]
    pub source: Source,

    #[serde(default)]
    pub tags: TagSet,

    /// Product page or search URL, empty when none could be built
    #[serde(default)]
    pub link: String,

    /// Storage location, empty means unassigned
    #[serde(default)]
    pub location: String,
}

impl InventoryRecord {
    /// Create an empty record with a fresh id
    #[must_use]
    pub fn new(source: Source) -> Self {
        Self {
            id: RecordId::generate(),
            part_number: String::new(),
            mfr_part: String::new(),
            manufacturer: String::new(),
            description: String::new(),
            quantity: String::new(),
            order_date: None,
            source,
            tags: TagSet::new(),
            link: String::new(),
            location: String::new(),
        }
    }

    /// Parsed order date used for recency ranking
    #[must_use]
    pub fn order_timestamp(&self) -> Option<NaiveDateTime> {
        self.order_date.as_deref().and_then(dates::parse_stored)
    }

    /// True if the record has no storage location yet
    #[must_use]
    pub fn is_unassigned(&self) -> bool {
        self.location.trim().is_empty()
    }

    /// True if none of the identifying fields carry any text
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.part_number.is_empty() && self.mfr_part.is_empty() && self.description.is_empty()
    }

    /// Title shown in listings: manufacturer part, else "manufacturer part-number"
    #[must_use]
    pub fn display_title(&self) -> String {
        if !self.mfr_part.is_empty() && self.mfr_part != self.part_number {
            return self.mfr_part.clone();
        }
        match (self.manufacturer.is_empty(), self.part_number.is_empty()) {
            (false, false) => format!("{} {}", self.manufacturer, self.part_number),
            (_, false) => self.part_number.clone(),
            _ => "Unknown Part".to_string(),
        }
    }

    /// Joined tag labels, as matched by search
    #[must_use]
    pub fn tag_line(&self) -> String {
        self.tags
            .iter()
            .map(|t| t.label())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Fields a user types in when adding a single item by hand
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ManualEntry {
    pub source: String,
    pub part_number: String,
    pub manufacturer: String,
    pub description: String,
    pub quantity: String,
    pub location: String,
    pub link: String,
}

impl ManualEntry {
    /// Build the record for this entry, dated `today`.
    ///
    /// Returns `None` when the entry has neither a part number nor a
    /// description.
    #[must_use]
    pub fn into_record(self, today: chrono::NaiveDate) -> Option<InventoryRecord> {
        let part_number = self.part_number.trim().to_string();
        let description = self.description.trim().to_string();
        if part_number.is_empty() && description.is_empty() {
            return None;
        }

        let manufacturer = self.manufacturer.trim().to_string();
        let tags = generate_tags(&tag_text(&[&description, &manufacturer, &part_number]));

        let mut record = InventoryRecord::new(Source::from(self.source.trim()));
        record.mfr_part.clone_from(&part_number);
        record.part_number = part_number;
        record.manufacturer = manufacturer;
        record.description = description;
        record.quantity = digits_only(&self.quantity);
        record.order_date = Some(today.format("%Y-%m-%d").to_string());
        record.tags = tags;
        record.link = self.link.trim().to_string();
        record.location = self.location.trim().to_string();
        Some(record)
    }
}

/// Keep only the ASCII digits of a quantity cell ("1,000 pcs" -> "1000")
#[must_use]
pub fn digits_only(s: &str) -> String {
    s.chars().filter(char::is_ascii_digit).collect()
}
