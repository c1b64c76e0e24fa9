use std::cmp::Reverse;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::core::record::InventoryRecord;
use crate::matching::expansion::expand_term;

/// A record returned by a search
#[derive(Debug, Clone, Copy)]
pub struct SearchHit<'a> {
    /// The matched record
    pub record: &'a InventoryRecord,

    /// True if the record's part number equals the query, ignoring case
    pub exact: bool,
}

/// Default number of results returned by a search
pub const DEFAULT_RESULT_LIMIT: usize = 50;

/// Default number of records shown when there is no query
pub const DEFAULT_SAMPLE_LIMIT: usize = 50;

/// Configuration for the search engine
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Maximum number of hits returned by [`SearchEngine::search`]
    pub result_limit: usize,
    /// Maximum number of records returned by [`SearchEngine::sample`]
    pub sample_limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            result_limit: DEFAULT_RESULT_LIMIT,
            sample_limit: DEFAULT_SAMPLE_LIMIT,
        }
    }
}

/// Unit-aware substring search over a set of records
pub struct SearchEngine<'a> {
    records: &'a [InventoryRecord],
    config: SearchConfig,
}

impl<'a> SearchEngine<'a> {
    /// Create a new search engine with default configuration
    #[must_use]
    pub fn new(records: &'a [InventoryRecord]) -> Self {
        Self {
            records,
            config: SearchConfig::default(),
        }
    }

    /// Create a new search engine with custom configuration
    #[must_use]
    pub fn with_config(records: &'a [InventoryRecord], config: SearchConfig) -> Self {
        Self { records, config }
    }

    /// Find records matching `query`.
    ///
    /// The query is trimmed and lower-cased, then expanded into unit
    /// equivalents. A record matches if any variant is a substring of its
    /// part number, manufacturer part, description, manufacturer, tags,
    /// source or location. Exact part number matches sort first, then newer
    /// orders; records without a readable date sort after dated ones. Other
    /// fields never make a hit exact. An empty query returns nothing.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<SearchHit<'a>> {
        let term = query.trim().to_lowercase();
        if term.is_empty() {
            return Vec::new();
        }

        let variants: Vec<String> = expand_term(&term).into_iter().collect();
        tracing::debug!("search '{term}' expanded to {variants:?}");

        let mut hits: Vec<SearchHit<'a>> = self
            .records
            .iter()
            .filter(|record| matches_any(record, &variants))
            .map(|record| SearchHit {
                record,
                exact: is_exact_match(record, &term),
            })
            .collect();

        // Stable, so equal keys keep collection order
        hits.sort_by_cached_key(|hit| (Reverse(hit.exact), Reverse(hit.record.order_timestamp())));
        hits.truncate(self.config.result_limit);
        hits
    }

    /// Random selection of records for browsing without a query
    #[must_use]
    pub fn sample(&self) -> Vec<&'a InventoryRecord> {
        self.sample_with(&mut rand::thread_rng())
    }

    /// Random selection drawn from the given generator
    pub fn sample_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<&'a InventoryRecord> {
        self.records
            .choose_multiple(rng, self.config.sample_limit)
            .collect()
    }
}

/// Lower-cased text of every searchable field
fn searchable_fields(record: &InventoryRecord) -> [String; 7] {
    [
        record.part_number.to_lowercase(),
        record.mfr_part.to_lowercase(),
        record.description.to_lowercase(),
        record.manufacturer.to_lowercase(),
        record.tag_line().to_lowercase(),
        record.source.as_str().to_lowercase(),
        record.location.to_lowercase(),
    ]
}

fn matches_any(record: &InventoryRecord, variants: &[String]) -> bool {
    let fields = searchable_fields(record);
    variants
        .iter()
        .any(|v| fields.iter().any(|field| field.contains(v.as_str())))
}

fn is_exact_match(record: &InventoryRecord, term: &str) -> bool {
    record.part_number.to_lowercase() == term
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::tags::{generate_tags, Tag};
    use crate::core::types::Source;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn record(part: &str, description: &str, date: Option<&str>) -> InventoryRecord {
        let mut r = InventoryRecord::new(Source::Lcsc);
        r.part_number = part.to_string();
        r.description = description.to_string();
        r.order_date = date.map(str::to_string);
        r.tags = generate_tags(&description.to_lowercase());
        r
    }

    fn parts(hits: &[SearchHit<'_>]) -> Vec<String> {
        hits.iter().map(|h| h.record.part_number.clone()).collect()
    }

    #[test]
    fn test_unit_equivalent_match() {
        let records = vec![
            record("C1", "0.1uF 50V X7R 0603", Some("2024-01-01")),
            record("C2", "10k resistor", Some("2024-01-01")),
        ];
        let engine = SearchEngine::new(&records);

        let hits = engine.search("100nF");
        assert_eq!(parts(&hits), vec!["C1"]);
        assert!(!hits[0].exact);
    }

    #[test]
    fn test_resistance_equivalent_match() {
        let records = vec![record("R1", "4700 ohm 1% 0402", None)];
        let engine = SearchEngine::new(&records);
        assert_eq!(engine.search("4.7k").len(), 1);
    }

    #[test]
    fn test_exact_part_first_then_newest() {
        let records = vec![
            record("C25804-ALT", "old", Some("2020-01-01")),
            record("X9", "mentions c25804 in text", Some("2024-06-01")),
            record("C25804", "exact", Some("2019-01-01")),
            record("Y1", "undated c25804", None),
        ];
        let engine = SearchEngine::new(&records);

        let hits = engine.search("c25804");
        assert_eq!(parts(&hits), vec!["C25804", "X9", "C25804-ALT", "Y1"]);
        assert!(hits[0].exact);
    }

    #[test]
    fn test_manufacturer_part_is_not_exact() {
        let mut older = record("C1", "timer", Some("2020-01-01"));
        older.mfr_part = "NE555P".to_string();
        let records = vec![older, record("P2", "ne555p timer clone", Some("2025-01-01"))];
        let engine = SearchEngine::new(&records);

        let hits = engine.search("NE555P");
        assert_eq!(parts(&hits), vec!["P2", "C1"]);
        assert!(hits.iter().all(|h| !h.exact));
    }

    #[test]
    fn test_source_query_ranked_by_recency() {
        let mut records = vec![
            record("L1", "resistor", Some("2024-05-01")),
            record("D1", "capacitor", Some("2022-01-15")),
            record("O1", "header", Some("2025-01-01")),
            record("D2", "diode", Some("2024-11-30T08:00:00Z")),
            record("D3", "inductor", None),
            record("D4", "led", Some("2023-03-03")),
        ];
        for r in &mut records[1..] {
            r.source = Source::DigiKey;
        }
        records[2].source = Source::Other("Mouser".to_string());
        let engine = SearchEngine::new(&records);

        let hits = engine.search("DigiKey");
        assert_eq!(parts(&hits), vec!["D2", "D4", "D1", "D3"]);
        assert!(hits
            .iter()
            .all(|h| h.record.source.as_str().to_lowercase().contains("digikey")));
    }

    #[test]
    fn test_matches_tags_source_and_location() {
        let mut r = record("P1", "thing", None);
        r.tags = [Tag::KeyboardSwitch].into_iter().collect();
        r.location = "Drawer A3".to_string();
        let records = vec![r];
        let engine = SearchEngine::new(&records);

        assert_eq!(engine.search("keyboard switch").len(), 1);
        assert_eq!(engine.search("lcsc").len(), 1);
        assert_eq!(engine.search("drawer a3").len(), 1);
        assert!(engine.search("bin b").is_empty());
    }

    #[test]
    fn test_empty_query_returns_nothing() {
        let records = vec![record("P1", "thing", None)];
        let engine = SearchEngine::new(&records);
        assert!(engine.search("").is_empty());
        assert!(engine.search("   ").is_empty());
    }

    #[test]
    fn test_result_limit() {
        let records: Vec<_> = (0..80)
            .map(|i| record(&format!("P{i}"), "resistor", None))
            .collect();
        let engine = SearchEngine::new(&records);
        assert_eq!(engine.search("resistor").len(), DEFAULT_RESULT_LIMIT);

        let engine = SearchEngine::with_config(
            &records,
            SearchConfig {
                result_limit: 5,
                ..SearchConfig::default()
            },
        );
        let hits = engine.search("resistor");
        // Equal keys keep collection order
        assert_eq!(parts(&hits), vec!["P0", "P1", "P2", "P3", "P4"]);
    }

    #[test]
    fn test_sample() {
        let records: Vec<_> = (0..80)
            .map(|i| record(&format!("P{i}"), "thing", None))
            .collect();
        let engine = SearchEngine::new(&records);

        let mut rng = StdRng::seed_from_u64(7);
        let sample = engine.sample_with(&mut rng);
        assert_eq!(sample.len(), DEFAULT_SAMPLE_LIMIT);

        let small = &records[..3];
        let engine = SearchEngine::new(small);
        assert_eq!(engine.sample().len(), 3);
    }
}
