//! Unit-aware inventory search.
//!
//! - [`SearchEngine`](engine::SearchEngine): substring search across record fields
//! - [`expand_term`](expansion::expand_term): capacitance and resistance equivalents
//!
//! ## Ranking
//!
//! 1. Records whose part number or manufacturer part equals the query
//! 2. Newer order dates first; undated records last
//! 3. Collection order among ties
//!
//! At most 50 hits are returned by default.
//!
//! ## Example
//!
//! ```rust
//! use partscout::core::record::InventoryRecord;
//! use partscout::core::types::Source;
//! use partscout::matching::engine::SearchEngine;
//!
//! let mut cap = InventoryRecord::new(Source::Lcsc);
//! cap.part_number = "C1525".to_string();
//! cap.description = "0.1uF 16V X7R 0402".to_string();
//! let records = vec![cap];
//!
//! let engine = SearchEngine::new(&records);
//! let hits = engine.search("100nf");
//! assert_eq!(hits.len(), 1);
//! ```

pub mod engine;
pub mod expansion;
