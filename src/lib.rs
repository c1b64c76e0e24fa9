//! # partscout
//!
//! A library for building and searching an electronic parts inventory from
//! vendor order exports.
//!
//! Hobbyists and small labs buy components from LCSC, DigiKey and others and
//! lose track of what is already in the drawers. `partscout` turns the CSV
//! order exports those vendors provide into one searchable inventory.
//!
//! ## Features
//!
//! - **Export recognition**: LCSC and DigiKey exports are detected by their
//!   headers; any CSV with recognizable column names also imports
//! - **Automatic tagging**: resistors, capacitors, MCUs, connectors and more
//!   are tagged from descriptions and part numbers
//! - **Unit-aware search**: `100nf` finds `0.1uF` and `100000pF`, `4.7k`
//!   finds `4700R`
//! - **Locations**: record where parts are stored, one at a time or in bulk
//! - **Sync**: a local JSON cache plus an optional shared HTTP backend
//!
//! ## Example
//!
//! ```rust
//! use partscout::parsing::ingest::parse;
//! use partscout::matching::engine::SearchEngine;
//!
//! let csv = "\
//! LCSC Part Number,Manufacture Part Number,Description,Order Qty.
//! C1525,CL05B104KO5NNNC,100nF 16V X7R 0402 capacitor,200
//! C25804,0603WAF1002T5E,10kOhm 1% 0603 resistor,100
//! ";
//! let records = parse(csv, "LCSC_Exported__20240305101112.csv");
//!
//! let engine = SearchEngine::new(&records);
//! let hits = engine.search("0.1uf");
//! assert_eq!(hits[0].record.part_number, "C1525");
//! ```
//!
//! ## Modules
//!
//! - [`catalog`]: Inventory store, persistence and service hooks
//! - [`core`]: Records, source and tag types
//! - [`matching`]: Search engine and unit expansion
//! - [`parsing`]: CSV tokenizer, export detection and row normalization
//! - [`cli`]: Command-line interface implementation
//! - [`web`]: HTTP backend

pub mod catalog;
pub mod cli;
pub mod core;
pub mod matching;
pub mod parsing;
pub mod utils;
pub mod web;

// Re-export commonly used types for convenience
pub use catalog::service::{InventoryHooks, InventoryService};
pub use catalog::store::InventoryStore;
pub use core::record::{InventoryRecord, ManualEntry};
pub use core::tags::{Tag, TagSet};
pub use core::types::*;
pub use matching::engine::{SearchEngine, SearchHit};
