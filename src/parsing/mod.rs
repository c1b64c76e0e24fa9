//! Ingest of vendor order exports.
//!
//! - [`csv`]: quote-aware tokenizer producing trimmed cells
//! - [`schema`]: vendor signatures and header-to-field column mapping
//! - [`ingest`]: row normalization into [`InventoryRecord`](crate::core::record::InventoryRecord)s
//!
//! ## Recognized exports
//!
//! | Vendor | Signature header | Body fallback |
//! |--------|------------------|---------------|
//! | LCSC   | contains `lcscpart` | `LCSC Part #` |
//! | DigiKey | contains `digikeypart` | `Digi-Key Part Number` |
//!
//! Anything else is imported as source `Unknown` using generic column names
//! (`part number`, `manufacturer`, `description`, `quantity`, any date-like
//! header).
//!
//! ## Example
//!
//! ```rust
//! use partscout::parsing::ingest::parse;
//!
//! let csv = "Digi-Key Part Number,Quantity,Description\n296-1395-5-ND,10,555 timer\n";
//! let records = parse(csv, "digikey_20231130.csv");
//! assert_eq!(records[0].source.as_str(), "DigiKey");
//! ```

pub mod csv;
pub mod ingest;
pub mod schema;
