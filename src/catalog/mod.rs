//! Inventory storage, persistence and the service facade.
//!
//! - [`store`]: the in-memory collection, id index and bulk selection
//! - [`persistence`]: atomic JSON cache file plus optional remote backend
//! - [`service`]: [`InventoryHooks`](service::InventoryHooks) implemented over
//!   store, search and persistence
//!
//! ## Persisted format
//!
//! A JSON array of records with camelCase field names:
//!
//! ```json
//! [
//!   {
//!     "id": "5f0c3c1e9f8a4f0e8b0d2a7c4e6b1d3f",
//!     "partNumber": "C25804",
//!     "mfrPart": "0603WAF1002T5E",
//!     "manufacturer": "UNI-ROYAL(Uniroyal Elec)",
//!     "description": "10kΩ ±1% 100mW Thick Film Resistor",
//!     "quantity": "1000",
//!     "orderDate": "2024-03-05",
//!     "source": "LCSC",
//!     "tags": ["Resistor"],
//!     "link": "https://www.lcsc.com/product-detail/_C25804.html",
//!     "location": "Drawer A3"
//!   }
//! ]
//! ```
//!
//! Unknown fields are ignored and records without an id get one on load.
//!
//! ## Example
//!
//! ```rust,no_run
//! use partscout::catalog::persistence::Persistence;
//! use partscout::catalog::service::{InventoryHooks, InventoryService};
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let (mut service, _notices) = InventoryService::open(Persistence::local("inventory.json")).await?;
//! let csv = std::fs::read_to_string("LCSC_Exported__20240305101112.csv")?;
//! let outcome = service.on_ingest(&csv, "LCSC_Exported__20240305101112.csv").await?;
//! println!("{}", outcome.notices[0]);
//!
//! for record in service.on_search("100nf") {
//!     println!("{} {}", record.part_number, record.description);
//! }
//! # Ok(())
//! # }
//! ```

pub mod persistence;
pub mod service;
pub mod store;
