//! HTTP backend for the inventory.
//!
//! Serves the inventory as JSON so browsers and other `partscout` instances
//! (via `--remote`) can share one collection.
//!
//! ## Starting the Server
//!
//! ```text
//! # Start on default port 8080
//! partscout serve
//!
//! # Custom database file and port, open a browser
//! partscout --db ~/parts/inventory.json serve --port 5000 --open
//!
//! # Bind to all interfaces
//! partscout serve --address 0.0.0.0
//! ```
//!
//! ## API Endpoints
//!
//! - `GET /api/inventory` - Full inventory as a JSON array
//! - `POST /api/inventory` - Replace the inventory with the posted array
//! - `DELETE /api/inventory` - Remove every record
//! - `POST /api/inventory/items` - Add one item by hand
//! - `PUT /api/inventory/{id}/location` - Set one record's location
//! - `GET /api/inventory/bulk?unassigned=true` - Records offered for bulk editing
//! - `POST /api/inventory/bulk-location` - Set the location of many records
//! - `GET /api/search?q=100nf` - Ranked search, or a random sample for a blank query
//! - `POST /api/import` - Import CSV exports (multipart `file` fields)

pub mod server;
