//! Command-line interface for partscout.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **import**: Import LCSC, DigiKey or generic CSV order exports
//! - **search**: Unit-aware search (`100nf` also finds `0.1uF`)
//! - **add**: Add a single item by hand
//! - **locate** / **bulk-locate**: Record where parts are stored
//! - **list**: Show the inventory, optionally only unassigned items
//! - **clear**: Remove every record
//! - **serve**: Start the HTTP backend
//!
//! ## Usage
//!
//! ```text
//! # Import vendor exports
//! partscout import LCSC_Exported__20240305101112.csv digikey_order.csv
//!
//! # Search
//! partscout search 4.7k
//!
//! # JSON output for scripting
//! partscout search 100nf --format json
//!
//! # Put every unassigned item in one drawer
//! partscout bulk-locate "Drawer A3" --unassigned
//!
//! # Share one inventory: run a backend and point other machines at it
//! partscout --db ~/parts.json serve --address 0.0.0.0 --port 5000
//! partscout --remote http://workbench:5000 search stm32
//! ```

use std::future::Future;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::catalog::persistence::{
    Persistence, PersistenceConfig, DEFAULT_CACHE_FILE, DEFAULT_REMOTE_TIMEOUT,
};
use crate::catalog::service::{InventoryService, Notice, NoticeLevel};

pub mod add;
pub mod clear;
pub mod import;
pub mod list;
pub mod locate;
pub mod search;

#[derive(Parser)]
#[command(name = "partscout")]
#[command(version)]
#[command(about = "Import, tag and search an electronic parts inventory")]
#[command(
    long_about = "partscout keeps an inventory of electronic components built from vendor order exports.\n\nIt recognizes LCSC and DigiKey CSV exports (and generic CSVs), tags parts by category, and searches with unit awareness:\n- 100nF, 0.1uF and 100000pF are the same capacitor\n- 4.7k, 4700R and 4700 ohm are the same resistor"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Inventory cache file
    #[arg(long, global = true, default_value = DEFAULT_CACHE_FILE)]
    pub db: PathBuf,

    /// Base URL of a partscout backend to load from and sync to
    #[arg(long, global = true)]
    pub remote: Option<String>,
}

impl Cli {
    /// Persistence settings from the global flags
    #[must_use]
    pub fn persistence(&self) -> PersistenceConfig {
        PersistenceConfig {
            cache_path: self.db.clone(),
            remote_url: self.remote.clone(),
            remote_timeout: DEFAULT_REMOTE_TIMEOUT,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Import vendor CSV exports
    Import(import::ImportArgs),

    /// Search the inventory
    Search(search::SearchArgs),

    /// Add an item by hand
    Add(add::AddArgs),

    /// Set the storage location of one item
    Locate(locate::LocateArgs),

    /// Set the storage location of many items
    BulkLocate(locate::BulkLocateArgs),

    /// List inventory items
    List(list::ListArgs),

    /// Remove every item
    Clear(clear::ClearArgs),

    /// Start the web server
    Serve(ServeArgs),
}

#[derive(clap::Args)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(short, long, default_value = "8080")]
    pub port: u16,

    /// Address to bind to
    #[arg(short, long, default_value = "127.0.0.1")]
    pub address: String,

    /// Open browser automatically
    #[arg(long)]
    pub open: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}

/// Drive an async command body to completion on a single-threaded runtime
pub(crate) fn block_on<T>(future: impl Future<Output = anyhow::Result<T>>) -> anyhow::Result<T> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    rt.block_on(future)
}

/// Load the inventory, reporting offline mode on stderr
pub(crate) async fn open_service(
    config: PersistenceConfig,
    verbose: bool,
) -> anyhow::Result<InventoryService> {
    let (service, notices) = InventoryService::open(Persistence::new(config)).await?;
    for notice in &notices {
        eprintln!("Warning: {notice}");
    }
    if verbose {
        eprintln!("Loaded inventory with {} items", service.store().len());
    }
    Ok(service)
}

/// Info notices go to stdout, warnings to stderr
pub(crate) fn print_notices(notices: &[Notice]) {
    for notice in notices {
        match notice.level {
            NoticeLevel::Info => println!("{notice}"),
            NoticeLevel::Warning => eprintln!("Warning: {notice}"),
        }
    }
}
