use clap::Args;

use crate::catalog::persistence::PersistenceConfig;
use crate::catalog::service::InventoryHooks;
use crate::catalog::store::BULK_VIEW_LIMIT;
use crate::cli::{block_on, open_service, print_notices, OutputFormat};
use crate::core::types::RecordId;

#[derive(Args)]
pub struct LocateArgs {
    /// Item ID (see `partscout list`)
    #[arg(required = true)]
    pub id: String,

    /// Storage location; an empty string unassigns the item
    #[arg(required = true)]
    pub location: String,
}

#[derive(Args)]
#[command(group(
    clap::ArgGroup::new("targets")
        .required(true)
        .args(["ids", "unassigned"]),
))]
pub struct BulkLocateArgs {
    /// Storage location to assign
    #[arg(required = true)]
    pub location: String,

    /// Item IDs to update
    #[arg(long, num_args = 1..)]
    pub ids: Vec<String>,

    /// Update every item that has no location yet
    #[arg(long)]
    pub unassigned: bool,
}

/// Execute locate subcommand
///
/// # Errors
///
/// Returns an error for an unknown ID or if the inventory cannot be loaded or
/// saved.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(
    args: LocateArgs,
    config: PersistenceConfig,
    format: OutputFormat,
    verbose: bool,
) -> anyhow::Result<()> {
    let id = RecordId::new(args.id.trim());
    let (record, notices) = block_on(async {
        let mut service = open_service(config, verbose).await?;
        let notices = service.on_location_edit(&id, &args.location).await?;
        let record = service
            .store()
            .get(&id)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("Item {id} disappeared after update"))?;
        Ok((record, notices))
    })?;

    match format {
        OutputFormat::Text => {
            print_notices(&notices);
            if record.is_unassigned() {
                println!("{}: location cleared", record.display_title());
            } else {
                println!("{}: {}", record.display_title(), record.location);
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&record)?),
        OutputFormat::Tsv => {
            println!("id\tlocation");
            println!("{}\t{}", record.id, record.location);
        }
    }

    Ok(())
}

/// Execute bulk-locate subcommand
///
/// # Errors
///
/// Returns an error for an empty location, when no item matches, or if the
/// inventory cannot be loaded or saved.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run_bulk(
    args: BulkLocateArgs,
    config: PersistenceConfig,
    format: OutputFormat,
    verbose: bool,
) -> anyhow::Result<()> {
    let (updated, hidden, notices) = block_on(async {
        let mut service = open_service(config, verbose).await?;

        let (ids, hidden) = if args.unassigned {
            let view = service.store().bulk_candidates(true, BULK_VIEW_LIMIT);
            let ids: Vec<RecordId> = view.records.iter().map(|r| r.id.clone()).collect();
            (ids, view.hidden)
        } else {
            (args.ids.iter().map(|s| RecordId::new(s.trim())).collect(), 0)
        };

        if verbose {
            eprintln!("Assigning '{}' to {} items", args.location.trim(), ids.len());
        }

        let (updated, notices) = service.bulk_location(&ids, &args.location).await?;
        Ok((updated, hidden, notices))
    })?;

    match format {
        OutputFormat::Text => {
            print_notices(&notices);
            if hidden > 0 {
                println!("{hidden} more unassigned items were not shown; run again to continue.");
            }
        }
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "updated": updated,
                "remaining": hidden,
            }))?
        ),
        OutputFormat::Tsv => {
            println!("updated\tremaining");
            println!("{updated}\t{hidden}");
        }
    }

    Ok(())
}
