use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use crate::catalog::persistence::PersistenceConfig;
use crate::catalog::service::{IngestOutcome, InventoryHooks};
use crate::cli::{block_on, open_service, print_notices, OutputFormat};

#[derive(Args)]
pub struct ImportArgs {
    /// CSV exports from LCSC, DigiKey or any parts list
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

/// Execute import subcommand
///
/// # Errors
///
/// Returns an error if a file cannot be read or the inventory cannot be
/// loaded or saved.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(
    args: ImportArgs,
    config: PersistenceConfig,
    format: OutputFormat,
    verbose: bool,
) -> anyhow::Result<()> {
    let outcomes = block_on(async {
        let mut service = open_service(config, verbose).await?;
        let mut outcomes = Vec::with_capacity(args.files.len());

        for path in &args.files {
            let bytes =
                std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
            let text = String::from_utf8_lossy(&bytes).into_owned();
            let filename = path
                .file_name()
                .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());

            if verbose {
                eprintln!("Parsing {} ({} bytes)", path.display(), text.len());
            }
            outcomes.push(service.on_ingest(&text, &filename).await?);
        }

        if verbose {
            eprintln!("Inventory now holds {} items", service.store().len());
        }
        Ok(outcomes)
    })?;

    match format {
        OutputFormat::Text => {
            for outcome in &outcomes {
                print_notices(&outcome.notices);
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&outcomes)?),
        OutputFormat::Tsv => print_tsv_outcomes(&outcomes),
    }

    Ok(())
}

fn print_tsv_outcomes(outcomes: &[IngestOutcome]) {
    println!("file\tsource\timported");
    for o in outcomes {
        println!("{}\t{}\t{}", o.filename, o.source, o.imported);
    }
}
