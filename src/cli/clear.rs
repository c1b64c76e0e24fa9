use clap::Args;

use crate::catalog::persistence::PersistenceConfig;
use crate::cli::{block_on, open_service, print_notices, OutputFormat};

#[derive(Args)]
pub struct ClearArgs {
    /// Confirm removing every item
    #[arg(long)]
    pub yes: bool,
}

/// Execute clear subcommand
///
/// # Errors
///
/// Returns an error without `--yes`, or if the inventory cannot be loaded or
/// saved.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(
    args: ClearArgs,
    config: PersistenceConfig,
    format: OutputFormat,
    verbose: bool,
) -> anyhow::Result<()> {
    if !args.yes {
        anyhow::bail!("Refusing to delete all data without --yes");
    }

    let (removed, notices) = block_on(async {
        let mut service = open_service(config, verbose).await?;
        let removed = service.store().len();
        let notices = service.clear().await;
        Ok((removed, notices))
    })?;

    match format {
        OutputFormat::Text => print_notices(&notices),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({ "removed": removed }))?
        ),
        OutputFormat::Tsv => {
            println!("removed");
            println!("{removed}");
        }
    }

    Ok(())
}
