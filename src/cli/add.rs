use clap::Args;

use crate::catalog::persistence::PersistenceConfig;
use crate::cli::list::print_records;
use crate::cli::{block_on, open_service, print_notices, OutputFormat};
use crate::core::record::ManualEntry;

#[derive(Args)]
pub struct AddArgs {
    /// Part number (also used as the manufacturer part)
    #[arg(long = "part", default_value = "")]
    pub part_number: String,

    #[arg(long, default_value = "")]
    pub manufacturer: String,

    #[arg(long, default_value = "")]
    pub description: String,

    #[arg(long, default_value = "")]
    pub quantity: String,

    /// Storage location
    #[arg(long, default_value = "")]
    pub location: String,

    /// Product page URL
    #[arg(long, default_value = "")]
    pub link: String,

    /// Where the part came from (e.g. "LCSC", "Mouser")
    #[arg(long, default_value = "")]
    pub source: String,
}

impl From<AddArgs> for ManualEntry {
    fn from(args: AddArgs) -> Self {
        Self {
            source: args.source,
            part_number: args.part_number,
            manufacturer: args.manufacturer,
            description: args.description,
            quantity: args.quantity,
            location: args.location,
            link: args.link,
        }
    }
}

/// Execute add subcommand
///
/// # Errors
///
/// Returns an error if neither a part number nor a description is given, or
/// the inventory cannot be loaded or saved.
pub fn run(
    args: AddArgs,
    config: PersistenceConfig,
    format: OutputFormat,
    verbose: bool,
) -> anyhow::Result<()> {
    let (record, notices) = block_on(async {
        let mut service = open_service(config, verbose).await?;
        Ok(service.add_manual(args.into()).await?)
    })?;

    match format {
        OutputFormat::Text => {
            print_notices(&notices);
            println!("ID: {}", record.id);
            if !record.tags.is_empty() {
                println!("Tags: {}", record.tag_line());
            }
        }
        OutputFormat::Json | OutputFormat::Tsv => print_records(&[&record], format)?,
    }

    Ok(())
}
