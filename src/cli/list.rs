use clap::Args;

use crate::catalog::persistence::PersistenceConfig;
use crate::cli::{block_on, open_service, OutputFormat};
use crate::core::record::InventoryRecord;

#[derive(Args)]
pub struct ListArgs {
    /// Only items without a storage location
    #[arg(long)]
    pub unassigned: bool,

    /// Maximum number of items to show
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,
}

/// Execute list subcommand
///
/// # Errors
///
/// Returns an error if the inventory cannot be loaded.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(
    args: ListArgs,
    config: PersistenceConfig,
    format: OutputFormat,
    verbose: bool,
) -> anyhow::Result<()> {
    let service = block_on(open_service(config, verbose))?;

    let records: Vec<&InventoryRecord> = service
        .store()
        .records()
        .iter()
        .filter(|r| !args.unassigned || r.is_unassigned())
        .collect();
    let total = records.len();
    let shown: Vec<&InventoryRecord> = records
        .into_iter()
        .take(args.limit.unwrap_or(usize::MAX))
        .collect();

    if verbose && shown.len() < total {
        eprintln!("Showing {} of {total} items", shown.len());
    }

    print_records(&shown, format)
}

/// Print records in the requested format
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn print_records(records: &[&InventoryRecord], format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => print_text_records(records),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(records)?),
        OutputFormat::Tsv => print_tsv_records(records),
    }
    Ok(())
}

fn print_text_records(records: &[&InventoryRecord]) {
    if records.is_empty() {
        println!("No items found.");
        return;
    }

    for (i, record) in records.iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!("#{} {} [{}]", i + 1, record.display_title(), record.source);
        if !record.description.is_empty() {
            println!("   {}", record.description);
        }
        println!(
            "   Part: {}   Qty: {}   Ordered: {}",
            or_dash(&record.part_number),
            or_dash(&record.quantity),
            record.order_date.as_deref().unwrap_or("-"),
        );
        if !record.tags.is_empty() {
            println!("   Tags: {}", record.tag_line());
        }
        if record.is_unassigned() {
            println!("   Location: (unassigned)");
        } else {
            println!("   Location: {}", record.location);
        }
        println!("   ID: {}", record.id);
        if !record.link.is_empty() {
            println!("   Link: {}", record.link);
        }
    }
}

fn print_tsv_records(records: &[&InventoryRecord]) {
    println!(
        "id\tpart_number\tmfr_part\tmanufacturer\tdescription\tquantity\torder_date\tsource\ttags\tlocation\tlink"
    );
    for r in records {
        println!(
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            r.id,
            tsv_cell(&r.part_number),
            tsv_cell(&r.mfr_part),
            tsv_cell(&r.manufacturer),
            tsv_cell(&r.description),
            r.quantity,
            r.order_date.as_deref().unwrap_or(""),
            r.source,
            r.tags
                .iter()
                .map(|t| t.label())
                .collect::<Vec<_>>()
                .join(","),
            tsv_cell(&r.location),
            r.link,
        );
    }
}

fn or_dash(s: &str) -> &str {
    if s.is_empty() {
        "-"
    } else {
        s
    }
}

/// Tabs and line breaks would split the row
fn tsv_cell(s: &str) -> String {
    s.replace(['\t', '\n', '\r'], " ")
}
