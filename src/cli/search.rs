use clap::Args;

use crate::catalog::persistence::PersistenceConfig;
use crate::catalog::service::InventoryHooks;
use crate::cli::list::print_records;
use crate::cli::{block_on, open_service, OutputFormat};
use crate::matching::engine::{SearchConfig, DEFAULT_RESULT_LIMIT};
use crate::matching::expansion::expand_term;

#[derive(Args)]
pub struct SearchArgs {
    /// Search text; words are joined with spaces. Omit for a random sample.
    pub query: Vec<String>,

    /// Maximum number of results
    #[arg(short = 'n', long, default_value_t = DEFAULT_RESULT_LIMIT)]
    pub limit: usize,
}

/// Execute search subcommand
///
/// # Errors
///
/// Returns an error if the inventory cannot be loaded.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(
    args: SearchArgs,
    config: PersistenceConfig,
    format: OutputFormat,
    verbose: bool,
) -> anyhow::Result<()> {
    let query = args.query.join(" ");
    let service = block_on(open_service(config, verbose))?.with_search_config(SearchConfig {
        result_limit: args.limit,
        sample_limit: args.limit,
    });

    if verbose && !query.trim().is_empty() {
        let variants: Vec<String> = expand_term(&query).into_iter().collect();
        eprintln!("Matching any of: {}", variants.join(", "));
    }

    let results = service.on_search(&query);
    let refs: Vec<_> = results.iter().collect();

    if verbose {
        eprintln!("{} results", refs.len());
    }

    print_records(&refs, format)
}
