use clap::Parser;
use tracing_subscriber::EnvFilter;

mod catalog;
mod cli;
mod core;
mod matching;
mod parsing;
mod utils;
mod web;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("partscout=debug,info")
    } else {
        EnvFilter::new("partscout=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let persistence = cli.persistence();

    match cli.command {
        cli::Commands::Import(args) => {
            cli::import::run(args, persistence, cli.format, cli.verbose)?;
        }
        cli::Commands::Search(args) => {
            cli::search::run(args, persistence, cli.format, cli.verbose)?;
        }
        cli::Commands::Add(args) => {
            cli::add::run(args, persistence, cli.format, cli.verbose)?;
        }
        cli::Commands::Locate(args) => {
            cli::locate::run(args, persistence, cli.format, cli.verbose)?;
        }
        cli::Commands::BulkLocate(args) => {
            cli::locate::run_bulk(args, persistence, cli.format, cli.verbose)?;
        }
        cli::Commands::List(args) => {
            cli::list::run(args, persistence, cli.format, cli.verbose)?;
        }
        cli::Commands::Clear(args) => {
            cli::clear::run(args, persistence, cli.format, cli.verbose)?;
        }
        cli::Commands::Serve(args) => {
            web::server::run(args, persistence)?;
        }
    }

    Ok(())
}
