//! verokone - Tax-income lookups for a list of names
//!
//! Reads names from a file, resolves each through the local response cache or
//! the query service, and prints one summary line per name. Names that fail
//! are reported on stderr and the run carries on.

use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use verokone::cli::Cli;
use verokone::{read_names, report, CacheManager, TaxInfoClient};

/// Sets up diagnostics on stderr, quiet unless `RUST_LOG` asks for more
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    // Startup errors surface here, before any request is made
    let names = read_names(&cli.names)?;
    let cache = CacheManager::with_dir(cli.cache_dir);
    let client = TaxInfoClient::with_endpoint(&cli.endpoint, cache)?;

    let summary = report(&client, &names, &mut io::stdout(), &mut io::stderr()).await?;
    info!(
        resolved = summary.resolved,
        failed = summary.failed,
        "lookups finished"
    );

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
