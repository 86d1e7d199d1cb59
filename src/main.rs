// src/main.rs
// =============================================================================
// This is the entry point of the link-report binary.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging
// 3. Dispatch to the subcommand: a one-shot analyze, or the HTTP server
// 4. Exit with proper code (0 = success, 2 = error)
//
// A crawl that finds broken links is still a success: the report says what
// was broken, the exit code only reflects whether we could produce it.
// =============================================================================

mod checker; // src/checker/ - per-link classification and probing
mod cli; // src/cli.rs - command-line parsing
mod crawl; // src/crawl/ - the crawl pipeline and its report
mod logging; // src/logging.rs - env_logger setup
mod server; // src/server.rs - HTTP endpoint

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logger(cli.log_level)?;

    // The probe settings are fixed; they are still handed down explicitly
    let config = checker::ProbeConfig::default();

    match cli.command {
        Commands::Analyze { url, compact } => handle_analyze(&url, compact, &config).await,
        Commands::Serve { bind } => server::serve(bind, config).await,
    }
}

// Handles the 'analyze' subcommand
async fn handle_analyze(url: &str, compact: bool, config: &checker::ProbeConfig) -> Result<()> {
    let report = crawl::analyze(url, config).await;

    let json = if compact {
        serde_json::to_string(&report)?
    } else {
        serde_json::to_string_pretty(&report)?
    };
    println!("{}", json);

    Ok(())
}
