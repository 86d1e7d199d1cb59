// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Two subcommands:
// - analyze: crawl one URL and print the JSON report
// - serve: expose the same operation over HTTP (GET /?url=...)
// =============================================================================

use clap::{Parser, Subcommand};
use std::net::SocketAddr;

use crate::logging::LogLevel;

#[derive(Parser, Debug)]
#[command(
    name = "link-report",
    version = "0.1.0",
    about = "Fetch a page, classify its links and check that each one is reachable",
    long_about = "link-report fetches a root URL, splits the links on it into internal \
                  (same origin) and external ones, and probes every link for its status, \
                  redirects, HTTPS use and (for internal pages) text length."
)]
pub struct Cli {
    /// Log verbosity; overrides the default level from RUST_LOG (warn if neither is set)
    #[arg(long, value_enum, global = true)]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Crawl a single URL and print its link report as JSON
    ///
    /// Example: link-report analyze https://example.com
    Analyze {
        /// Root URL to analyze (e.g., https://example.com)
        url: String,

        /// Print the JSON on a single line instead of pretty-printing it
        #[arg(long)]
        compact: bool,
    },

    /// Serve the analyze operation over HTTP
    ///
    /// Example: link-report serve --bind 0.0.0.0:8000
    /// then: curl 'http://localhost:8000/?url=https://example.com'
    Serve {
        /// Address to listen on
        #[arg(long, default_value = "127.0.0.1:8000")]
        bind: SocketAddr,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_analyze() {
        let cli = Cli::try_parse_from(["link-report", "analyze", "https://example.com"]).unwrap();
        assert_eq!(cli.log_level, None);
        match cli.command {
            Commands::Analyze { url, compact } => {
                assert_eq!(url, "https://example.com");
                assert!(!compact);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_serve_with_global_flag() {
        let cli = Cli::try_parse_from(["link-report", "serve", "--bind", "0.0.0.0:9000", "--log-level", "debug"])
            .unwrap();
        assert_eq!(cli.log_level, Some(LogLevel::Debug));
        match cli.command {
            Commands::Serve { bind } => assert_eq!(bind.port(), 9000),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_serve_default_bind() {
        let cli = Cli::try_parse_from(["link-report", "serve"]).unwrap();
        match cli.command {
            Commands::Serve { bind } => assert_eq!(bind.to_string(), "127.0.0.1:8000"),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_analyze_requires_url() {
        assert!(Cli::try_parse_from(["link-report", "analyze"]).is_err());
    }
}
