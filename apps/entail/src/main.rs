//! # Entail - Rule Engine CLI
//!
//! The main binary for the Entail forward-chaining rule engine.
//!
//! This application owns everything the core deliberately does not:
//! configuration, logging, and the lifecycle of the rule store. The
//! core only ever sees an opened store handle and in-memory snapshots.
//!
//! ## Usage
//!
//! ```bash
//! # Initialize a database with the stock rule base
//! entail init
//!
//! # Edit rules
//! entail add-rule --conditions "fever, cough, fatigue" --conclusion flu
//! entail delete-rule 3
//! entail rules
//!
//! # Run inference over observed facts
//! entail infer "fever, cough, fatigue"
//! ```

mod cli;
mod config;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

fn main() {
    // Initialize tracing — ENTAIL_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("ENTAIL_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let cli = cli::Cli::parse();

    let default_filter = if cli.verbose {
        "entail=debug"
    } else {
        "entail=info"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }

    // Display startup banner
    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    // Execute command
    if let Err(e) = cli::execute(cli) {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the Entail startup banner.
fn print_banner() {
    println!(
        r#"
  Entail v{} — forward-chaining rule engine

  If conditions hold → conclusions follow
"#,
        env!("CARGO_PKG_VERSION")
    );
}
