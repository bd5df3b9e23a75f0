//! # Entail CLI Module
//!
//! This module implements the CLI interface for Entail.
//!
//! ## Available Commands
//!
//! - `init` - Initialize the rule database (and seed the stock rules)
//! - `add-rule` - Validate and store a new rule
//! - `delete-rule` - Remove a rule by identifier
//! - `rules` - List the stored rules
//! - `facts` - List the known-facts index
//! - `add-fact` - Register a known fact
//! - `infer` - Run forward chaining over observed facts

mod commands;

use clap::{Parser, Subcommand};
use entail_core::EngineError;
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Entail - forward-chaining rule engine
///
/// Stores IF → THEN rules, derives every conclusion reachable from
/// observed facts, and ranks partial matches when nothing fires.
#[derive(Parser, Debug)]
#[command(name = "entail")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to the rule database (overrides the config file)
    #[arg(short = 'D', long, global = true)]
    pub database: Option<PathBuf>,

    /// Path to a TOML config file (default: ./entail.toml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize the database, seeding the stock rule base when empty
    Init,

    /// Validate and store a new rule
    AddRule {
        /// Comma-separated condition terms
        #[arg(short = 'i', long)]
        conditions: String,

        /// Conclusion term
        #[arg(short = 't', long)]
        conclusion: String,
    },

    /// Delete a rule by identifier
    DeleteRule {
        /// The rule identifier to remove
        id: u64,
    },

    /// List the stored rules
    Rules,

    /// List the known-facts index
    Facts,

    /// Register a known fact
    AddFact {
        /// The fact term to register
        fact: String,
    },

    /// Run inference over observed facts
    Infer {
        /// Comma-separated observed facts
        facts: String,

        /// Minimum partial-match percentage to report
        #[arg(long, default_value = "30")]
        min_percent: u8,

        /// Report one partial entry per matching rule instead of
        /// keeping the best percentage per conclusion
        #[arg(long)]
        per_rule: bool,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub fn execute(cli: Cli) -> Result<(), EngineError> {
    let ctx = CommandContext::resolve(cli.database, cli.config.as_deref(), cli.json_mode)?;

    match cli.command {
        Some(Commands::Init) => cmd_init(&ctx),
        Some(Commands::AddRule {
            conditions,
            conclusion,
        }) => cmd_add_rule(&ctx, &conditions, &conclusion),
        Some(Commands::DeleteRule { id }) => cmd_delete_rule(&ctx, id),
        Some(Commands::Rules) => cmd_rules(&ctx),
        Some(Commands::Facts) => cmd_facts(&ctx),
        Some(Commands::AddFact { fact }) => cmd_add_fact(&ctx, &fact),
        Some(Commands::Infer {
            facts,
            min_percent,
            per_rule,
        }) => cmd_infer(&ctx, &facts, min_percent, per_rule),
        None => {
            // No subcommand - list the rule base by default
            cmd_rules(&ctx)
        }
    }
}
