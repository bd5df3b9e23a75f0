//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use crate::config::AppConfig;
use entail_core::{
    EngineError, KnowledgeBase, PartialMatchOptions, Rule, RuleId, Term,
};
use std::path::{Path, PathBuf};

/// Database path used when neither `--database` nor the config file
/// names one.
const DEFAULT_DATABASE: &str = "entail.db";

/// Resolved settings shared by every command.
#[derive(Debug)]
pub struct CommandContext {
    database: PathBuf,
    config: AppConfig,
    json_mode: bool,
}

impl CommandContext {
    /// Resolve configuration and database path.
    ///
    /// Precedence for the database path: `--database` flag, then the
    /// config file, then [`DEFAULT_DATABASE`].
    pub fn resolve(
        database: Option<PathBuf>,
        config_path: Option<&Path>,
        json_mode: bool,
    ) -> Result<Self, EngineError> {
        let config = AppConfig::resolve(config_path)?;
        let database = database
            .or_else(|| config.database.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE));
        Ok(Self {
            database,
            config,
            json_mode,
        })
    }

    fn open(&self) -> Result<KnowledgeBase, EngineError> {
        tracing::debug!(database = %self.database.display(), "opening rule database");
        KnowledgeBase::open(&self.database, self.config.policy)
    }
}

// =============================================================================
// INIT COMMAND
// =============================================================================

/// Create the database and seed the stock rule base when empty.
pub fn cmd_init(ctx: &CommandContext) -> Result<(), EngineError> {
    let mut kb = ctx.open()?;
    let seeded = kb.seed_defaults()?;
    let total = kb.rules()?.len();

    tracing::info!(seeded, total, "database initialized");

    if ctx.json_mode {
        print_json(&serde_json::json!({
            "database": ctx.database.to_string_lossy(),
            "seeded": seeded,
            "rules": total,
        }));
    } else if seeded > 0 {
        println!(
            "Initialized {} with {} stock rules",
            ctx.database.display(),
            seeded
        );
    } else {
        println!(
            "Database {} already holds {} rules; nothing seeded",
            ctx.database.display(),
            total
        );
    }
    Ok(())
}

// =============================================================================
// RULE EDITING COMMANDS
// =============================================================================

/// Validate and store a new rule.
pub fn cmd_add_rule(
    ctx: &CommandContext,
    conditions: &str,
    conclusion: &str,
) -> Result<(), EngineError> {
    let mut kb = ctx.open()?;
    let rule = kb.add_rule(conditions, conclusion)?;

    tracing::info!(id = rule.id.0, "rule added");

    if ctx.json_mode {
        print_json(&rule_json(&rule));
    } else {
        println!("Added {}", render_rule(&rule));
    }
    Ok(())
}

/// Delete a rule by identifier.
pub fn cmd_delete_rule(ctx: &CommandContext, id: u64) -> Result<(), EngineError> {
    let mut kb = ctx.open()?;
    kb.delete_rule(RuleId(id))?;

    tracing::info!(id, "rule deleted");

    if ctx.json_mode {
        print_json(&serde_json::json!({ "deleted": id }));
    } else {
        println!("Deleted rule R{}", id);
    }
    Ok(())
}

/// List the stored rules.
pub fn cmd_rules(ctx: &CommandContext) -> Result<(), EngineError> {
    let kb = ctx.open()?;
    let rules = kb.rules()?;

    if ctx.json_mode {
        let items: Vec<serde_json::Value> = rules.iter().map(rule_json).collect();
        print_json(&serde_json::json!({ "rules": items }));
    } else if rules.is_empty() {
        println!("No rules stored. Run 'entail init' to seed the stock rule base.");
    } else {
        for rule in &rules {
            println!("{}", render_rule(rule));
        }
    }
    Ok(())
}

/// List the known-facts index.
pub fn cmd_facts(ctx: &CommandContext) -> Result<(), EngineError> {
    let kb = ctx.open()?;
    let facts = kb.known_facts()?;

    if ctx.json_mode {
        let items: Vec<&str> = facts.iter().map(Term::as_str).collect();
        print_json(&serde_json::json!({ "facts": items }));
    } else if facts.is_empty() {
        println!("No known facts registered.");
    } else {
        for fact in &facts {
            println!("{}", fact);
        }
    }
    Ok(())
}

/// Register a known fact.
pub fn cmd_add_fact(ctx: &CommandContext, fact: &str) -> Result<(), EngineError> {
    let mut kb = ctx.open()?;
    let term = kb.add_known_fact(fact)?;

    if ctx.json_mode {
        print_json(&serde_json::json!({ "fact": term.as_str() }));
    } else {
        println!("Registered fact '{}'", term);
    }
    Ok(())
}

// =============================================================================
// INFER COMMAND
// =============================================================================

/// Run forward chaining over observed facts.
pub fn cmd_infer(
    ctx: &CommandContext,
    facts: &str,
    min_percent: u8,
    per_rule: bool,
) -> Result<(), EngineError> {
    let kb = ctx.open()?;
    let options = PartialMatchOptions {
        min_percent,
        per_rule,
    };
    let report = kb.infer_with(facts, &options)?;

    if ctx.json_mode {
        // Full match: conclusions + explanation. Otherwise: ranked
        // probabilities. Mirrors the logical output shape of the engine.
        let output = if report.conclusions.is_empty() {
            let probabilities: Vec<serde_json::Value> = report
                .partial
                .iter()
                .map(|m| {
                    serde_json::json!({
                        "conclusion": m.conclusion.as_str(),
                        "percent": m.percent,
                    })
                })
                .collect();
            serde_json::json!({
                "conclusions": [],
                "probabilities": probabilities,
            })
        } else {
            let conclusions: Vec<&str> =
                report.conclusions.iter().map(Term::as_str).collect();
            serde_json::json!({
                "conclusions": conclusions,
                "explanation": report.explanations,
            })
        };
        print_json(&output);
        return Ok(());
    }

    if report.conclusions.is_empty() {
        if report.partial.is_empty() {
            println!("No conclusions could be derived.");
        } else {
            println!("No rule fired completely. Closest matches:");
            for m in &report.partial {
                println!("  {:>3}%  {}", m.percent, m.conclusion);
            }
        }
    } else {
        println!("Conclusions:");
        for conclusion in &report.conclusions {
            println!("  {}", conclusion);
        }
        println!();
        println!("Explanation:");
        for step in &report.explanations {
            println!("  {}", step);
        }
    }
    Ok(())
}

// =============================================================================
// RENDERING HELPERS
// =============================================================================

fn render_rule(rule: &Rule) -> String {
    let conditions = rule
        .conditions
        .iter()
        .map(Term::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    format!("R{}: If {} → then {}", rule.id, conditions, rule.conclusion)
}

fn rule_json(rule: &Rule) -> serde_json::Value {
    let conditions: Vec<&str> = rule.conditions.iter().map(Term::as_str).collect();
    serde_json::json!({
        "id": rule.id.0,
        "conditions": conditions,
        "conclusion": rule.conclusion.as_str(),
    })
}

fn print_json(value: &serde_json::Value) {
    match serde_json::to_string_pretty(value) {
        Ok(rendered) => println!("{}", rendered),
        Err(e) => tracing::error!("failed to render JSON output: {}", e),
    }
}
