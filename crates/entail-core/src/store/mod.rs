//! # Rule Store
//!
//! The persistence contract for rules and the known-facts convenience
//! index, plus the two built-in backends:
//!
//! - [`MemoryStore`] — volatile, for tests and scratch sessions
//! - [`RedbStore`] — redb-backed ACID storage
//!
//! The core treats every store call as atomic: a reader never observes
//! a partial write. Concurrent mutation of one store instance must be
//! serialized by the host; the core takes no locks of its own.

mod memory;
mod redb_store;

pub use memory::MemoryStore;
pub use redb_store::RedbStore;

use crate::editor::RuleEditor;
use crate::types::{EngineError, Rule, StoreError, Term};
use std::collections::BTreeSet;

/// Persistence contract required by the knowledge base.
///
/// Implementations own the storage technology; the core only demands
/// an ordered rule sequence and a set-like known-facts index.
pub trait RuleStore {
    /// Load the full rule sequence in stored order.
    fn load_rules(&self) -> Result<Vec<Rule>, StoreError>;

    /// Replace the stored rule sequence.
    fn save_rules(&mut self, rules: &[Rule]) -> Result<(), StoreError>;

    /// Load the known-facts index.
    fn load_known_facts(&self) -> Result<BTreeSet<Term>, StoreError>;

    /// Register a term in the known-facts index.
    /// Adding an already-known fact is a no-op, not an error.
    fn add_known_fact(&mut self, fact: Term) -> Result<(), StoreError>;
}

// =============================================================================
// DEFAULT RULE BASE
// =============================================================================

/// The stock rule base installed into an empty store.
///
/// Condition lists are comma-separated; all terms pass the default
/// [`TermPolicy`](crate::policy::TermPolicy).
const DEFAULT_RULES: &[(&str, &str)] = &[
    ("fever, cough, fatigue", "flu"),
    ("fever, headache, nausea", "dengue"),
    ("cough, shortness of breath", "asthma"),
    ("sneezing, runny nose, itchy eyes", "allergy"),
    ("fever, sore throat", "throat infection"),
];

/// Seed an empty store with the stock rule base.
///
/// Does nothing when the store already holds rules. Conditions of the
/// seeded rules are registered as known facts, the same way the editor
/// registers them for user-added rules. Returns the number of rules
/// installed.
pub fn seed_default_rules(
    store: &mut dyn RuleStore,
    editor: &RuleEditor,
) -> Result<usize, EngineError> {
    if !store.load_rules()?.is_empty() {
        return Ok(0);
    }

    let mut rules = Vec::with_capacity(DEFAULT_RULES.len());
    for (conditions, conclusion) in DEFAULT_RULES {
        editor.add_rule(&mut rules, conditions, conclusion)?;
    }
    store.save_rules(&rules)?;

    for rule in &rules {
        for condition in &rule.conditions {
            store.add_known_fact(condition.clone())?;
        }
    }
    Ok(rules.len())
}

// =============================================================================
// TESTS
// =============================================================================
