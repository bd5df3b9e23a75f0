//! In-memory rule store.
//!
//! Volatile backend used for tests, scratch sessions, and hosts that
//! manage persistence themselves.

use crate::store::RuleStore;
use crate::types::{Rule, StoreError, Term};
use std::collections::BTreeSet;

/// A rule store held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    rules: Vec<Rule>,
    known_facts: BTreeSet<Term>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with rules, registering their
    /// conditions as known facts.
    #[must_use]
    pub fn with_rules(rules: Vec<Rule>) -> Self {
        let known_facts = rules
            .iter()
            .flat_map(|r| r.conditions.iter().cloned())
            .collect();
        Self { rules, known_facts }
    }
}

impl RuleStore for MemoryStore {
    fn load_rules(&self) -> Result<Vec<Rule>, StoreError> {
        Ok(self.rules.clone())
    }

    fn save_rules(&mut self, rules: &[Rule]) -> Result<(), StoreError> {
        self.rules = rules.to_vec();
        Ok(())
    }

    fn load_known_facts(&self) -> Result<BTreeSet<Term>, StoreError> {
        Ok(self.known_facts.clone())
    }

    fn add_known_fact(&mut self, fact: Term) -> Result<(), StoreError> {
        self.known_facts.insert(fact);
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
