//! # Knowledge Base
//!
//! High-level session combining a storage backend with the rule
//! editor and the inference engine.
//!
//! Every inference call re-reads the current rule set from the store:
//! nothing is cached across calls, so an edit made through one handle
//! is visible to the next inference through another handle on the same
//! store. The knowledge base assumes at most one mutator at a time per
//! store; serializing concurrent mutation is the host's job.

use crate::editor::RuleEditor;
use crate::engine::{self, InferenceReport, PartialMatchOptions};
use crate::policy::{self, TermPolicy};
use crate::store::{MemoryStore, RedbStore, RuleStore, seed_default_rules};
use crate::types::{EngineError, Rule, RuleId, Term};
use std::collections::BTreeSet;
use std::path::Path;

/// Storage backend for a knowledge base.
#[derive(Debug)]
pub enum StorageBackend {
    /// In-memory store (fast, volatile).
    InMemory(MemoryStore),
    /// Disk-backed store using redb (ACID, persistent).
    Persistent(RedbStore),
}

impl Default for StorageBackend {
    fn default() -> Self {
        Self::InMemory(MemoryStore::new())
    }
}

// NOTE: StorageBackend does NOT implement Clone.
// RedbStore (database handle) cannot be safely cloned; open a second
// handle on the same path instead.

/// A rule base plus the policy used to edit it.
#[derive(Debug, Default)]
pub struct KnowledgeBase {
    backend: StorageBackend,
    editor: RuleEditor,
}

impl KnowledgeBase {
    /// Create an empty in-memory knowledge base with the default policy.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Create an in-memory knowledge base with a custom policy.
    #[must_use]
    pub fn in_memory_with_policy(policy: TermPolicy) -> Self {
        Self {
            backend: StorageBackend::default(),
            editor: RuleEditor::new(policy),
        }
    }

    /// Open (or create) a persistent knowledge base at the given path.
    pub fn open(path: impl AsRef<Path>, policy: TermPolicy) -> Result<Self, EngineError> {
        let store = RedbStore::open(path)?;
        Ok(Self {
            backend: StorageBackend::Persistent(store),
            editor: RuleEditor::new(policy),
        })
    }

    /// Wrap an existing backend with the given policy.
    #[must_use]
    pub fn with_backend(backend: StorageBackend, policy: TermPolicy) -> Self {
        Self {
            backend,
            editor: RuleEditor::new(policy),
        }
    }

    /// Check if using persistent storage.
    #[must_use]
    pub fn is_persistent(&self) -> bool {
        matches!(self.backend, StorageBackend::Persistent(_))
    }

    /// The policy rules and facts are validated against.
    #[must_use]
    pub const fn policy(&self) -> &TermPolicy {
        self.editor.policy()
    }

    fn store(&self) -> &dyn RuleStore {
        match &self.backend {
            StorageBackend::InMemory(s) => s,
            StorageBackend::Persistent(s) => s,
        }
    }

    fn store_mut(&mut self) -> &mut dyn RuleStore {
        match &mut self.backend {
            StorageBackend::InMemory(s) => s,
            StorageBackend::Persistent(s) => s,
        }
    }

    // =========================================================================
    // RULE EDITING
    // =========================================================================

    /// Snapshot of the current rule sequence, in stored order.
    pub fn rules(&self) -> Result<Vec<Rule>, EngineError> {
        Ok(self.store().load_rules()?)
    }

    /// Snapshot of the known-facts index.
    pub fn known_facts(&self) -> Result<BTreeSet<Term>, EngineError> {
        Ok(self.store().load_known_facts()?)
    }

    /// Validate and persist a new rule.
    ///
    /// On success the accepted condition terms are also registered in
    /// the known-facts index (idempotently) and the new rule returned.
    pub fn add_rule(
        &mut self,
        conditions_raw: &str,
        conclusion_raw: &str,
    ) -> Result<Rule, EngineError> {
        let mut rules = self.store().load_rules()?;
        let rule = self.editor.add_rule(&mut rules, conditions_raw, conclusion_raw)?;
        self.store_mut().save_rules(&rules)?;

        for condition in &rule.conditions {
            self.store_mut().add_known_fact(condition.clone())?;
        }
        Ok(rule)
    }

    /// Validate and register a single known fact.
    pub fn add_known_fact(&mut self, raw: &str) -> Result<Term, EngineError> {
        let fact = self.editor.accept_fact(raw)?;
        self.store_mut().add_known_fact(fact.clone())?;
        Ok(fact)
    }

    /// Delete a rule by identifier.
    ///
    /// Already-derived facts and other rules referencing the deleted
    /// conclusion are untouched.
    pub fn delete_rule(&mut self, id: RuleId) -> Result<(), EngineError> {
        let mut rules = self.store().load_rules()?;
        self.editor.delete_rule(&mut rules, id)?;
        self.store_mut().save_rules(&rules)?;
        Ok(())
    }

    /// Install the stock rule base when the store is empty.
    /// Returns the number of rules installed.
    pub fn seed_defaults(&mut self) -> Result<usize, EngineError> {
        let editor = self.editor;
        seed_default_rules(self.store_mut(), &editor)
    }

    // =========================================================================
    // INFERENCE
    // =========================================================================

    /// Run inference over comma-separated observed facts with default
    /// partial-match options.
    pub fn infer(&self, observed_raw: &str) -> Result<InferenceReport, EngineError> {
        self.infer_with(observed_raw, &PartialMatchOptions::default())
    }

    /// Run inference with explicit partial-match options.
    ///
    /// Observed facts are normalized (junk tokens simply never match);
    /// the rule set is re-read from the store for every call.
    pub fn infer_with(
        &self,
        observed_raw: &str,
        options: &PartialMatchOptions,
    ) -> Result<InferenceReport, EngineError> {
        let observed: BTreeSet<Term> = policy::split_terms(observed_raw)
            .into_iter()
            .map(Term::new)
            .collect();

        let rules = self.store().load_rules()?;
        Ok(engine::run_inference(&rules, &observed, options))
    }
}

// =============================================================================
// TESTS
// =============================================================================
