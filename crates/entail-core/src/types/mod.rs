//! # Core Type Definitions
//!
//! This module contains all core types for the Entail rule engine:
//! - Term and rule identifiers (`Term`, `RuleId`)
//! - The rule representation (`Rule`)
//! - Error types (`ValidationError`, `StoreError`, `EngineError`)
//!
//! ## Determinism Guarantees
//!
//! All types in this module:
//! - Use integer arithmetic only (no floating-point)
//! - Implement `Ord` for deterministic ordering in `BTreeMap`/`BTreeSet`

use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// TERM
// =============================================================================

/// A single normalized symbolic token used as a condition or a conclusion.
///
/// A term is expected to already be in canonical form: lower-cased,
/// trimmed, letters and interior spaces only. Canonicalization is the
/// job of [`crate::policy::TermPolicy`]; `Term` itself is a plain
/// carrier so that stored data round-trips unchanged.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Term(pub String);

impl Term {
    /// Create a term from an already-normalized string.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the term as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check whether the term carries any content at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for Term {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Term {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

// =============================================================================
// RULE
// =============================================================================

/// Unique identifier for a rule, assigned on creation and never reused
/// while the rule exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RuleId(pub u64);

impl std::fmt::Display for RuleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An IF-conditions → THEN-conclusion rule.
///
/// Immutable once created, except for deletion. Conditions keep their
/// authoring order; duplicates are allowed but carry no extra meaning
/// for firing (a duplicated condition does inflate partial-match
/// counts, matching the historical behavior of the rule base).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    /// The unique rule identifier.
    pub id: RuleId,
    /// Condition terms, all of which must hold for the rule to fire.
    pub conditions: Vec<Term>,
    /// The conclusion term added to the fact set when the rule fires.
    pub conclusion: Term,
}

impl Rule {
    /// Create a new rule.
    #[must_use]
    pub fn new(id: RuleId, conditions: Vec<Term>, conclusion: Term) -> Self {
        Self {
            id,
            conditions,
            conclusion,
        }
    }

    /// Check that the rule can ever fire.
    ///
    /// Stored data may contain rules with no conditions or an empty
    /// conclusion; the engine skips those rather than erroring, so one
    /// bad record never blocks inference over the rest of the rule set.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        !self.conditions.is_empty()
            && !self.conclusion.is_empty()
            && self.conditions.iter().all(|c| !c.is_empty())
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Rejections surfaced to the caller for corrective user action.
///
/// These never crash the process and are never silently dropped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Conditions or conclusion were empty after normalization.
    #[error("conditions and conclusion are both required")]
    Empty,

    /// A term failed the meaningful-word policy.
    #[error("'{0}' is not a meaningful term")]
    InvalidTerm(String),

    /// The referenced rule does not exist.
    #[error("no rule with id {0}")]
    NotFound(u64),
}

/// Failures raised by a rule store backend.
///
/// Propagated to the caller unmodified; the core performs no retries
/// (retry policy belongs to the store implementation or the host).
#[derive(Debug, Error)]
pub enum StoreError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(String),

    /// A serialization or deserialization error occurred.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Umbrella error for knowledge-base operations that touch both
/// validation and persistence.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Input was rejected by the term policy or rule editor.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The rule store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

// =============================================================================
// TESTS
// =============================================================================
