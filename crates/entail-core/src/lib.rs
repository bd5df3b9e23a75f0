//! # entail-core
//!
//! The deterministic rule engine for Entail - THE LOGIC.
//!
//! This crate implements a small forward-chaining inference core:
//! given a user-editable set of IF-conditions → THEN-conclusion rules
//! and a set of observed facts, it derives every conclusion reachable
//! by repeated rule firing and, when no rule fires completely, ranks
//! partial-match confidence scores.
//!
//! ## Architectural Constraints
//!
//! The CORE:
//! - Is pure Rust: no async, no network dependencies
//! - Is deterministic: `BTreeMap`/`BTreeSet` ordering, integer-only scoring
//! - Performs no I/O during inference; it operates on snapshots
//! - Never caches rules across inference calls; every call re-reads
//!   the store
//! - Never panics; all errors are recoverable `Result`s

// =============================================================================
// MODULES
// =============================================================================

pub mod editor;
pub mod engine;
pub mod knowledge;
pub mod policy;
pub mod store;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{EngineError, Rule, RuleId, StoreError, Term, ValidationError};

// =============================================================================
// RE-EXPORTS: Engine & Editing
// =============================================================================

pub use editor::RuleEditor;
pub use engine::{
    Inference, InferenceReport, PartialMatch, PartialMatchOptions, forward_chain,
    partial_matches, run_inference,
};
pub use knowledge::{KnowledgeBase, StorageBackend};
pub use policy::TermPolicy;
pub use store::{MemoryStore, RedbStore, RuleStore, seed_default_rules};
