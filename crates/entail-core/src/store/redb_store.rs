//! # redb-backed Rule Store
//!
//! Disk-backed persistence using the redb embedded database:
//! - ACID transactions (a reader never sees a partial `save_rules`)
//! - Crash safety (copy-on-write B-trees)
//! - MVCC (concurrent readers, single writer)
//! - Zero configuration
//!
//! Rules are keyed by their identifier and serialized with postcard;
//! identifiers are assigned monotonically by the editor, so ascending
//! key order is insertion order.

use crate::store::RuleStore;
use crate::types::{Rule, StoreError, Term};
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use std::collections::BTreeSet;
use std::path::Path;

/// Table for rules: RuleId(u64) -> serialized Rule bytes
const RULES: TableDefinition<u64, &[u8]> = TableDefinition::new("rules");

/// Table for the known-facts index: term -> unused marker
const KNOWN_FACTS: TableDefinition<&str, u64> = TableDefinition::new("known_facts");

/// A disk-backed rule store using redb.
pub struct RedbStore {
    /// The redb database handle.
    db: Database,
}

impl std::fmt::Debug for RedbStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbStore").finish_non_exhaustive()
    }
}

fn io_err(e: impl std::fmt::Display) -> StoreError {
    StoreError::Io(e.to_string())
}

impl RedbStore {
    /// Open or create a rule database at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let db = Database::create(path.as_ref()).map_err(io_err)?;

        // Initialize tables if they don't exist
        {
            let write_txn = db.begin_write().map_err(io_err)?;
            let _ = write_txn.open_table(RULES).map_err(io_err)?;
            let _ = write_txn.open_table(KNOWN_FACTS).map_err(io_err)?;
            write_txn.commit().map_err(io_err)?;
        }

        Ok(Self { db })
    }

    /// Compact the database (optional optimization).
    pub fn compact(&mut self) -> Result<(), StoreError> {
        self.db.compact().map_err(io_err)?;
        Ok(())
    }
}

impl RuleStore for RedbStore {
    fn load_rules(&self) -> Result<Vec<Rule>, StoreError> {
        let read_txn = self.db.begin_read().map_err(io_err)?;
        let table = read_txn.open_table(RULES).map_err(io_err)?;

        let mut rules = Vec::new();
        for entry in table.iter().map_err(io_err)? {
            let (_, value) = entry.map_err(io_err)?;
            let rule: Rule = postcard::from_bytes(value.value())
                .map_err(|e| StoreError::Serialization(e.to_string()))?;
            rules.push(rule);
        }
        Ok(rules)
    }

    fn save_rules(&mut self, rules: &[Rule]) -> Result<(), StoreError> {
        let write_txn = self.db.begin_write().map_err(io_err)?;

        // Rewrite the whole table in one transaction so deletions are
        // reflected and a reader only ever observes a complete sequence.
        let _ = write_txn.delete_table(RULES).map_err(io_err)?;
        {
            let mut table = write_txn.open_table(RULES).map_err(io_err)?;
            for rule in rules {
                let bytes = postcard::to_allocvec(rule)
                    .map_err(|e| StoreError::Serialization(e.to_string()))?;
                table
                    .insert(rule.id.0, bytes.as_slice())
                    .map_err(io_err)?;
            }
        }
        write_txn.commit().map_err(io_err)?;
        Ok(())
    }

    fn load_known_facts(&self) -> Result<BTreeSet<Term>, StoreError> {
        let read_txn = self.db.begin_read().map_err(io_err)?;
        let table = read_txn.open_table(KNOWN_FACTS).map_err(io_err)?;

        let mut facts = BTreeSet::new();
        for entry in table.iter().map_err(io_err)? {
            let (key, _) = entry.map_err(io_err)?;
            facts.insert(Term::new(key.value()));
        }
        Ok(facts)
    }

    fn add_known_fact(&mut self, fact: Term) -> Result<(), StoreError> {
        let write_txn = self.db.begin_write().map_err(io_err)?;
        {
            let mut table = write_txn.open_table(KNOWN_FACTS).map_err(io_err)?;
            // re-inserting an existing term is the idempotent no-op case
            table.insert(fact.as_str(), 0u64).map_err(io_err)?;
        }
        write_txn.commit().map_err(io_err)?;
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
