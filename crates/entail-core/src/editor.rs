//! # Rule Editor
//!
//! Validated mutation of an in-memory rule sequence.
//!
//! The editor owns no storage: it mutates the rule snapshot handed to
//! it and the caller persists the result through a
//! [`crate::store::RuleStore`]. Every term passes the
//! [`TermPolicy`](crate::policy::TermPolicy) before a rule is accepted.

use crate::policy::{self, MAX_CONDITIONS_PER_RULE, TermPolicy};
use crate::types::{Rule, RuleId, Term, ValidationError};

/// Validates and applies rule additions and deletions.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleEditor {
    policy: TermPolicy,
}

impl RuleEditor {
    /// Create an editor with the given term policy.
    #[must_use]
    pub const fn new(policy: TermPolicy) -> Self {
        Self { policy }
    }

    /// The policy this editor validates against.
    #[must_use]
    pub const fn policy(&self) -> &TermPolicy {
        &self.policy
    }

    /// Normalize, validate, and append a new rule.
    ///
    /// `conditions_raw` is comma-separated free text; `conclusion_raw`
    /// is a single free-text term. Fails with
    /// [`ValidationError::Empty`] when either side is empty after
    /// normalization and with [`ValidationError::InvalidTerm`] for the
    /// first term that fails the policy (conditions scanned first,
    /// then the conclusion). On success the rule receives the next
    /// unused identifier, is appended preserving existing order, and a
    /// clone is returned.
    pub fn add_rule(
        &self,
        rules: &mut Vec<Rule>,
        conditions_raw: &str,
        conclusion_raw: &str,
    ) -> Result<Rule, ValidationError> {
        let conditions = policy::split_terms(conditions_raw);
        let conclusion = policy::normalize(conclusion_raw);

        if conditions.is_empty() || conclusion.is_empty() {
            return Err(ValidationError::Empty);
        }
        if conditions.len() > MAX_CONDITIONS_PER_RULE {
            return Err(ValidationError::InvalidTerm(conditions_raw.to_string()));
        }

        for term in conditions.iter().chain(std::iter::once(&conclusion)) {
            if !self.policy.validate(term) {
                return Err(ValidationError::InvalidTerm(term.clone()));
            }
        }

        let rule = Rule::new(
            next_rule_id(rules),
            conditions.into_iter().map(Term::new).collect(),
            Term::new(conclusion),
        );
        rules.push(rule.clone());
        Ok(rule)
    }

    /// Normalize and validate a single fact term.
    ///
    /// Used for registering observed facts in the known-facts index.
    pub fn accept_fact(&self, raw: &str) -> Result<Term, ValidationError> {
        let normalized = policy::normalize(raw);
        if normalized.is_empty() {
            return Err(ValidationError::Empty);
        }
        if !self.policy.validate(&normalized) {
            return Err(ValidationError::InvalidTerm(normalized));
        }
        Ok(Term::new(normalized))
    }

    /// Remove the rule with the given identifier.
    ///
    /// Fails with [`ValidationError::NotFound`] and leaves the sequence
    /// unchanged when the identifier is unknown; otherwise removes the
    /// rule preserving the relative order of the remainder. Deletion
    /// never retracts already-derived facts: no derivation provenance
    /// is tracked across deletions.
    pub fn delete_rule(&self, rules: &mut Vec<Rule>, id: RuleId) -> Result<(), ValidationError> {
        match rules.iter().position(|r| r.id == id) {
            Some(index) => {
                rules.remove(index);
                Ok(())
            }
            None => Err(ValidationError::NotFound(id.0)),
        }
    }
}

/// The next unused rule identifier: one past the highest in use.
fn next_rule_id(rules: &[Rule]) -> RuleId {
    RuleId(
        rules
            .iter()
            .map(|r| r.id.0)
            .max()
            .map_or(1, |max| max.saturating_add(1)),
    )
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_rule_normalizes_and_assigns_fresh_id() {
        let editor = RuleEditor::default();
        let mut rules = Vec::new();

        let rule = editor
            .add_rule(&mut rules, "Cough, FEVER ", "flu")
            .expect("add");

        assert_eq!(rule.id, RuleId(1));
        assert_eq!(
            rule.conditions,
            vec![Term::new("cough"), Term::new("fever")]
        );
        assert_eq!(rule.conclusion, Term::new("flu"));
        assert_eq!(rules.len(), 1);

        let second = editor
            .add_rule(&mut rules, "sneezing", "allergy")
            .expect("add");
        assert_eq!(second.id, RuleId(2));
    }

    #[test]
    fn ids_are_never_reused_after_deletion() {
        let editor = RuleEditor::default();
        let mut rules = Vec::new();

        editor.add_rule(&mut rules, "fever", "flu").expect("add");
        let second = editor
            .add_rule(&mut rules, "cough", "asthma")
            .expect("add");
        editor.delete_rule(&mut rules, RuleId(1)).expect("delete");

        let third = editor
            .add_rule(&mut rules, "sneezing", "allergy")
            .expect("add");
        assert_eq!(second.id, RuleId(2));
        assert_eq!(third.id, RuleId(3));
    }

    #[test]
    fn add_rule_rejects_empty_sides() {
        let editor = RuleEditor::default();
        let mut rules = Vec::new();

        assert_eq!(
            editor.add_rule(&mut rules, "", "flu"),
            Err(ValidationError::Empty)
        );
        assert_eq!(
            editor.add_rule(&mut rules, "fever", "  42 "),
            Err(ValidationError::Empty)
        );
        assert!(rules.is_empty());
    }

    #[test]
    fn add_rule_rejects_first_invalid_term() {
        let editor = RuleEditor::default();
        let mut rules = Vec::new();

        // conditions are scanned before the conclusion
        assert_eq!(
            editor.add_rule(&mut rules, "fever, xy", "aaaa"),
            Err(ValidationError::InvalidTerm("xy".into()))
        );
        assert_eq!(
            editor.add_rule(&mut rules, "fever", "aaaa"),
            Err(ValidationError::InvalidTerm("aaaa".into()))
        );
        assert_eq!(
            editor.add_rule(&mut rules, "fever", "ok"),
            Err(ValidationError::InvalidTerm("ok".into()))
        );
        assert!(rules.is_empty());
    }

    #[test]
    fn delete_rule_unknown_id_is_not_found() {
        let editor = RuleEditor::default();
        let mut rules = Vec::new();
        editor.add_rule(&mut rules, "fever", "flu").expect("add");

        assert_eq!(
            editor.delete_rule(&mut rules, RuleId(99)),
            Err(ValidationError::NotFound(99))
        );
        assert_eq!(rules.len(), 1);
    }

    #[test]
    fn delete_rule_preserves_relative_order() {
        let editor = RuleEditor::default();
        let mut rules = Vec::new();
        editor.add_rule(&mut rules, "fever", "flu").expect("add");
        editor.add_rule(&mut rules, "cough", "asthma").expect("add");
        editor
            .add_rule(&mut rules, "sneezing", "allergy")
            .expect("add");

        editor.delete_rule(&mut rules, RuleId(2)).expect("delete");

        let ids: Vec<u64> = rules.iter().map(|r| r.id.0).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn accept_fact_validates() {
        let editor = RuleEditor::default();
        assert_eq!(editor.accept_fact(" FeVer "), Ok(Term::new("fever")));
        assert_eq!(editor.accept_fact("!!"), Err(ValidationError::Empty));
        assert_eq!(
            editor.accept_fact("xy"),
            Err(ValidationError::InvalidTerm("xy".into()))
        );
    }

    #[test]
    fn lenient_policy_is_honored() {
        let editor = RuleEditor::new(TermPolicy::lenient());
        let mut rules = Vec::new();
        // two-letter terms pass under the lenient policy
        let rule = editor.add_rule(&mut rules, "ok", "go").expect("add");
        assert_eq!(rule.conclusion, Term::new("go"));
    }
}
