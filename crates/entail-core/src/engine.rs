//! # Inference Engine
//!
//! Forward-chaining fixpoint computation and partial-match scoring.
//!
//! The engine is pure: it performs no I/O, never blocks, and operates
//! only on the in-memory snapshots passed by the caller. All scoring
//! is integer arithmetic.
//!
//! Termination is guaranteed because the working fact set grows
//! monotonically and is bounded by the finite set of conclusion terms:
//! at most `|rules|` additions can ever occur, so the pass loop runs
//! at most `|rules| + 1` times.

use crate::types::{Rule, Term};
use serde::Serialize;
use std::collections::BTreeSet;

// =============================================================================
// RESULT TYPES
// =============================================================================

/// Outcome of a forward-chaining run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct Inference {
    /// Conclusions that fired with a 100% condition match, each at most
    /// once, in firing order.
    pub conclusions: Vec<Term>,
    /// One human-readable justification per firing rule, in firing order.
    pub explanations: Vec<String>,
    /// The fact set at fixpoint; always a superset of the initial facts.
    pub final_facts: BTreeSet<Term>,
}

/// A rule whose conditions are only fractionally satisfied, scored as
/// an integer percentage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartialMatch {
    /// The conclusion the partially-matched rule would have derived.
    pub conclusion: Term,
    /// Floor of `matched / conditions * 100`, in 0..=100.
    pub percent: u8,
}

/// Knobs for partial-match scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartialMatchOptions {
    /// Minimum percentage for a match to be reported.
    pub min_percent: u8,
    /// When true, emit one entry per matching rule instead of keeping
    /// only the best percentage per conclusion.
    pub per_rule: bool,
}

impl Default for PartialMatchOptions {
    fn default() -> Self {
        Self {
            min_percent: 30,
            per_rule: false,
        }
    }
}

/// Full inference output: conclusions plus, when nothing fired, the
/// ranked partial matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct InferenceReport {
    /// Conclusions derived with a complete condition match.
    pub conclusions: Vec<Term>,
    /// Which rules fired, in firing order.
    pub explanations: Vec<String>,
    /// The fact set at fixpoint.
    pub final_facts: BTreeSet<Term>,
    /// Ranked partial matches; populated only when `conclusions` is empty.
    pub partial: Vec<PartialMatch>,
}

// =============================================================================
// FORWARD CHAINING
// =============================================================================

/// Compute the forward-chaining fixpoint of `rules` over `initial_facts`.
///
/// Repeats full passes over the rules in stored order. A rule fires
/// when every condition is present in the working fact set and its
/// conclusion is not yet present; firing adds the conclusion, records
/// it, and appends a justification. Passes repeat until one adds
/// nothing.
///
/// Malformed rules (no conditions, or an empty conclusion) are skipped
/// rather than raised, so one bad stored record never blocks inference
/// over the rest of the rule set.
#[must_use]
pub fn forward_chain(rules: &[Rule], initial_facts: &BTreeSet<Term>) -> Inference {
    let mut working = initial_facts.clone();
    let mut conclusions: Vec<Term> = Vec::new();
    let mut explanations: Vec<String> = Vec::new();

    let mut changed = true;
    while changed {
        changed = false;
        for rule in rules {
            if !rule.is_well_formed() {
                continue;
            }
            if working.contains(&rule.conclusion) {
                continue;
            }
            if rule.conditions.iter().all(|c| working.contains(c)) {
                working.insert(rule.conclusion.clone());
                conclusions.push(rule.conclusion.clone());
                explanations.push(explain(rule));
                changed = true;
            }
        }
    }

    Inference {
        conclusions,
        explanations,
        final_facts: working,
    }
}

/// Render the justification line for a fired rule.
fn explain(rule: &Rule) -> String {
    let conditions = rule
        .conditions
        .iter()
        .map(Term::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "Rule R{}: If {} → {} fired",
        rule.id, conditions, rule.conclusion
    )
}

// =============================================================================
// PARTIAL MATCHING
// =============================================================================

/// Score every rule against `facts` and report fractional matches.
///
/// Intended for the case where [`forward_chain`] derived nothing. A
/// rule contributes when at least one condition is present and its
/// percentage clears `options.min_percent`. Duplicate conditions count
/// separately, matching the literal behavior of the historical rule
/// base. By default the best percentage per conclusion wins; with
/// `options.per_rule` every matching rule emits its own entry.
///
/// The result is sorted by percent descending; ties keep
/// first-encountered rule order (stable sort).
#[must_use]
pub fn partial_matches(
    rules: &[Rule],
    facts: &BTreeSet<Term>,
    options: &PartialMatchOptions,
) -> Vec<PartialMatch> {
    let mut matches: Vec<PartialMatch> = Vec::new();

    for rule in rules {
        if !rule.is_well_formed() {
            continue;
        }
        let matched = rule
            .conditions
            .iter()
            .filter(|c| facts.contains(*c))
            .count();
        if matched == 0 {
            continue;
        }
        // floor division; conditions is non-empty for well-formed rules
        let percent = (matched * 100 / rule.conditions.len()) as u8;
        if percent < options.min_percent {
            continue;
        }

        if options.per_rule {
            matches.push(PartialMatch {
                conclusion: rule.conclusion.clone(),
                percent,
            });
        } else if let Some(existing) = matches
            .iter_mut()
            .find(|m| m.conclusion == rule.conclusion)
        {
            if percent > existing.percent {
                existing.percent = percent;
            }
        } else {
            matches.push(PartialMatch {
                conclusion: rule.conclusion.clone(),
                percent,
            });
        }
    }

    matches.sort_by(|a, b| b.percent.cmp(&a.percent));
    matches
}

/// Run a complete inference: forward chain, then fall back to ranked
/// partial matches when no rule fired.
#[must_use]
pub fn run_inference(
    rules: &[Rule],
    initial_facts: &BTreeSet<Term>,
    options: &PartialMatchOptions,
) -> InferenceReport {
    let inference = forward_chain(rules, initial_facts);
    let partial = if inference.conclusions.is_empty() {
        partial_matches(rules, initial_facts, options)
    } else {
        Vec::new()
    };

    InferenceReport {
        conclusions: inference.conclusions,
        explanations: inference.explanations,
        final_facts: inference.final_facts,
        partial,
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RuleId;

    fn rule(id: u64, conditions: &[&str], conclusion: &str) -> Rule {
        Rule::new(
            RuleId(id),
            conditions.iter().map(|c| Term::new(*c)).collect(),
            Term::new(conclusion),
        )
    }

    fn facts(terms: &[&str]) -> BTreeSet<Term> {
        terms.iter().map(|t| Term::new(*t)).collect()
    }

    #[test]
    fn full_match_fires() {
        let rules = vec![
            rule(1, &["sneezing", "cough", "cold"], "flu"),
            rule(2, &["fever", "bodypain"], "viralinfection"),
        ];
        let result = forward_chain(&rules, &facts(&["sneezing", "cough", "cold"]));

        assert_eq!(result.conclusions, vec![Term::new("flu")]);
        assert_eq!(
            result.explanations,
            vec!["Rule R1: If sneezing, cough, cold → flu fired"]
        );
        assert!(result.final_facts.contains(&Term::new("flu")));
    }

    #[test]
    fn chained_rules_reach_fixpoint() {
        // b is only derivable after a, and c only after b; a single
        // pass in stored order would miss both since rule order is
        // reversed relative to the dependency chain.
        let rules = vec![
            rule(1, &["derived beta"], "derived gamma"),
            rule(2, &["derived alpha"], "derived beta"),
            rule(3, &["observed"], "derived alpha"),
        ];
        let result = forward_chain(&rules, &facts(&["observed"]));

        assert_eq!(
            result.conclusions,
            vec![
                Term::new("derived alpha"),
                Term::new("derived beta"),
                Term::new("derived gamma"),
            ]
        );
        assert_eq!(result.final_facts.len(), 4);
    }

    #[test]
    fn conclusion_already_known_does_not_refire() {
        let rules = vec![rule(1, &["fever"], "flu")];
        let result = forward_chain(&rules, &facts(&["fever", "flu"]));

        assert!(result.conclusions.is_empty());
        assert!(result.explanations.is_empty());
    }

    #[test]
    fn duplicate_conclusions_recorded_once() {
        let rules = vec![rule(1, &["fever"], "flu"), rule(2, &["cough"], "flu")];
        let result = forward_chain(&rules, &facts(&["fever", "cough"]));

        assert_eq!(result.conclusions, vec![Term::new("flu")]);
        assert_eq!(result.explanations.len(), 1);
    }

    #[test]
    fn malformed_rules_are_skipped() {
        let rules = vec![
            Rule::new(RuleId(1), vec![], Term::new("flu")),
            Rule::new(RuleId(2), vec![Term::new("fever")], Term::new("")),
            rule(3, &["fever"], "flu"),
        ];
        let result = forward_chain(&rules, &facts(&["fever"]));

        assert_eq!(result.conclusions, vec![Term::new("flu")]);
    }

    #[test]
    fn empty_facts_yield_initial_facts_unchanged() {
        let rules = vec![rule(1, &["fever"], "flu")];
        let result = forward_chain(&rules, &BTreeSet::new());

        assert!(result.conclusions.is_empty());
        assert!(result.final_facts.is_empty());
    }

    #[test]
    fn empty_rules_are_a_no_op() {
        let observed = facts(&["fever"]);
        let result = forward_chain(&[], &observed);

        assert!(result.conclusions.is_empty());
        assert_eq!(result.final_facts, observed);
        assert!(partial_matches(&[], &observed, &PartialMatchOptions::default()).is_empty());
    }

    #[test]
    fn partial_match_half_of_two_conditions() {
        let rules = vec![
            rule(1, &["sneezing", "cough", "cold"], "flu"),
            rule(2, &["fever", "bodypain"], "viralinfection"),
        ];
        let observed = facts(&["fever"]);

        let report = run_inference(&rules, &observed, &PartialMatchOptions::default());
        assert!(report.conclusions.is_empty());
        assert_eq!(
            report.partial,
            vec![PartialMatch {
                conclusion: Term::new("viralinfection"),
                percent: 50,
            }]
        );
    }

    #[test]
    fn partial_match_respects_min_percent() {
        let rules = vec![rule(1, &["a one", "b one", "c one", "d one"], "out")];
        let observed = facts(&["a one"]);

        // 1 of 4 = 25%, below the default threshold of 30
        let matches = partial_matches(&rules, &observed, &PartialMatchOptions::default());
        assert!(matches.is_empty());

        let relaxed = PartialMatchOptions {
            min_percent: 20,
            ..PartialMatchOptions::default()
        };
        let matches = partial_matches(&rules, &observed, &relaxed);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].percent, 25);
    }

    #[test]
    fn partial_match_keeps_best_percent_per_conclusion() {
        let rules = vec![
            rule(1, &["fever", "cough", "fatigue"], "flu"),
            rule(2, &["fever", "cough"], "flu"),
        ];
        let observed = facts(&["fever"]);

        let matches = partial_matches(&rules, &observed, &PartialMatchOptions::default());
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].percent, 50);
    }

    #[test]
    fn partial_match_per_rule_emits_duplicates() {
        let rules = vec![
            rule(1, &["fever", "cough", "fatigue"], "flu"),
            rule(2, &["fever", "cough"], "flu"),
        ];
        let observed = facts(&["fever"]);
        let options = PartialMatchOptions {
            per_rule: true,
            ..PartialMatchOptions::default()
        };

        let matches = partial_matches(&rules, &observed, &options);
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].percent, 50);
        assert_eq!(matches[1].percent, 33);
    }

    #[test]
    fn partial_match_sorted_descending_with_stable_ties() {
        let rules = vec![
            rule(1, &["alpha", "beta"], "low"),
            rule(2, &["alpha"], "high"),
            rule(3, &["beta", "gamma"], "also low"),
        ];
        let observed = facts(&["alpha", "beta"]);

        let matches = partial_matches(&rules, &observed, &PartialMatchOptions::default());
        let ranked: Vec<(&str, u8)> = matches
            .iter()
            .map(|m| (m.conclusion.as_str(), m.percent))
            .collect();
        assert_eq!(
            ranked,
            vec![("low", 100), ("high", 100), ("also low", 50)]
        );
    }

    #[test]
    fn duplicate_conditions_inflate_matched_count() {
        // literal historical behavior: a duplicated present condition
        // counts twice
        let rules = vec![rule(1, &["fever", "fever", "cough"], "flu")];
        let observed = facts(&["fever"]);

        let matches = partial_matches(&rules, &observed, &PartialMatchOptions::default());
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].percent, 66);
    }

    #[test]
    fn report_skips_partials_when_something_fired() {
        let rules = vec![
            rule(1, &["fever"], "flu"),
            rule(2, &["fever", "bodypain"], "viralinfection"),
        ];
        let report = run_inference(
            &rules,
            &facts(&["fever"]),
            &PartialMatchOptions::default(),
        );

        assert_eq!(report.conclusions, vec![Term::new("flu")]);
        assert!(report.partial.is_empty());
    }
}
