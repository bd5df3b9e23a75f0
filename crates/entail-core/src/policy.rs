//! # Term Normalization & Validation
//!
//! Canonicalizes free-text tokens and enforces the "meaningful word"
//! policy before anything enters the rule base.
//!
//! - Normalization is a pure function with no failure mode
//! - Validation is a pure predicate with no side effects
//! - Thresholds live in a single [`TermPolicy`] value object selected
//!   once at construction; nothing is hardcoded in the normalizer

use serde::{Deserialize, Serialize};

/// Maximum number of letters in a single term.
///
/// Terms longer than this are rejected by validation. This prevents
/// memory exhaustion from malicious or malformed input.
pub const MAX_TERM_LETTERS: usize = 64;

/// Maximum number of condition terms accepted for a single rule.
///
/// Longer condition lists are rejected by the editor to keep every
/// inference pass computationally bounded.
pub const MAX_CONDITIONS_PER_RULE: usize = 32;

// =============================================================================
// NORMALIZATION
// =============================================================================

/// Canonicalize a free-text token.
///
/// Strips every character that is not a letter, comma, or whitespace;
/// collapses whitespace runs to a single space; trims the ends;
/// lower-cases. Empty input yields an empty string.
#[must_use]
pub fn normalize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut last_was_space = false;
    for c in raw.to_lowercase().chars() {
        if c.is_alphabetic() || c == ',' {
            out.push(c);
            last_was_space = false;
        } else if c.is_whitespace() {
            if !last_was_space {
                out.push(' ');
            }
            last_was_space = true;
        }
        // everything else (digits, punctuation, symbols) is stripped
    }
    out.trim().to_string()
}

/// Split a comma-separated input into normalized term candidates.
///
/// Pieces are trimmed and empty pieces dropped; order is preserved and
/// duplicates are NOT removed (left to the caller).
#[must_use]
pub fn split_terms(raw: &str) -> Vec<String> {
    normalize(raw)
        .split(',')
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(str::to_string)
        .collect()
}

// =============================================================================
// TERM POLICY
// =============================================================================

/// The "meaningful word" policy.
///
/// Historically these thresholds drifted between deployments (minimum
/// length 2 vs 3, repeat-run rejection at 3 vs 4 letters, vowel
/// requirement present or absent). They are consolidated here as one
/// value object so a host picks a policy exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TermPolicy {
    /// Minimum number of letters (spaces excluded).
    pub min_length: usize,
    /// Maximum allowed run of identical consecutive letters.
    /// With the default of 2, "aaa" is rejected while "aa" passes.
    pub max_consecutive_repeat: usize,
    /// Whether a term must contain at least one ASCII vowel.
    pub require_vowel: bool,
}

impl Default for TermPolicy {
    fn default() -> Self {
        Self {
            min_length: 3,
            max_consecutive_repeat: 2,
            require_vowel: true,
        }
    }
}

impl TermPolicy {
    /// The relaxed historical policy: two-letter terms allowed, runs of
    /// three tolerated, no vowel requirement.
    #[must_use]
    pub const fn lenient() -> Self {
        Self {
            min_length: 2,
            max_consecutive_repeat: 3,
            require_vowel: false,
        }
    }

    /// Check a normalized term against the policy.
    ///
    /// Returns false when the term is empty, shorter than
    /// `min_length` letters, contains any character other than letters
    /// and interior spaces, exceeds [`MAX_TERM_LETTERS`], contains a
    /// run of identical consecutive letters longer than
    /// `max_consecutive_repeat`, or (when `require_vowel`) lacks a
    /// vowel.
    #[must_use]
    pub fn validate(&self, term: &str) -> bool {
        if term.is_empty() {
            return false;
        }

        let mut letters: usize = 0;
        let mut has_vowel = false;
        let mut run_char: Option<char> = None;
        let mut run_len: usize = 0;

        for c in term.chars() {
            if c.is_alphabetic() {
                letters += 1;
                if matches!(c, 'a' | 'e' | 'i' | 'o' | 'u') {
                    has_vowel = true;
                }
                if run_char == Some(c) {
                    run_len += 1;
                } else {
                    run_char = Some(c);
                    run_len = 1;
                }
                if run_len > self.max_consecutive_repeat {
                    return false;
                }
            } else if c == ' ' {
                // spaces separate words; a run never spans a space
                run_char = None;
                run_len = 0;
            } else {
                // disallowed character survived into the term
                return false;
            }
        }

        if letters < self.min_length || letters > MAX_TERM_LETTERS {
            return false;
        }
        if self.require_vowel && !has_vowel {
            return false;
        }
        true
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_and_lowercases() {
        assert_eq!(normalize("  FeVer!!  "), "fever");
        assert_eq!(normalize("sore 123 throat"), "sore throat");
        assert_eq!(normalize("cough,fever"), "cough,fever");
    }

    #[test]
    fn normalize_collapses_whitespace() {
        assert_eq!(normalize("sore \t  throat"), "sore throat");
    }

    #[test]
    fn normalize_empty_input_yields_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("42 !!"), "");
    }

    #[test]
    fn split_preserves_order_and_duplicates() {
        assert_eq!(
            split_terms("Fever, cough , fever,,  "),
            vec!["fever", "cough", "fever"]
        );
        assert!(split_terms("").is_empty());
    }

    #[test]
    fn validate_accepts_meaningful_terms() {
        let policy = TermPolicy::default();
        assert!(policy.validate("flu"));
        assert!(policy.validate("sore throat"));
        assert!(policy.validate("shortness of breath"));
    }

    #[test]
    fn validate_rejects_short_terms() {
        let policy = TermPolicy::default();
        assert!(!policy.validate("ok"));
        assert!(!policy.validate(""));
        // spaces do not count toward length
        assert!(!policy.validate("a b"));
    }

    #[test]
    fn validate_rejects_repeat_runs() {
        let policy = TermPolicy::default();
        assert!(!policy.validate("aaaa"));
        assert!(!policy.validate("aaa"));
        // a run of two is fine ("allergy", "runny nose")
        assert!(policy.validate("allergy"));
    }

    #[test]
    fn run_does_not_span_words() {
        let policy = TermPolicy::default();
        // trailing 'a' + leading 'aa' would be a run of three if the
        // space were ignored
        assert!(policy.validate("area aargh"));
    }

    #[test]
    fn validate_requires_vowel_by_default() {
        let policy = TermPolicy::default();
        assert!(!policy.validate("xyz"));
        assert!(TermPolicy::lenient().validate("xyz"));
    }

    #[test]
    fn validate_rejects_disallowed_characters() {
        let policy = TermPolicy::default();
        assert!(!policy.validate("fever,cough"));
        assert!(!policy.validate("fever3"));
    }

    #[test]
    fn validate_rejects_oversized_terms() {
        let policy = TermPolicy::default();
        let long = "ab".repeat(MAX_TERM_LETTERS);
        assert!(!policy.validate(&long));
    }

    #[test]
    fn lenient_policy_thresholds() {
        let lenient = TermPolicy::lenient();
        assert!(lenient.validate("ok"));
        assert!(lenient.validate("aaa"));
        assert!(!lenient.validate("aaaa"));
    }
}
