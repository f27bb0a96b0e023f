//! Deterministic keyword-based severity classifier
//!
//! Used whenever the primary classifier is unavailable or fails. Pure
//! function of the lower-cased description text; no network dependency.

use crate::model::Severity;

/// Words denoting violence, self-harm or sexual assault
const HIGH_RISK_KEYWORDS: &[&str] = &[
    "kill",
    "suicide",
    "self-harm",
    "self harm",
    "hurt myself",
    "want to die",
    "rape",
    "sexual assault",
    "weapon",
    "gun",
    "knife",
];

/// Words denoting threats, physical aggression or harassment
const MEDIUM_RISK_KEYWORDS: &[&str] = &[
    "threat",
    "threaten",
    "beat",
    "punch",
    "hit",
    "fight",
    "bully",
    "harass",
    "stalk",
    "intimidate",
    "abuse",
    "slap",
];

/// Classify a description by keyword lists alone.
///
/// The high-risk check runs before the medium-risk check regardless of where
/// the words appear in the text; matching is case-insensitive substring.
/// Empty input matches nothing and classifies as low.
pub fn classify_keywords(description: &str) -> Severity {
    let text = description.to_lowercase();

    if HIGH_RISK_KEYWORDS.iter().any(|kw| text.contains(kw)) {
        return Severity::High;
    }

    if MEDIUM_RISK_KEYWORDS.iter().any(|kw| text.contains(kw)) {
        return Severity::Medium;
    }

    Severity::Low
}

/// Human-readable severity advisory, shown in place of a conversational
/// reply when the assistant falls back to keyword triage.
pub fn advisory_message(severity: Severity) -> String {
    format!(
        "This message appears to be **{} severity** based on the description.",
        severity.as_str().to_uppercase()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn high_risk_word_classifies_high() {
        assert_eq!(
            classify_keywords("He said he would kill me"),
            Severity::High
        );
    }

    #[test]
    fn medium_risk_word_classifies_medium() {
        assert_eq!(
            classify_keywords("They keep bullying me at school"),
            Severity::Medium
        );
    }

    #[test]
    fn no_keyword_classifies_low() {
        assert_eq!(
            classify_keywords("Someone posted an embarrassing photo of me"),
            Severity::Low
        );
    }

    #[test]
    fn high_risk_takes_precedence_over_medium_risk() {
        // Medium-risk word appears first in the text; the high-risk check
        // still wins because it runs first, not because of position.
        assert_eq!(
            classify_keywords("They threaten me and said they will kill me"),
            Severity::High
        );
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(classify_keywords("HE SAID HE WOULD KILL ME"), Severity::High);
        assert_eq!(classify_keywords("Stop BULLYING me"), Severity::Medium);
    }

    #[test]
    fn empty_description_is_low_without_panicking() {
        assert_eq!(classify_keywords(""), Severity::Low);
    }

    #[test]
    fn classification_is_pure() {
        let text = "they threaten me every day";
        let first = classify_keywords(text);
        for _ in 0..10 {
            assert_eq!(classify_keywords(text), first);
        }
    }

    #[test]
    fn advisory_message_names_the_severity() {
        assert_eq!(
            advisory_message(Severity::High),
            "This message appears to be **HIGH severity** based on the description."
        );
        assert!(advisory_message(Severity::Low).contains("**LOW severity**"));
    }
}
