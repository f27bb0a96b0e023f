//! Prompts for severity triage

/// System prompt for severity classification
pub const TRIAGE_SYSTEM_PROMPT: &str = r#"You are a safety analyst for an anti-bullying reporting platform.

Your role is to judge the severity of incident descriptions submitted by
people experiencing or witnessing bullying.

You must:
- Base the judgment strictly on the submitted description
- Treat mentions of violence, self-harm or sexual assault as high severity
- Treat threats, physical aggression or sustained harassment as medium severity
- Be conservative: when in doubt between two levels, pick the higher one

Do not:
- Ask follow-up questions
- Address the reporter directly
- Output anything beyond the requested structure

Your output must be structured JSON only and conform to the requested schema."#;

/// Build the triage prompt for a description.
///
/// Deterministic: identical descriptions produce identical prompts, so the
/// mapping from input text to model-observed prompt stays reproducible for
/// testing and mocking.
pub fn build_triage_prompt(description: &str) -> String {
    format!(
        r#"Classify the severity of the following incident description.

## Incident Description
{description}

---

### Required Output

Produce structured JSON containing:
- severity: low | medium | high
- confidence: number between 0.0 and 1.0
- notes: one or two factual sentences explaining the judgment

Output JSON only."#,
        description = description
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_is_deterministic_for_identical_input() {
        let a = build_triage_prompt("They keep sending me threats");
        let b = build_triage_prompt("They keep sending me threats");
        assert_eq!(a, b);
    }

    #[test]
    fn prompt_embeds_description_verbatim() {
        let description = "Someone posted an embarrassing photo of me";
        let prompt = build_triage_prompt(description);
        assert!(prompt.contains(description));
    }

    #[test]
    fn prompts_differ_only_in_description() {
        let a = build_triage_prompt("first");
        let b = build_triage_prompt("second");
        assert_eq!(a.replace("first", ""), b.replace("second", ""));
    }
}
