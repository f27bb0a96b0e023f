//! Report domain model and triage metadata

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Severity classification produced by the triage pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }

    /// Parse a severity label. Anything outside the three-value enum is
    /// rejected, including values like "critical" that a model may invent.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "low" => Some(Severity::Low),
            "medium" => Some(Severity::Medium),
            "high" => Some(Severity::High),
            _ => None,
        }
    }
}

impl Default for Severity {
    fn default() -> Self {
        Severity::Medium
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Relationship of the reporter to the incident
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReporterRole {
    Target,
    Bystander,
    Reporter,
    Other,
}

impl ReporterRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReporterRole::Target => "target",
            ReporterRole::Bystander => "bystander",
            ReporterRole::Reporter => "reporter",
            ReporterRole::Other => "other",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "target" => Some(ReporterRole::Target),
            "bystander" => Some(ReporterRole::Bystander),
            "reporter" => Some(ReporterRole::Reporter),
            "other" => Some(ReporterRole::Other),
            _ => None,
        }
    }
}

/// Emoji reaction on a report. One reaction per user; re-reacting replaces it.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Reaction {
    pub emoji: String,
    pub user_id: Uuid,
}

/// Replace the user's reaction in place, keeping everyone else's.
pub fn replace_reaction(reactions: Vec<Reaction>, user_id: Uuid, emoji: String) -> Vec<Reaction> {
    let mut reactions: Vec<Reaction> = reactions
        .into_iter()
        .filter(|r| r.user_id != user_id)
        .collect();
    reactions.push(Reaction { emoji, user_id });
    reactions
}

/// A submitted report with its triage result.
///
/// The four triage fields (`severity`, `ai_analyzed`, `ai_confidence`,
/// `ai_notes`) are set exactly once, before the record is first persisted.
/// When `ai_analyzed` is false the confidence and notes are absent.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Report {
    pub id: Uuid,
    pub incident_type: String,
    pub platform: String,
    pub description: String,
    /// Incident date as YYYY-MM-DD
    pub date: String,
    pub severity: Severity,
    pub ai_analyzed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_confidence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_notes: Option<String>,
    pub your_role: ReporterRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evidence: Option<String>,
    pub anonymous: bool,
    pub flagged: bool,
    pub reactions: Vec<Reaction>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to persist a new report, triage already applied
#[derive(Debug, Clone)]
pub struct NewReport {
    pub incident_type: String,
    pub platform: String,
    pub description: String,
    pub date: String,
    pub severity: Severity,
    pub ai_analyzed: bool,
    pub ai_confidence: Option<f64>,
    pub ai_notes: Option<String>,
    pub your_role: ReporterRole,
    pub evidence: Option<String>,
    pub anonymous: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_parse_accepts_only_the_three_values() {
        assert_eq!(Severity::parse("low"), Some(Severity::Low));
        assert_eq!(Severity::parse("MEDIUM"), Some(Severity::Medium));
        assert_eq!(Severity::parse(" high "), Some(Severity::High));
        assert_eq!(Severity::parse("critical"), None);
        assert_eq!(Severity::parse(""), None);
    }

    #[test]
    fn severity_defaults_to_medium() {
        assert_eq!(Severity::default(), Severity::Medium);
    }

    #[test]
    fn severity_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Severity::High).unwrap(), "\"high\"");
    }

    #[test]
    fn reacting_twice_leaves_one_reaction_per_user() {
        let user = Uuid::new_v4();
        let other = Uuid::new_v4();

        let reactions = replace_reaction(Vec::new(), user, "❤️".to_string());
        let reactions = replace_reaction(reactions, other, "😢".to_string());
        let reactions = replace_reaction(reactions, user, "😢".to_string());

        assert_eq!(reactions.len(), 2);
        let mine: Vec<_> = reactions.iter().filter(|r| r.user_id == user).collect();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].emoji, "😢");
    }

    #[test]
    fn reporter_role_round_trips() {
        for role in [
            ReporterRole::Target,
            ReporterRole::Bystander,
            ReporterRole::Reporter,
            ReporterRole::Other,
        ] {
            assert_eq!(ReporterRole::parse(role.as_str()), Some(role));
        }
        assert_eq!(ReporterRole::parse("principal"), None);
    }
}
