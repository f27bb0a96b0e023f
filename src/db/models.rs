//! Database row types and row-to-domain conversions

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::model::post::EscalationDetails;
use crate::model::{
    Advice, Comment, Flag, Incident, Post, PostType, Reaction, Report, ReporterRole, Role,
    Severity, User,
};

/// Database representation of a user account, password hash included
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl UserRow {
    /// Convert database row to domain model, dropping the password hash
    pub fn into_domain(self) -> Result<User, String> {
        let role = Role::parse(&self.role)
            .ok_or_else(|| format!("Invalid role in users row: {}", self.role))?;

        Ok(User {
            id: self.id,
            username: self.username,
            role,
            created_at: self.created_at,
        })
    }
}

/// Database representation of a report
#[derive(Debug, Clone, FromRow)]
pub struct ReportRow {
    pub id: Uuid,
    pub incident_type: String,
    pub platform: String,
    pub description: String,
    pub date: String,
    pub severity: String,
    pub ai_analyzed: bool,
    pub ai_confidence: Option<f64>,
    pub ai_notes: Option<String>,
    pub your_role: String,
    pub evidence: Option<String>,
    pub anonymous: bool,
    pub flagged: bool,
    pub reactions: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ReportRow {
    /// Convert database row to domain model
    pub fn into_domain(self) -> Result<Report, String> {
        let severity = Severity::parse(&self.severity)
            .ok_or_else(|| format!("Invalid severity in reports row: {}", self.severity))?;
        let your_role = ReporterRole::parse(&self.your_role)
            .ok_or_else(|| format!("Invalid role in reports row: {}", self.your_role))?;
        let reactions: Vec<Reaction> = serde_json::from_value(self.reactions)
            .map_err(|e| format!("Invalid reactions payload: {}", e))?;

        Ok(Report {
            id: self.id,
            incident_type: self.incident_type,
            platform: self.platform,
            description: self.description,
            date: self.date,
            severity,
            ai_analyzed: self.ai_analyzed,
            ai_confidence: self.ai_confidence,
            ai_notes: self.ai_notes,
            your_role,
            evidence: self.evidence,
            anonymous: self.anonymous,
            flagged: self.flagged,
            reactions,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Database representation of an incident
#[derive(Debug, Clone, FromRow)]
pub struct IncidentRow {
    pub id: Uuid,
    pub reference_id: String,
    pub incident_type: String,
    pub severity: String,
    pub description: String,
    pub location: String,
    pub date: NaiveDate,
    pub time: String,
    pub witnesses: Option<String>,
    pub evidence: Option<String>,
    pub reporter_type: String,
    pub anonymous: bool,
    pub contact_info: Option<String>,
    pub school_notification: bool,
    pub parent_notification: bool,
    pub created_at: DateTime<Utc>,
}

impl IncidentRow {
    /// Convert database row to domain model
    pub fn into_domain(self) -> Result<Incident, String> {
        let severity = Severity::parse(&self.severity)
            .ok_or_else(|| format!("Invalid severity in incidents row: {}", self.severity))?;

        Ok(Incident {
            id: self.id,
            reference_id: self.reference_id,
            incident_type: self.incident_type,
            severity,
            description: self.description,
            location: self.location,
            date: self.date,
            time: self.time,
            witnesses: self.witnesses,
            evidence: self.evidence,
            reporter_type: self.reporter_type,
            anonymous: self.anonymous,
            contact_info: self.contact_info,
            school_notification: self.school_notification,
            parent_notification: self.parent_notification,
            created_at: self.created_at,
        })
    }
}

/// Database representation of a post
#[derive(Debug, Clone, FromRow)]
pub struct PostRow {
    pub id: Uuid,
    pub post_type: String,
    pub content: String,
    pub tags: serde_json::Value,
    pub category: Option<String>,
    pub advice_requested: bool,
    pub escalated: bool,
    pub escalation_reported_by: Option<Uuid>,
    pub escalation_reported_at: Option<DateTime<Utc>>,
    pub is_anonymous: bool,
    pub created_by: Option<Uuid>,
    pub likes: serde_json::Value,
    pub comments: serde_json::Value,
    pub deleted_for_user: bool,
    pub flagged: bool,
    pub flag_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl PostRow {
    /// Convert database row to domain model
    pub fn into_domain(self) -> Result<Post, String> {
        let post_type = PostType::parse(&self.post_type)
            .ok_or_else(|| format!("Invalid post type in posts row: {}", self.post_type))?;
        let tags: Vec<String> = serde_json::from_value(self.tags)
            .map_err(|e| format!("Invalid tags payload: {}", e))?;
        let likes: Vec<Uuid> = serde_json::from_value(self.likes)
            .map_err(|e| format!("Invalid likes payload: {}", e))?;
        let comments: Vec<Comment> = serde_json::from_value(self.comments)
            .map_err(|e| format!("Invalid comments payload: {}", e))?;

        let escalation_details = match (self.escalation_reported_by, self.escalation_reported_at) {
            (Some(reported_by), Some(reported_at)) => Some(EscalationDetails {
                reported_by,
                reported_at,
            }),
            _ => None,
        };

        Ok(Post {
            id: self.id,
            post_type,
            content: self.content,
            tags,
            category: self.category,
            advice_requested: self.advice_requested,
            escalated: self.escalated,
            escalation_details,
            is_anonymous: self.is_anonymous,
            created_by: self.created_by,
            likes,
            comments,
            deleted_for_user: self.deleted_for_user,
            flagged: self.flagged,
            flag_reason: self.flag_reason,
            created_at: self.created_at,
        })
    }
}

/// Database representation of a moderation flag, joined with the post content
#[derive(Debug, Clone, FromRow)]
pub struct FlagRow {
    pub id: Uuid,
    pub post_id: Uuid,
    pub reason: String,
    pub flagged_by_user_id: Option<String>,
    pub flagged_by_session_id: Option<String>,
    pub resolved: bool,
    pub post_content: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl FlagRow {
    pub fn into_domain(self) -> Flag {
        Flag {
            id: self.id,
            post_id: self.post_id,
            reason: self.reason,
            flagged_by_user_id: self.flagged_by_user_id,
            flagged_by_session_id: self.flagged_by_session_id,
            resolved: self.resolved,
            post_content: self.post_content,
            created_at: self.created_at,
        }
    }
}

/// Database representation of peer advice
#[derive(Debug, Clone, FromRow)]
pub struct AdviceRow {
    pub id: Uuid,
    pub post_id: Uuid,
    pub message: String,
    pub advisor_user_id: Option<String>,
    pub advisor_session_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl AdviceRow {
    pub fn into_domain(self) -> Advice {
        Advice {
            id: self.id,
            post_id: self.post_id,
            message: self.message,
            advisor_user_id: self.advisor_user_id,
            advisor_session_id: self.advisor_session_id,
            created_at: self.created_at,
        }
    }
}
