//! Moderation flags and peer advice

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

/// A moderation flag raised against a post.
///
/// Anonymous visitors can flag too, identified by a session id instead of a
/// user id; at most one of the two identifiers is set.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Flag {
    pub id: Uuid,
    pub post_id: Uuid,
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flagged_by_user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flagged_by_session_id: Option<String>,
    pub resolved: bool,
    /// Content of the flagged post, included for the moderation queue view
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_content: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewFlag {
    pub post_id: Uuid,
    pub reason: String,
    pub flagged_by_user_id: Option<String>,
    pub flagged_by_session_id: Option<String>,
}

/// Peer advice left on a post, optionally anonymous
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Advice {
    pub id: Uuid,
    pub post_id: Uuid,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advisor_user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advisor_session_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewAdvice {
    pub post_id: Uuid,
    pub message: String,
    pub advisor_user_id: Option<String>,
    pub advisor_session_id: Option<String>,
}
