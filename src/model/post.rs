//! Community posts with nested comments, replies and likes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Category of bullying a post talks about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PostType {
    Physical,
    Verbal,
    Cyber,
    General,
}

impl PostType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostType::Physical => "physical",
            PostType::Verbal => "verbal",
            PostType::Cyber => "cyber",
            PostType::General => "general",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "physical" => Some(PostType::Physical),
            "verbal" => Some(PostType::Verbal),
            "cyber" => Some(PostType::Cyber),
            "general" => Some(PostType::General),
            _ => None,
        }
    }
}

impl Default for PostType {
    fn default() -> Self {
        PostType::General
    }
}

/// Reply nested under a comment
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Reply {
    pub id: Uuid,
    pub user_id: Uuid,
    pub text: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub likes: Vec<Uuid>,
}

/// Comment on a post, with nested replies
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Comment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub text: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub likes: Vec<Uuid>,
    #[serde(default)]
    pub replies: Vec<Reply>,
}

impl Comment {
    pub fn new(user_id: Uuid, text: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            text,
            created_at: Utc::now(),
            likes: Vec::new(),
            replies: Vec::new(),
        }
    }
}

/// Details recorded when a post is escalated to authorities
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EscalationDetails {
    pub reported_by: Uuid,
    pub reported_at: DateTime<Utc>,
}

/// A community post
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Post {
    pub id: Uuid,
    pub post_type: PostType,
    pub content: String,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub advice_requested: bool,
    pub escalated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub escalation_details: Option<EscalationDetails>,
    pub is_anonymous: bool,
    /// Absent for anonymous posts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<Uuid>,
    pub likes: Vec<Uuid>,
    pub comments: Vec<Comment>,
    /// Soft-delete marker: hidden from users, still visible to admins
    pub deleted_for_user: bool,
    pub flagged: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flag_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Fields required to persist a new post
#[derive(Debug, Clone)]
pub struct NewPost {
    pub post_type: PostType,
    pub content: String,
    pub tags: Vec<String>,
    pub category: Option<String>,
    pub advice_requested: bool,
    pub is_anonymous: bool,
    pub created_by: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_type_round_trips() {
        for t in [
            PostType::Physical,
            PostType::Verbal,
            PostType::Cyber,
            PostType::General,
        ] {
            assert_eq!(PostType::parse(t.as_str()), Some(t));
        }
        assert_eq!(PostType::parse("emotional"), None);
    }

    #[test]
    fn comment_deserializes_without_optional_collections() {
        // Older rows may lack likes/replies on nested comments
        let json = serde_json::json!({
            "id": Uuid::new_v4(),
            "user_id": Uuid::new_v4(),
            "text": "hang in there",
            "created_at": Utc::now(),
        });
        let comment: Comment = serde_json::from_value(json).unwrap();
        assert!(comment.likes.is_empty());
        assert!(comment.replies.is_empty());
    }
}
