//! Repository for post database operations
//!
//! Likes and comments are document-style sub-records stored as JSONB, so the
//! mutation helpers here read the column, modify it in Rust and write it back.
//! Concurrent edits may race; the platform accepts last-write-wins for these.

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use super::super::models::PostRow;
use super::super::DbError;
use crate::model::{Comment, NewPost, Post, Reply};

/// Repository for post operations
#[derive(Clone)]
pub struct PostRepository {
    pool: PgPool,
}

impl PostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new post
    pub async fn insert(&self, post: &NewPost) -> Result<Post, DbError> {
        let tags = serde_json::to_value(&post.tags)
            .map_err(|e| DbError::Serialization(e.to_string()))?;

        let row: PostRow = sqlx::query_as(
            r#"
            INSERT INTO posts (
                id, post_type, content, tags, category,
                advice_requested, is_anonymous, created_by
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(post.post_type.as_str())
        .bind(&post.content)
        .bind(&tags)
        .bind(&post.category)
        .bind(post.advice_requested)
        .bind(post.is_anonymous)
        .bind(post.created_by)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!(id = %row.id, "Inserted post");

        row.into_domain().map_err(DbError::Serialization)
    }

    /// List posts, newest first. Soft-deleted posts are only included when
    /// `include_hidden` is set (admin view).
    pub async fn list(&self, include_hidden: bool) -> Result<Vec<Post>, DbError> {
        let query = if include_hidden {
            "SELECT * FROM posts ORDER BY created_at DESC"
        } else {
            "SELECT * FROM posts WHERE NOT deleted_for_user ORDER BY created_at DESC"
        };

        let rows: Vec<PostRow> = sqlx::query_as(query).fetch_all(&self.pool).await?;

        rows.into_iter()
            .map(|row| row.into_domain().map_err(DbError::Serialization))
            .collect()
    }

    /// Get a post by id
    pub async fn get_by_id(&self, id: Uuid) -> Result<Post, DbError> {
        let row: PostRow = sqlx::query_as("SELECT * FROM posts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::NotFound(format!("Post {}", id)))?;

        row.into_domain().map_err(DbError::Serialization)
    }

    /// Toggle the caller's like on a post.
    /// Returns (liked, total like count) after the toggle.
    pub async fn toggle_like(&self, id: Uuid, user_id: Uuid) -> Result<(bool, usize), DbError> {
        let post = self.get_by_id(id).await?;

        let mut likes = post.likes;
        let liked = if likes.contains(&user_id) {
            likes.retain(|u| *u != user_id);
            false
        } else {
            likes.push(user_id);
            true
        };

        self.write_likes(id, &likes).await?;

        Ok((liked, likes.len()))
    }

    /// Append a comment to a post
    pub async fn add_comment(&self, id: Uuid, user_id: Uuid, text: String) -> Result<Comment, DbError> {
        let post = self.get_by_id(id).await?;

        let comment = Comment::new(user_id, text);
        let mut comments = post.comments;
        comments.push(comment.clone());

        self.write_comments(id, &comments).await?;

        Ok(comment)
    }

    /// Append a reply to a comment. Returns the updated comment.
    pub async fn add_reply(
        &self,
        post_id: Uuid,
        comment_id: Uuid,
        user_id: Uuid,
        text: String,
    ) -> Result<Comment, DbError> {
        let post = self.get_by_id(post_id).await?;

        let mut comments = post.comments;
        let comment = comments
            .iter_mut()
            .find(|c| c.id == comment_id)
            .ok_or_else(|| DbError::NotFound(format!("Comment {}", comment_id)))?;

        comment.replies.push(Reply {
            id: Uuid::new_v4(),
            user_id,
            text,
            created_at: Utc::now(),
            likes: Vec::new(),
        });
        let updated = comment.clone();

        self.write_comments(post_id, &comments).await?;

        Ok(updated)
    }

    /// Remove a comment from a post
    pub async fn remove_comment(&self, post_id: Uuid, comment_id: Uuid) -> Result<(), DbError> {
        let post = self.get_by_id(post_id).await?;

        let mut comments = post.comments;
        let before = comments.len();
        comments.retain(|c| c.id != comment_id);
        if comments.len() == before {
            return Err(DbError::NotFound(format!("Comment {}", comment_id)));
        }

        self.write_comments(post_id, &comments).await
    }

    /// Mark a post escalated, recording who reported it and when
    pub async fn set_escalated(&self, id: Uuid, reported_by: Uuid) -> Result<Post, DbError> {
        let row: PostRow = sqlx::query_as(
            r#"
            UPDATE posts SET
                escalated = TRUE,
                escalation_reported_by = $2,
                escalation_reported_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(reported_by)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::NotFound(format!("Post {}", id)))?;

        tracing::info!(id = %id, reported_by = %reported_by, "Escalated post");

        row.into_domain().map_err(DbError::Serialization)
    }

    /// Mark a post as flagged, with an optional reason
    pub async fn set_flagged(&self, id: Uuid, reason: Option<String>) -> Result<Post, DbError> {
        let row: PostRow = sqlx::query_as(
            r#"
            UPDATE posts SET
                flagged = TRUE,
                flag_reason = COALESCE($2, flag_reason)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(reason)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::NotFound(format!("Post {}", id)))?;

        row.into_domain().map_err(DbError::Serialization)
    }

    /// Soft delete: hide the post from users, keep it visible to admins
    pub async fn soft_delete(&self, id: Uuid) -> Result<(), DbError> {
        let result = sqlx::query("UPDATE posts SET deleted_for_user = TRUE WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound(format!("Post {}", id)));
        }

        tracing::debug!(id = %id, "Soft-deleted post");
        Ok(())
    }

    /// Hard delete a post
    /// Returns true if the post was deleted, false if it didn't exist
    pub async fn delete(&self, id: Uuid) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            tracing::debug!(id = %id, "Deleted post");
        }

        Ok(deleted)
    }

    async fn write_likes(&self, id: Uuid, likes: &[Uuid]) -> Result<(), DbError> {
        let payload =
            serde_json::to_value(likes).map_err(|e| DbError::Serialization(e.to_string()))?;

        sqlx::query("UPDATE posts SET likes = $1 WHERE id = $2")
            .bind(&payload)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn write_comments(&self, id: Uuid, comments: &[Comment]) -> Result<(), DbError> {
        let payload =
            serde_json::to_value(comments).map_err(|e| DbError::Serialization(e.to_string()))?;

        sqlx::query("UPDATE posts SET comments = $1 WHERE id = $2")
            .bind(&payload)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
