//! Repository for moderation flag and advice database operations

use sqlx::PgPool;
use uuid::Uuid;

use super::super::models::{AdviceRow, FlagRow};
use super::super::DbError;
use crate::model::{Advice, Flag, NewAdvice, NewFlag};

/// Repository for moderation operations
#[derive(Clone)]
pub struct ModerationRepository {
    pool: PgPool,
}

impl ModerationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Check whether the given user or session already flagged a post.
    /// With neither identifier present there is nothing to deduplicate on.
    pub async fn flag_exists(
        &self,
        post_id: Uuid,
        user_id: Option<&str>,
        session_id: Option<&str>,
    ) -> Result<bool, DbError> {
        let existing: Option<(Uuid,)> = if let Some(user_id) = user_id {
            sqlx::query_as("SELECT id FROM flags WHERE post_id = $1 AND flagged_by_user_id = $2")
                .bind(post_id)
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?
        } else if let Some(session_id) = session_id {
            sqlx::query_as(
                "SELECT id FROM flags WHERE post_id = $1 AND flagged_by_session_id = $2",
            )
            .bind(post_id)
            .bind(session_id)
            .fetch_optional(&self.pool)
            .await?
        } else {
            None
        };

        Ok(existing.is_some())
    }

    /// Insert a new moderation flag
    pub async fn insert_flag(&self, flag: &NewFlag) -> Result<Flag, DbError> {
        let row: FlagRow = sqlx::query_as(
            r#"
            INSERT INTO flags (id, post_id, reason, flagged_by_user_id, flagged_by_session_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *, NULL::TEXT AS post_content
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(flag.post_id)
        .bind(&flag.reason)
        .bind(&flag.flagged_by_user_id)
        .bind(&flag.flagged_by_session_id)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!(post_id = %flag.post_id, "Inserted moderation flag");

        Ok(row.into_domain())
    }

    /// List all flags with the content of the flagged post
    pub async fn list_flags(&self) -> Result<Vec<Flag>, DbError> {
        let rows: Vec<FlagRow> = sqlx::query_as(
            r#"
            SELECT f.*, p.content AS post_content
            FROM flags f
            LEFT JOIN posts p ON p.id = f.post_id
            ORDER BY f.created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(FlagRow::into_domain).collect())
    }

    /// Insert peer advice on a post
    pub async fn insert_advice(&self, advice: &NewAdvice) -> Result<Advice, DbError> {
        let row: AdviceRow = sqlx::query_as(
            r#"
            INSERT INTO advice (id, post_id, message, advisor_user_id, advisor_session_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(advice.post_id)
        .bind(&advice.message)
        .bind(&advice.advisor_user_id)
        .bind(&advice.advisor_session_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_domain())
    }

    /// List all advice for a post, oldest first
    pub async fn list_advice(&self, post_id: Uuid) -> Result<Vec<Advice>, DbError> {
        let rows: Vec<AdviceRow> =
            sqlx::query_as("SELECT * FROM advice WHERE post_id = $1 ORDER BY created_at")
                .bind(post_id)
                .fetch_all(&self.pool)
                .await?;

        Ok(rows.into_iter().map(AdviceRow::into_domain).collect())
    }
}
