//! Repository for report database operations

use sqlx::PgPool;
use uuid::Uuid;

use super::super::models::ReportRow;
use super::super::DbError;
use crate::model::report::replace_reaction;
use crate::model::{NewReport, Reaction, Report};

/// Repository for report operations
#[derive(Clone)]
pub struct ReportRepository {
    pool: PgPool,
}

impl ReportRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new report, triage fields already populated
    pub async fn insert(&self, report: &NewReport) -> Result<Report, DbError> {
        let row: ReportRow = sqlx::query_as(
            r#"
            INSERT INTO reports (
                id, incident_type, platform, description, date,
                severity, ai_analyzed, ai_confidence, ai_notes,
                your_role, evidence, anonymous
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&report.incident_type)
        .bind(&report.platform)
        .bind(&report.description)
        .bind(&report.date)
        .bind(report.severity.as_str())
        .bind(report.ai_analyzed)
        .bind(report.ai_confidence)
        .bind(&report.ai_notes)
        .bind(report.your_role.as_str())
        .bind(&report.evidence)
        .bind(report.anonymous)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!(id = %row.id, severity = %row.severity, "Inserted report");

        row.into_domain().map_err(DbError::Serialization)
    }

    /// List all reports, newest first
    pub async fn list(&self) -> Result<Vec<Report>, DbError> {
        let rows: Vec<ReportRow> =
            sqlx::query_as("SELECT * FROM reports ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await?;

        rows.into_iter()
            .map(|row| row.into_domain().map_err(DbError::Serialization))
            .collect()
    }

    /// List flagged reports, newest first
    pub async fn list_flagged(&self) -> Result<Vec<Report>, DbError> {
        let rows: Vec<ReportRow> =
            sqlx::query_as("SELECT * FROM reports WHERE flagged ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await?;

        rows.into_iter()
            .map(|row| row.into_domain().map_err(DbError::Serialization))
            .collect()
    }

    /// Get a report by id
    pub async fn get_by_id(&self, id: Uuid) -> Result<Report, DbError> {
        let row: ReportRow = sqlx::query_as("SELECT * FROM reports WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::NotFound(format!("Report {}", id)))?;

        row.into_domain().map_err(DbError::Serialization)
    }

    /// Mark a report as flagged
    pub async fn set_flagged(&self, id: Uuid) -> Result<Report, DbError> {
        let row: ReportRow = sqlx::query_as(
            "UPDATE reports SET flagged = TRUE, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::NotFound(format!("Report {}", id)))?;

        tracing::debug!(id = %id, "Flagged report");

        row.into_domain().map_err(DbError::Serialization)
    }

    /// Delete a report by id
    /// Returns true if the report was deleted, false if it didn't exist
    pub async fn delete(&self, id: Uuid) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM reports WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            tracing::debug!(id = %id, "Deleted report");
        }

        Ok(deleted)
    }

    /// Replace the caller's reaction on a report.
    ///
    /// A user holds at most one reaction per report; reacting again swaps the
    /// emoji. Returns the updated reaction list.
    pub async fn upsert_reaction(
        &self,
        id: Uuid,
        user_id: Uuid,
        emoji: String,
    ) -> Result<Vec<Reaction>, DbError> {
        let report = self.get_by_id(id).await?;

        let reactions = replace_reaction(report.reactions, user_id, emoji);

        let payload = serde_json::to_value(&reactions)
            .map_err(|e| DbError::Serialization(e.to_string()))?;

        sqlx::query("UPDATE reports SET reactions = $1, updated_at = NOW() WHERE id = $2")
            .bind(&payload)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(reactions)
    }
}
