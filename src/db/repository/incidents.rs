//! Repository for incident database operations

use chrono::{Datelike, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::super::models::IncidentRow;
use super::super::DbError;
use crate::model::incident::format_reference_id;
use crate::model::{Incident, NewIncident};

/// Repository for incident operations
#[derive(Clone)]
pub struct IncidentRepository {
    pool: PgPool,
}

impl IncidentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Allocate the next reference id from the database sequence
    pub async fn next_reference_id(&self) -> Result<String, DbError> {
        let (sequence,): (i64,) = sqlx::query_as("SELECT nextval('incident_reference_seq')")
            .fetch_one(&self.pool)
            .await?;

        Ok(format_reference_id(Utc::now().year(), sequence))
    }

    /// Insert a new incident under the given reference id
    pub async fn insert(
        &self,
        reference_id: &str,
        incident: &NewIncident,
    ) -> Result<Incident, DbError> {
        let row: IncidentRow = sqlx::query_as(
            r#"
            INSERT INTO incidents (
                id, reference_id, incident_type, severity, description,
                location, date, time, witnesses, evidence, reporter_type,
                anonymous, contact_info, school_notification, parent_notification
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(reference_id)
        .bind(&incident.incident_type)
        .bind(incident.severity.as_str())
        .bind(&incident.description)
        .bind(&incident.location)
        .bind(incident.date)
        .bind(&incident.time)
        .bind(&incident.witnesses)
        .bind(&incident.evidence)
        .bind(&incident.reporter_type)
        .bind(incident.anonymous)
        .bind(&incident.contact_info)
        .bind(incident.school_notification)
        .bind(incident.parent_notification)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(reference_id = %reference_id, "Inserted incident");

        row.into_domain().map_err(DbError::Serialization)
    }
}
