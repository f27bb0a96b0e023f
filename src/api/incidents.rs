//! REST API endpoint for structured incident reports

use actix_web::{post, web, HttpResponse};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::error::ApiError;
use crate::db::repository::IncidentRepository;
use crate::model::{NewIncident, Severity};

/// Request body for filing an incident
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateIncidentRequest {
    pub incident_type: String,
    pub severity: String,
    pub description: String,
    pub location: String,
    /// Incident date as YYYY-MM-DD
    pub date: String,
    pub time: String,
    pub witnesses: Option<String>,
    pub evidence: Option<String>,
    pub reporter_type: String,
    pub anonymous: Option<bool>,
    pub contact_info: Option<String>,
    pub school_notification: Option<bool>,
    pub parent_notification: Option<bool>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreateIncidentResponse {
    pub message: String,
    pub reference_id: String,
}

/// File an incident report. Public: no login required.
#[utoipa::path(
    post,
    path = "/api/incidents",
    request_body = CreateIncidentRequest,
    responses(
        (status = 201, description = "Incident report created", body = CreateIncidentResponse),
        (status = 400, description = "Missing or invalid fields"),
        (status = 500, description = "Internal server error")
    ),
    tag = "incidents"
)]
#[post("/api/incidents")]
pub async fn create_incident(
    repository: web::Data<IncidentRepository>,
    body: web::Json<CreateIncidentRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = body.into_inner();

    let required = [
        &request.incident_type,
        &request.description,
        &request.location,
        &request.time,
        &request.reporter_type,
    ];
    if required.iter().any(|value| value.trim().is_empty()) {
        return Err(ApiError::BadRequest("Missing required fields".to_string()));
    }

    let severity = Severity::parse(&request.severity)
        .ok_or_else(|| ApiError::BadRequest(format!("Unknown severity: {}", request.severity)))?;

    let date = NaiveDate::parse_from_str(&request.date, "%Y-%m-%d")
        .map_err(|_| ApiError::BadRequest(format!("Invalid date: {}", request.date)))?;

    let reference_id = repository.next_reference_id().await?;

    repository
        .insert(
            &reference_id,
            &NewIncident {
                incident_type: request.incident_type,
                severity,
                description: request.description,
                location: request.location,
                date,
                time: request.time,
                witnesses: request.witnesses,
                evidence: request.evidence,
                reporter_type: request.reporter_type,
                anonymous: request.anonymous.unwrap_or(true),
                contact_info: request.contact_info,
                school_notification: request.school_notification.unwrap_or(false),
                parent_notification: request.parent_notification.unwrap_or(false),
            },
        )
        .await?;

    Ok(HttpResponse::Created().json(CreateIncidentResponse {
        message: "Incident report created".to_string(),
        reference_id,
    }))
}

/// Configure incident routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(create_incident);
}
