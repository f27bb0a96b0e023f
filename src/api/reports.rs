//! REST API endpoints for reports
//!
//! Report creation runs the severity triage pipeline before persisting; the
//! triage fields are set exactly once here and never mutated afterwards.

use actix_web::{delete, get, patch, post, web, HttpResponse};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::auth::AuthenticatedUser;
use crate::db::repository::ReportRepository;
use crate::model::{NewReport, Reaction, Report, ReporterRole};
use crate::service::TriageService;

/// Minimum description length enforced before the pipeline runs
const MIN_DESCRIPTION_LEN: usize = 10;

/// Request body for creating a report.
///
/// Severity is not accepted from the client; the triage pipeline decides it.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateReportRequest {
    pub incident_type: String,
    pub platform: String,
    pub description: String,
    /// Incident date as YYYY-MM-DD, defaults to today
    pub date: Option<String>,
    pub your_role: String,
    pub evidence: Option<String>,
    pub anonymous: Option<bool>,
}

/// Response for report creation
#[derive(Debug, Serialize, ToSchema)]
pub struct CreateReportResponse {
    pub message: String,
    pub report: Report,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ReactRequest {
    pub emoji: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReactResponse {
    pub message: String,
    pub reactions: Vec<Reaction>,
}

fn validate(request: &CreateReportRequest) -> Result<ReporterRole, ApiError> {
    if request.incident_type.trim().is_empty()
        || request.platform.trim().is_empty()
        || request.description.trim().is_empty()
    {
        return Err(ApiError::BadRequest("Missing required fields".to_string()));
    }

    if request.description.trim().len() < MIN_DESCRIPTION_LEN {
        return Err(ApiError::BadRequest(format!(
            "Description must be at least {} characters",
            MIN_DESCRIPTION_LEN
        )));
    }

    ReporterRole::parse(&request.your_role)
        .ok_or_else(|| ApiError::BadRequest("Your role is required".to_string()))
}

/// Submit a report. Public: no login required.
#[utoipa::path(
    post,
    path = "/api/reports",
    request_body = CreateReportRequest,
    responses(
        (status = 201, description = "Report submitted successfully", body = CreateReportResponse),
        (status = 400, description = "Missing or invalid fields"),
        (status = 500, description = "Internal server error")
    ),
    tag = "reports"
)]
#[post("/api/reports")]
pub async fn create_report(
    repository: web::Data<ReportRepository>,
    triage: web::Data<TriageService>,
    body: web::Json<CreateReportRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = body.into_inner();
    let your_role = validate(&request)?;

    let outcome = triage.classify(&request.description).await;

    tracing::info!(
        severity = %outcome.severity,
        ai_analyzed = outcome.ai_analyzed,
        "Report triaged"
    );

    let report = repository
        .insert(&NewReport {
            incident_type: request.incident_type,
            platform: request.platform,
            description: request.description,
            date: request
                .date
                .unwrap_or_else(|| Utc::now().format("%Y-%m-%d").to_string()),
            severity: outcome.severity,
            ai_analyzed: outcome.ai_analyzed,
            ai_confidence: outcome.ai_confidence,
            ai_notes: outcome.ai_notes,
            your_role,
            evidence: request.evidence,
            anonymous: request.anonymous.unwrap_or(true),
        })
        .await?;

    Ok(HttpResponse::Created().json(CreateReportResponse {
        message: "Report submitted successfully".to_string(),
        report,
    }))
}

/// List all reports, newest first. Admin only.
#[utoipa::path(
    get,
    path = "/api/reports",
    responses(
        (status = 200, description = "Reports retrieved successfully", body = [Report]),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Admin access only")
    ),
    tag = "reports"
)]
#[get("/api/reports")]
pub async fn list_reports(
    caller: AuthenticatedUser,
    repository: web::Data<ReportRepository>,
) -> Result<HttpResponse, ApiError> {
    caller.require_admin()?;

    let reports = repository.list().await?;
    Ok(HttpResponse::Ok().json(reports))
}

/// List flagged reports. Admin only.
#[utoipa::path(
    get,
    path = "/api/reports/flagged",
    responses(
        (status = 200, description = "Flagged reports retrieved successfully", body = [Report]),
        (status = 403, description = "Admin access only")
    ),
    tag = "reports"
)]
#[get("/api/reports/flagged")]
pub async fn list_flagged_reports(
    caller: AuthenticatedUser,
    repository: web::Data<ReportRepository>,
) -> Result<HttpResponse, ApiError> {
    caller.require_admin()?;

    let reports = repository.list_flagged().await?;
    Ok(HttpResponse::Ok().json(reports))
}

/// Get a single report by id. Admin only.
#[utoipa::path(
    get,
    path = "/api/reports/{id}",
    params(("id" = Uuid, Path, description = "Report id")),
    responses(
        (status = 200, description = "Report retrieved successfully", body = Report),
        (status = 403, description = "Admin access only"),
        (status = 404, description = "Report not found")
    ),
    tag = "reports"
)]
#[get("/api/reports/{id}")]
pub async fn get_report(
    caller: AuthenticatedUser,
    repository: web::Data<ReportRepository>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    caller.require_admin()?;

    let report = repository.get_by_id(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(report))
}

/// Flag a report for follow-up. Admin only.
#[utoipa::path(
    patch,
    path = "/api/reports/{id}/flag",
    params(("id" = Uuid, Path, description = "Report id")),
    responses(
        (status = 200, description = "Report flagged", body = Report),
        (status = 403, description = "Admin access only"),
        (status = 404, description = "Report not found")
    ),
    tag = "reports"
)]
#[patch("/api/reports/{id}/flag")]
pub async fn flag_report(
    caller: AuthenticatedUser,
    repository: web::Data<ReportRepository>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    caller.require_admin()?;

    let report = repository.set_flagged(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Report flagged",
        "report": report
    })))
}

/// Delete a report. Admin only.
#[utoipa::path(
    delete,
    path = "/api/reports/{id}",
    params(("id" = Uuid, Path, description = "Report id")),
    responses(
        (status = 200, description = "Report deleted successfully"),
        (status = 403, description = "Admin access only"),
        (status = 404, description = "Report not found")
    ),
    tag = "reports"
)]
#[delete("/api/reports/{id}")]
pub async fn delete_report(
    caller: AuthenticatedUser,
    repository: web::Data<ReportRepository>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    caller.require_admin()?;

    let id = path.into_inner();
    if !repository.delete(id).await? {
        return Err(ApiError::NotFound(format!("Report {}", id)));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Report deleted successfully"
    })))
}

/// React to a report with an emoji, replacing any previous reaction by the caller
#[utoipa::path(
    patch,
    path = "/api/reports/{id}/react",
    params(("id" = Uuid, Path, description = "Report id")),
    request_body = ReactRequest,
    responses(
        (status = 200, description = "Reaction added", body = ReactResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Report not found")
    ),
    tag = "reports"
)]
#[patch("/api/reports/{id}/react")]
pub async fn react_to_report(
    caller: AuthenticatedUser,
    repository: web::Data<ReportRepository>,
    path: web::Path<Uuid>,
    body: web::Json<ReactRequest>,
) -> Result<HttpResponse, ApiError> {
    let reactions = repository
        .upsert_reaction(path.into_inner(), caller.id, body.into_inner().emoji)
        .await?;

    Ok(HttpResponse::Ok().json(ReactResponse {
        message: "Reaction added".to_string(),
        reactions,
    }))
}

/// Configure report routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(create_report)
        .service(list_flagged_reports)
        .service(list_reports)
        .service(get_report)
        .service(flag_report)
        .service(delete_report)
        .service(react_to_report);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(description: &str) -> CreateReportRequest {
        CreateReportRequest {
            incident_type: "cyberbullying".to_string(),
            platform: "instagram".to_string(),
            description: description.to_string(),
            date: None,
            your_role: "target".to_string(),
            evidence: None,
            anonymous: None,
        }
    }

    #[test]
    fn short_description_is_rejected_before_triage() {
        let err = validate(&request("too short")).unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[test]
    fn ten_character_description_passes() {
        assert!(validate(&request("ten chars!")).is_ok());
    }

    #[test]
    fn missing_fields_are_rejected() {
        let mut bad = request("long enough description");
        bad.platform = String::new();
        assert!(validate(&bad).is_err());
    }

    #[test]
    fn unknown_role_is_rejected() {
        let mut bad = request("long enough description");
        bad.your_role = "principal".to_string();
        assert!(validate(&bad).is_err());
    }
}
