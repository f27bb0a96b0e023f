//! REST API endpoints for moderation flags and peer advice
//!
//! Flagging and advising are open to anonymous visitors, identified by an
//! optional session id instead of a user id.

use actix_web::{get, post, web, HttpResponse};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::auth::AuthenticatedUser;
use crate::db::repository::ModerationRepository;
use crate::model::{Advice, Flag, NewAdvice, NewFlag};

/// Request body for flagging a post
#[derive(Debug, Deserialize, ToSchema)]
pub struct FlagRequest {
    pub post_id: Uuid,
    pub reason: String,
    pub user_id: Option<String>,
    pub session_id: Option<String>,
}

/// Request body for leaving advice on a post
#[derive(Debug, Deserialize, ToSchema)]
pub struct AdviceRequest {
    pub post_id: Uuid,
    pub message: String,
    pub user_id: Option<String>,
    pub session_id: Option<String>,
}

/// Flag a post for moderation. Anonymous visitors may flag.
#[utoipa::path(
    post,
    path = "/api/moderation/flag",
    request_body = FlagRequest,
    responses(
        (status = 201, description = "Flag created", body = Flag),
        (status = 400, description = "Already flagged by this user or session")
    ),
    tag = "moderation"
)]
#[post("/api/moderation/flag")]
pub async fn flag_post(
    repository: web::Data<ModerationRepository>,
    body: web::Json<FlagRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = body.into_inner();

    if request.reason.trim().is_empty() {
        return Err(ApiError::BadRequest("Reason is required".to_string()));
    }

    // Duplicate flags only detectable when the caller identified itself
    let already_flagged = repository
        .flag_exists(
            request.post_id,
            request.user_id.as_deref(),
            request.session_id.as_deref(),
        )
        .await?;

    if already_flagged {
        return Err(ApiError::BadRequest(
            "You have already flagged this post".to_string(),
        ));
    }

    let flag = repository
        .insert_flag(&NewFlag {
            post_id: request.post_id,
            reason: request.reason,
            flagged_by_user_id: request.user_id,
            flagged_by_session_id: request.session_id,
        })
        .await?;

    Ok(HttpResponse::Created().json(flag))
}

/// List all moderation flags with flagged post content. Admin only.
#[utoipa::path(
    get,
    path = "/api/moderation/flags",
    responses(
        (status = 200, description = "Flags retrieved successfully", body = [Flag]),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Admin access only")
    ),
    tag = "moderation"
)]
#[get("/api/moderation/flags")]
pub async fn list_flags(
    caller: AuthenticatedUser,
    repository: web::Data<ModerationRepository>,
) -> Result<HttpResponse, ApiError> {
    caller.require_admin()?;

    let flags = repository.list_flags().await?;
    Ok(HttpResponse::Ok().json(flags))
}

/// Leave advice on a post. Anonymous visitors may advise.
#[utoipa::path(
    post,
    path = "/api/moderation/advice",
    request_body = AdviceRequest,
    responses(
        (status = 201, description = "Advice created", body = Advice),
        (status = 400, description = "Message is required")
    ),
    tag = "moderation"
)]
#[post("/api/moderation/advice")]
pub async fn give_advice(
    repository: web::Data<ModerationRepository>,
    body: web::Json<AdviceRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = body.into_inner();

    if request.message.trim().is_empty() {
        return Err(ApiError::BadRequest("Message is required".to_string()));
    }

    let advice = repository
        .insert_advice(&NewAdvice {
            post_id: request.post_id,
            message: request.message,
            advisor_user_id: request.user_id,
            advisor_session_id: request.session_id,
        })
        .await?;

    Ok(HttpResponse::Created().json(advice))
}

/// List advice for a post. Public.
#[utoipa::path(
    get,
    path = "/api/moderation/advice/{post_id}",
    params(("post_id" = Uuid, Path, description = "Post id")),
    responses(
        (status = 200, description = "Advice retrieved successfully", body = [Advice])
    ),
    tag = "moderation"
)]
#[get("/api/moderation/advice/{post_id}")]
pub async fn list_advice(
    repository: web::Data<ModerationRepository>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let advice = repository.list_advice(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(advice))
}

/// Configure moderation routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(flag_post)
        .service(list_flags)
        .service(give_advice)
        .service(list_advice);
}
