//! REST API endpoint for escalating posts to authorities

use actix_web::{post, web, HttpResponse};

use crate::api::error::ApiError;
use crate::auth::AuthenticatedUser;
use crate::db::repository::PostRepository;
use uuid::Uuid;

/// Escalate a post, recording the reporter and timestamp
#[utoipa::path(
    post,
    path = "/api/escalation/{post_id}",
    params(("post_id" = Uuid, Path, description = "Post id")),
    responses(
        (status = 200, description = "Post escalated to authorities"),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Post not found")
    ),
    tag = "escalation"
)]
#[post("/api/escalation/{post_id}")]
pub async fn escalate_post(
    caller: AuthenticatedUser,
    repository: web::Data<PostRepository>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let post = repository.set_escalated(path.into_inner(), caller.id).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Post escalated to authorities",
        "post": post
    })))
}

/// Configure escalation routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(escalate_post);
}
