//! OpenAPI specification endpoints

use actix_web::{get, HttpResponse, Responder};
use utoipa::OpenApi;

use crate::api;
use crate::model::{Advice, Comment, Flag, Post, Report, User};
use crate::service::ChatReply;

/// OpenAPI documentation for the SafeVoice API
#[derive(OpenApi)]
#[openapi(
    paths(
        api::auth::register,
        api::auth::login,
        api::auth::refresh,
        api::auth::logout,
        api::auth::current_user,
        api::auth::update_user,
        api::auth::delete_user,
        api::auth::list_users,
        api::auth::get_user,
        api::reports::create_report,
        api::reports::list_reports,
        api::reports::list_flagged_reports,
        api::reports::get_report,
        api::reports::flag_report,
        api::reports::delete_report,
        api::reports::react_to_report,
        api::incidents::create_incident,
        api::posts::list_posts,
        api::posts::create_post,
        api::posts::get_post,
        api::posts::toggle_like,
        api::posts::add_comment,
        api::posts::reply_to_comment,
        api::posts::delete_comment,
        api::posts::flag_post,
        api::posts::soft_delete_post,
        api::posts::delete_post,
        api::moderation::flag_post,
        api::moderation::list_flags,
        api::moderation::give_advice,
        api::moderation::list_advice,
        api::escalation::escalate_post,
        api::chat::chat,
        api::health::liveness,
        api::health::readiness,
    ),
    components(schemas(Report, Post, Comment, User, Flag, Advice, ChatReply)),
    tags(
        (name = "auth", description = "Authentication and account management"),
        (name = "reports", description = "Report submission and triage"),
        (name = "incidents", description = "Structured incident reports"),
        (name = "posts", description = "Community posts"),
        (name = "moderation", description = "Flags and peer advice"),
        (name = "escalation", description = "Escalation to authorities"),
        (name = "chatbot", description = "AI assistant"),
        (name = "health", description = "Health probes")
    )
)]
pub struct ApiDoc;

/// Serve OpenAPI JSON specification
#[get("/openapi.json")]
pub async fn openapi_json() -> impl Responder {
    HttpResponse::Ok().json(ApiDoc::openapi())
}

/// Serve OpenAPI YAML specification
#[get("/openapi.yaml")]
pub async fn openapi_yaml() -> impl Responder {
    HttpResponse::Ok()
        .content_type("text/yaml")
        .body(ApiDoc::openapi().to_yaml().unwrap())
}

/// Configure OpenAPI routes
pub fn configure(cfg: &mut actix_web::web::ServiceConfig) {
    cfg.service(openapi_json).service(openapi_yaml);
}
