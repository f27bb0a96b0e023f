//! REST API endpoints for community posts, comments and likes

use actix_web::{delete, get, post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::auth::AuthenticatedUser;
use crate::db::repository::PostRepository;
use crate::model::{Comment, NewPost, Post, PostType};

/// Request body for creating a post
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePostRequest {
    pub content: String,
    /// Author user id; required unless the post is anonymous
    pub author: Option<Uuid>,
    #[serde(rename = "type")]
    pub post_type: Option<String>,
    pub is_anonymous: Option<bool>,
    pub tags: Option<Vec<String>>,
    pub category: Option<String>,
    pub advice_requested: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CommentRequest {
    pub user_id: Uuid,
    pub text: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct FlagPostRequest {
    pub reason: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LikeResponse {
    pub liked: bool,
    pub likes_count: usize,
}

/// List posts, newest first.
///
/// Public; soft-deleted posts stay visible to admin callers only.
#[utoipa::path(
    get,
    path = "/api/posts",
    responses(
        (status = 200, description = "Posts retrieved successfully", body = [Post])
    ),
    tag = "posts"
)]
#[get("/api/posts")]
pub async fn list_posts(
    caller: Option<AuthenticatedUser>,
    repository: web::Data<PostRepository>,
) -> Result<HttpResponse, ApiError> {
    let include_hidden = caller.map(|c| c.role.is_admin()).unwrap_or(false);

    let posts = repository.list(include_hidden).await?;
    Ok(HttpResponse::Ok().json(posts))
}

/// Create a post. Public: anonymous posting allowed.
#[utoipa::path(
    post,
    path = "/api/posts",
    request_body = CreatePostRequest,
    responses(
        (status = 201, description = "Post created", body = Post),
        (status = 400, description = "Missing content or author")
    ),
    tag = "posts"
)]
#[post("/api/posts")]
pub async fn create_post(
    repository: web::Data<PostRepository>,
    body: web::Json<CreatePostRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = body.into_inner();

    let is_anonymous = request.is_anonymous.unwrap_or(false);

    if request.content.trim().is_empty() || (request.author.is_none() && !is_anonymous) {
        return Err(ApiError::BadRequest(
            "Content and author are required".to_string(),
        ));
    }

    let post_type = match &request.post_type {
        Some(value) => PostType::parse(value)
            .ok_or_else(|| ApiError::BadRequest(format!("Unknown post type: {}", value)))?,
        None => PostType::default(),
    };

    let post = repository
        .insert(&NewPost {
            post_type,
            content: request.content,
            tags: request.tags.unwrap_or_default(),
            category: request.category,
            advice_requested: request.advice_requested.unwrap_or(false),
            is_anonymous,
            created_by: if is_anonymous { None } else { request.author },
        })
        .await?;

    Ok(HttpResponse::Created().json(post))
}

/// Get a post by id
#[utoipa::path(
    get,
    path = "/api/posts/{id}",
    params(("id" = Uuid, Path, description = "Post id")),
    responses(
        (status = 200, description = "Post retrieved successfully", body = Post),
        (status = 404, description = "Post not found")
    ),
    tag = "posts"
)]
#[get("/api/posts/{id}")]
pub async fn get_post(
    repository: web::Data<PostRepository>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let post = repository.get_by_id(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(post))
}

/// Toggle a like on a post
#[utoipa::path(
    post,
    path = "/api/posts/{id}/like",
    params(("id" = Uuid, Path, description = "Post id")),
    responses(
        (status = 200, description = "Like toggled", body = LikeResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Post not found")
    ),
    tag = "posts"
)]
#[post("/api/posts/{id}/like")]
pub async fn toggle_like(
    caller: AuthenticatedUser,
    repository: web::Data<PostRepository>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let (liked, likes_count) = repository.toggle_like(path.into_inner(), caller.id).await?;

    Ok(HttpResponse::Ok().json(LikeResponse { liked, likes_count }))
}

/// Comment on a post. Public, author supplied in the body.
#[utoipa::path(
    post,
    path = "/api/posts/{id}/comments",
    params(("id" = Uuid, Path, description = "Post id")),
    request_body = CommentRequest,
    responses(
        (status = 201, description = "Comment added", body = Comment),
        (status = 400, description = "Missing user id or text"),
        (status = 404, description = "Post not found")
    ),
    tag = "posts"
)]
#[post("/api/posts/{id}/comments")]
pub async fn add_comment(
    repository: web::Data<PostRepository>,
    path: web::Path<Uuid>,
    body: web::Json<CommentRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = body.into_inner();

    if request.text.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "User ID and text are required".to_string(),
        ));
    }

    let comment = repository
        .add_comment(path.into_inner(), request.user_id, request.text)
        .await?;

    Ok(HttpResponse::Created().json(comment))
}

/// Reply to a comment
#[utoipa::path(
    post,
    path = "/api/posts/{post_id}/comments/{comment_id}/replies",
    params(
        ("post_id" = Uuid, Path, description = "Post id"),
        ("comment_id" = Uuid, Path, description = "Comment id")
    ),
    request_body = CommentRequest,
    responses(
        (status = 201, description = "Reply added", body = Comment),
        (status = 404, description = "Post or comment not found")
    ),
    tag = "posts"
)]
#[post("/api/posts/{post_id}/comments/{comment_id}/replies")]
pub async fn reply_to_comment(
    repository: web::Data<PostRepository>,
    path: web::Path<(Uuid, Uuid)>,
    body: web::Json<CommentRequest>,
) -> Result<HttpResponse, ApiError> {
    let (post_id, comment_id) = path.into_inner();
    let request = body.into_inner();

    if request.text.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "User ID and text are required".to_string(),
        ));
    }

    let comment = repository
        .add_reply(post_id, comment_id, request.user_id, request.text)
        .await?;

    Ok(HttpResponse::Created().json(comment))
}

/// Delete a comment. Users delete their own; admins delete any.
#[utoipa::path(
    delete,
    path = "/api/posts/{post_id}/comments/{comment_id}",
    params(
        ("post_id" = Uuid, Path, description = "Post id"),
        ("comment_id" = Uuid, Path, description = "Comment id")
    ),
    responses(
        (status = 200, description = "Comment deleted"),
        (status = 403, description = "Not the comment owner"),
        (status = 404, description = "Post or comment not found")
    ),
    tag = "posts"
)]
#[delete("/api/posts/{post_id}/comments/{comment_id}")]
pub async fn delete_comment(
    caller: AuthenticatedUser,
    repository: web::Data<PostRepository>,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse, ApiError> {
    let (post_id, comment_id) = path.into_inner();

    let post = repository.get_by_id(post_id).await?;
    let comment = post
        .comments
        .iter()
        .find(|c| c.id == comment_id)
        .ok_or_else(|| ApiError::NotFound(format!("Comment {}", comment_id)))?;

    if !caller.role.is_admin() && comment.user_id != caller.id {
        return Err(ApiError::Forbidden(
            "You can only delete your own comment".to_string(),
        ));
    }

    repository.remove_comment(post_id, comment_id).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Comment deleted"
    })))
}

/// Flag a post. Any authenticated user.
#[utoipa::path(
    post,
    path = "/api/posts/{id}/flag",
    params(("id" = Uuid, Path, description = "Post id")),
    request_body = FlagPostRequest,
    responses(
        (status = 200, description = "Post flagged successfully", body = Post),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Post not found")
    ),
    tag = "posts"
)]
#[post("/api/posts/{id}/flag")]
pub async fn flag_post(
    _caller: AuthenticatedUser,
    repository: web::Data<PostRepository>,
    path: web::Path<Uuid>,
    body: web::Json<FlagPostRequest>,
) -> Result<HttpResponse, ApiError> {
    let post = repository
        .set_flagged(path.into_inner(), body.into_inner().reason)
        .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Post flagged successfully",
        "post": post
    })))
}

/// Soft-delete a post: hidden from users, still visible to admins. Admin only.
#[utoipa::path(
    delete,
    path = "/api/posts/{id}",
    params(("id" = Uuid, Path, description = "Post id")),
    responses(
        (status = 200, description = "Post hidden from users"),
        (status = 403, description = "Admin access only"),
        (status = 404, description = "Post not found")
    ),
    tag = "posts"
)]
#[delete("/api/posts/{id}")]
pub async fn soft_delete_post(
    caller: AuthenticatedUser,
    repository: web::Data<PostRepository>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    caller.require_admin()?;

    repository.soft_delete(path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Post hidden from users but visible to admin"
    })))
}

/// Hard-delete a post. Admin only.
#[utoipa::path(
    delete,
    path = "/api/posts/{id}/full",
    params(("id" = Uuid, Path, description = "Post id")),
    responses(
        (status = 200, description = "Post deleted successfully"),
        (status = 403, description = "Admin access only"),
        (status = 404, description = "Post not found")
    ),
    tag = "posts"
)]
#[delete("/api/posts/{id}/full")]
pub async fn delete_post(
    caller: AuthenticatedUser,
    repository: web::Data<PostRepository>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    caller.require_admin()?;

    let id = path.into_inner();
    if !repository.delete(id).await? {
        return Err(ApiError::NotFound(format!("Post {}", id)));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Post deleted successfully"
    })))
}

/// Configure post routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_posts)
        .service(create_post)
        .service(toggle_like)
        .service(add_comment)
        .service(reply_to_comment)
        .service(delete_comment)
        .service(flag_post)
        .service(delete_post)
        .service(soft_delete_post)
        .service(get_post);
}
