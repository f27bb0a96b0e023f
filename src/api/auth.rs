//! REST API endpoints for authentication and account management

use actix_web::cookie::{time::Duration as CookieDuration, Cookie, SameSite};
use actix_web::{delete, get, post, put, web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::auth::{
    hash_password, sign_access_token, sign_refresh_token, verify_password, verify_refresh_token,
    AuthenticatedUser, REFRESH_COOKIE,
};
use crate::db::repository::UserRepository;
use crate::model::{Role, User};

const ENV_COOKIE_SECURE: &str = "COOKIE_SECURE";
const REFRESH_COOKIE_TTL_DAYS: i64 = 7;

#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub role: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    pub access_token: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
}

fn refresh_cookie(token: String) -> Cookie<'static> {
    let secure = std::env::var(ENV_COOKIE_SECURE)
        .map(|v| v == "true")
        .unwrap_or(false);

    Cookie::build(REFRESH_COOKIE, token)
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::None)
        .path("/")
        .max_age(CookieDuration::days(REFRESH_COOKIE_TTL_DAYS))
        .finish()
}

fn token_response(user: &User) -> Result<HttpResponse, ApiError> {
    let access_token = sign_access_token(user)?;
    let refresh_token = sign_refresh_token(user)?;

    Ok(HttpResponse::Ok()
        .cookie(refresh_cookie(refresh_token))
        .json(TokenResponse { access_token }))
}

/// Register a new account
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Account created", body = TokenResponse),
        (status = 400, description = "User already exists or invalid role")
    ),
    tag = "auth"
)]
#[post("/api/auth/register")]
pub async fn register(
    repository: web::Data<UserRepository>,
    body: web::Json<RegisterRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = body.into_inner();

    if request.username.trim().is_empty() || request.password.is_empty() {
        return Err(ApiError::BadRequest(
            "Username and password are required".to_string(),
        ));
    }

    let role = match &request.role {
        Some(value) => Role::parse(value)
            .ok_or_else(|| ApiError::BadRequest(format!("Unknown role: {}", value)))?,
        None => Role::default(),
    };

    if repository.find_by_username(&request.username).await?.is_some() {
        return Err(ApiError::BadRequest("User already exists".to_string()));
    }

    let password_hash = hash_password(&request.password)?;
    let user = repository
        .insert(&request.username, &password_hash, role)
        .await?;

    token_response(&user)
}

/// Log in with username and password
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = TokenResponse),
        (status = 400, description = "Invalid credentials")
    ),
    tag = "auth"
)]
#[post("/api/auth/login")]
pub async fn login(
    repository: web::Data<UserRepository>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = body.into_inner();

    // Same response for unknown user and wrong password
    let row = repository
        .find_by_username(&request.username)
        .await?
        .ok_or_else(|| ApiError::BadRequest("Invalid credentials".to_string()))?;

    if !verify_password(&request.password, &row.password_hash) {
        return Err(ApiError::BadRequest("Invalid credentials".to_string()));
    }

    let user = row.into_domain().map_err(ApiError::Internal)?;

    tracing::info!(username = %user.username, "User logged in");

    token_response(&user)
}

/// Exchange a refresh cookie for a new access token
#[utoipa::path(
    post,
    path = "/api/auth/refresh",
    responses(
        (status = 200, description = "New access token issued", body = TokenResponse),
        (status = 401, description = "No refresh token"),
        (status = 403, description = "Invalid refresh token")
    ),
    tag = "auth"
)]
#[post("/api/auth/refresh")]
pub async fn refresh(
    req: HttpRequest,
    repository: web::Data<UserRepository>,
) -> Result<HttpResponse, ApiError> {
    let cookie = req
        .cookie(REFRESH_COOKIE)
        .ok_or_else(|| ApiError::Unauthorized("No refresh token".to_string()))?;

    let claims = verify_refresh_token(cookie.value())
        .map_err(|_| ApiError::Forbidden("Invalid refresh token".to_string()))?;

    // Re-read the account so role changes take effect on refresh
    let user = repository.get_by_id(claims.sub).await?;

    let access_token = sign_access_token(&user)?;
    Ok(HttpResponse::Ok().json(TokenResponse { access_token }))
}

/// Log out: clear the refresh cookie
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses((status = 200, description = "Logged out successfully")),
    tag = "auth"
)]
#[post("/api/auth/logout")]
pub async fn logout() -> HttpResponse {
    let mut cookie = refresh_cookie(String::new());
    cookie.make_removal();

    HttpResponse::Ok().cookie(cookie).json(serde_json::json!({
        "message": "Logged out successfully"
    }))
}

/// Get the current user
#[utoipa::path(
    get,
    path = "/api/auth/user",
    responses(
        (status = 200, description = "Current user", body = User),
        (status = 401, description = "Missing or invalid token")
    ),
    tag = "auth"
)]
#[get("/api/auth/user")]
pub async fn current_user(
    caller: AuthenticatedUser,
    repository: web::Data<UserRepository>,
) -> Result<HttpResponse, ApiError> {
    let user = repository.get_by_id(caller.id).await?;
    Ok(HttpResponse::Ok().json(user))
}

/// Update the current user
#[utoipa::path(
    put,
    path = "/api/auth/user",
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated successfully"),
        (status = 400, description = "Invalid role"),
        (status = 404, description = "User not found")
    ),
    tag = "auth"
)]
#[put("/api/auth/user")]
pub async fn update_user(
    caller: AuthenticatedUser,
    repository: web::Data<UserRepository>,
    body: web::Json<UpdateUserRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = body.into_inner();

    let role = match &request.role {
        Some(value) => Some(
            Role::parse(value)
                .ok_or_else(|| ApiError::BadRequest(format!("Unknown role: {}", value)))?,
        ),
        None => None,
    };

    let password_hash = match &request.password {
        Some(password) => Some(hash_password(password)?),
        None => None,
    };

    repository
        .update(
            caller.id,
            request.username.as_deref(),
            password_hash.as_deref(),
            role,
        )
        .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "User updated successfully"
    })))
}

/// Delete the current user's account
#[utoipa::path(
    delete,
    path = "/api/auth/user",
    responses(
        (status = 200, description = "User deleted successfully"),
        (status = 404, description = "User not found")
    ),
    tag = "auth"
)]
#[delete("/api/auth/user")]
pub async fn delete_user(
    caller: AuthenticatedUser,
    repository: web::Data<UserRepository>,
) -> Result<HttpResponse, ApiError> {
    if !repository.delete(caller.id).await? {
        return Err(ApiError::NotFound(format!("User {}", caller.id)));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "User deleted successfully"
    })))
}

/// List all users
#[utoipa::path(
    get,
    path = "/api/auth/users",
    responses(
        (status = 200, description = "Users retrieved successfully", body = [User]),
        (status = 401, description = "Missing or invalid token")
    ),
    tag = "auth"
)]
#[get("/api/auth/users")]
pub async fn list_users(
    _caller: AuthenticatedUser,
    repository: web::Data<UserRepository>,
) -> Result<HttpResponse, ApiError> {
    let users = repository.list().await?;
    Ok(HttpResponse::Ok().json(users))
}

/// Get a user by id
#[utoipa::path(
    get,
    path = "/api/auth/user/{id}",
    params(("id" = Uuid, Path, description = "User id")),
    responses(
        (status = 200, description = "User retrieved successfully", body = User),
        (status = 404, description = "User not found")
    ),
    tag = "auth"
)]
#[get("/api/auth/user/{id}")]
pub async fn get_user(
    _caller: AuthenticatedUser,
    repository: web::Data<UserRepository>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let user = repository.get_by_id(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(user))
}

/// Configure auth routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(register)
        .service(login)
        .service(refresh)
        .service(logout)
        .service(list_users)
        .service(current_user)
        .service(update_user)
        .service(delete_user)
        .service(get_user);
}
