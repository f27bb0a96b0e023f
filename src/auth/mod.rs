//! JWT authentication and role-based access control
//!
//! Access tokens travel in the `Authorization: Bearer` header; refresh tokens
//! live in an HTTP-only cookie and verify against a separate secret.

use std::env;
use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{FromRequest, HttpRequest};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::model::{Role, User};

const ENV_JWT_SECRET: &str = "JWT_SECRET";
const ENV_JWT_REFRESH_SECRET: &str = "JWT_REFRESH_SECRET";

const ACCESS_TOKEN_TTL_MINUTES: i64 = 15;
const REFRESH_TOKEN_TTL_DAYS: i64 = 7;

/// Name of the refresh token cookie
pub const REFRESH_COOKIE: &str = "refresh_token";

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Missing required configuration: {0}")]
    MissingSecret(&'static str),

    #[error("Token is not valid")]
    InvalidToken,

    #[error("Failed to hash password: {0}")]
    Hash(String),
}

/// Claims carried by both access and refresh tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: Uuid,
    pub role: Role,
    pub username: String,
    /// Expiry as unix timestamp
    pub exp: i64,
}

impl Claims {
    fn new(user: &User, ttl: Duration) -> Self {
        Self {
            sub: user.id,
            role: user.role,
            username: user.username.clone(),
            exp: (Utc::now() + ttl).timestamp(),
        }
    }
}

fn secret(var: &'static str) -> Result<String, AuthError> {
    env::var(var).map_err(|_| AuthError::MissingSecret(var))
}

fn sign(claims: &Claims, secret: &str) -> Result<String, AuthError> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|_| AuthError::InvalidToken)
}

fn verify(token: &str, secret: &str) -> Result<Claims, AuthError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AuthError::InvalidToken)
}

/// Issue a short-lived access token for the user
pub fn sign_access_token(user: &User) -> Result<String, AuthError> {
    sign(
        &Claims::new(user, Duration::minutes(ACCESS_TOKEN_TTL_MINUTES)),
        &secret(ENV_JWT_SECRET)?,
    )
}

/// Issue a long-lived refresh token for the user
pub fn sign_refresh_token(user: &User) -> Result<String, AuthError> {
    sign(
        &Claims::new(user, Duration::days(REFRESH_TOKEN_TTL_DAYS)),
        &secret(ENV_JWT_REFRESH_SECRET)?,
    )
}

/// Verify an access token
pub fn verify_access_token(token: &str) -> Result<Claims, AuthError> {
    verify(token, &secret(ENV_JWT_SECRET)?)
}

/// Verify a refresh token
pub fn verify_refresh_token(token: &str) -> Result<Claims, AuthError> {
    verify(token, &secret(ENV_JWT_REFRESH_SECRET)?)
}

/// Hash a password with bcrypt
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST).map_err(|e| AuthError::Hash(e.to_string()))
}

/// Check a password against its bcrypt hash
pub fn verify_password(password: &str, hash: &str) -> bool {
    bcrypt::verify(password, hash).unwrap_or(false)
}

/// Authenticated caller, extracted from the `Authorization` header.
///
/// Handlers that take this as an argument reject unauthenticated requests
/// with 401. Role checks on top of that are explicit via [`Self::require_admin`]
/// and [`Self::require_moderator`].
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub role: Role,
    pub username: String,
}

impl AuthenticatedUser {
    fn from_http_request(req: &HttpRequest) -> Result<Self, ApiError> {
        let header = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("No token, authorization denied".to_string()))?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| ApiError::Unauthorized("No token, authorization denied".to_string()))?;

        let claims = verify_access_token(token)
            .map_err(|_| ApiError::Unauthorized("Token is not valid".to_string()))?;

        Ok(Self {
            id: claims.sub,
            role: claims.role,
            username: claims.username,
        })
    }

    pub fn require_admin(&self) -> Result<(), ApiError> {
        if self.role.is_admin() {
            Ok(())
        } else {
            Err(ApiError::Forbidden("Admin access only".to_string()))
        }
    }

    pub fn require_moderator(&self) -> Result<(), ApiError> {
        if self.role.is_moderator() {
            Ok(())
        } else {
            Err(ApiError::Forbidden(
                "Moderator or admin access only".to_string(),
            ))
        }
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Self::from_http_request(req))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user(role: Role) -> User {
        User {
            id: Uuid::new_v4(),
            username: "casey".to_string(),
            role,
            created_at: Utc::now(),
        }
    }

    fn set_secrets() {
        env::set_var(ENV_JWT_SECRET, "access-secret-for-tests");
        env::set_var(ENV_JWT_REFRESH_SECRET, "refresh-secret-for-tests");
    }

    #[test]
    fn access_token_round_trips_claims() {
        set_secrets();
        let user = test_user(Role::Moderator);

        let token = sign_access_token(&user).unwrap();
        let claims = verify_access_token(&token).unwrap();

        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.role, Role::Moderator);
        assert_eq!(claims.username, "casey");
        assert!(claims.exp > Utc::now().timestamp());
    }

    #[test]
    fn refresh_token_does_not_verify_as_access_token() {
        set_secrets();
        let user = test_user(Role::User);

        let refresh = sign_refresh_token(&user).unwrap();
        assert!(verify_access_token(&refresh).is_err());
        assert!(verify_refresh_token(&refresh).is_ok());
    }

    #[test]
    fn garbage_token_is_rejected() {
        set_secrets();
        assert!(verify_access_token("not-a-token").is_err());
    }

    #[test]
    fn password_hash_verifies_original_only() {
        let hash = hash_password("s3cret-phrase").unwrap();
        assert!(verify_password("s3cret-phrase", &hash));
        assert!(!verify_password("wrong-phrase", &hash));
        assert!(!verify_password("s3cret-phrase", "not-a-hash"));
    }

    #[test]
    fn admin_guard_rejects_non_admins() {
        let caller = AuthenticatedUser {
            id: Uuid::new_v4(),
            role: Role::Moderator,
            username: "casey".to_string(),
        };
        assert!(caller.require_admin().is_err());
        assert!(caller.require_moderator().is_ok());
    }
}
