//! Repository for user account database operations

use sqlx::PgPool;
use uuid::Uuid;

use super::super::models::UserRow;
use super::super::DbError;
use crate::model::{Role, User};

/// Repository for user account operations
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new user with an already-hashed password
    pub async fn insert(
        &self,
        username: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<User, DbError> {
        let row: UserRow = sqlx::query_as(
            r#"
            INSERT INTO users (id, username, password_hash, role)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(username)
        .bind(password_hash)
        .bind(role.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                DbError::Conflict(format!("User {}", username))
            }
            _ => DbError::Connection(e),
        })?;

        tracing::info!(id = %row.id, username = %username, "Created user");

        row.into_domain().map_err(DbError::Serialization)
    }

    /// Find a user row by username, password hash included (for login)
    pub async fn find_by_username(&self, username: &str) -> Result<Option<UserRow>, DbError> {
        let row: Option<UserRow> = sqlx::query_as("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    /// Get a user by id
    pub async fn get_by_id(&self, id: Uuid) -> Result<User, DbError> {
        let row: UserRow = sqlx::query_as("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::NotFound(format!("User {}", id)))?;

        row.into_domain().map_err(DbError::Serialization)
    }

    /// List all users
    pub async fn list(&self) -> Result<Vec<User>, DbError> {
        let rows: Vec<UserRow> = sqlx::query_as("SELECT * FROM users ORDER BY created_at")
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter()
            .map(|row| row.into_domain().map_err(DbError::Serialization))
            .collect()
    }

    /// Update username, password hash and/or role. Unset fields are kept.
    pub async fn update(
        &self,
        id: Uuid,
        username: Option<&str>,
        password_hash: Option<&str>,
        role: Option<Role>,
    ) -> Result<User, DbError> {
        let row: UserRow = sqlx::query_as(
            r#"
            UPDATE users SET
                username = COALESCE($2, username),
                password_hash = COALESCE($3, password_hash),
                role = COALESCE($4, role)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(username)
        .bind(password_hash)
        .bind(role.map(|r| r.as_str()))
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::NotFound(format!("User {}", id)))?;

        tracing::debug!(id = %id, "Updated user");

        row.into_domain().map_err(DbError::Serialization)
    }

    /// Delete a user account
    /// Returns true if the user was deleted, false if it didn't exist
    pub async fn delete(&self, id: Uuid) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            tracing::info!(id = %id, "Deleted user");
        }

        Ok(deleted)
    }
}
