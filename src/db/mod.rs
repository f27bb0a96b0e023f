//! Database module for PostgreSQL persistence

pub mod models;
pub mod repository;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::env;

// Environment variable names
const ENV_POSTGRES_HOST: &str = "SAFEVOICE_POSTGRES_HOST";
const ENV_POSTGRES_PORT: &str = "SAFEVOICE_POSTGRES_PORT";
const ENV_POSTGRES_USER: &str = "SAFEVOICE_POSTGRES_USER";
const ENV_POSTGRES_PASSWORD: &str = "SAFEVOICE_POSTGRES_PASSWORD";
const ENV_POSTGRES_DB: &str = "SAFEVOICE_POSTGRES_DB";

// Default values
const DEFAULT_POSTGRES_HOST: &str = "127.0.0.1";
const DEFAULT_POSTGRES_PORT: &str = "5432";
const DEFAULT_POSTGRES_USER: &str = "safevoice";
const DEFAULT_POSTGRES_PASSWORD: &str = "safevoice";
const DEFAULT_POSTGRES_DB: &str = "safevoice";

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("Database connection error: {0}")]
    Connection(#[from] sqlx::Error),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Record already exists: {0}")]
    Conflict(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Create a new database connection pool
pub async fn create_pool() -> Result<PgPool, DbError> {
    let host = env::var(ENV_POSTGRES_HOST).unwrap_or_else(|_| DEFAULT_POSTGRES_HOST.to_string());
    let port = env::var(ENV_POSTGRES_PORT).unwrap_or_else(|_| DEFAULT_POSTGRES_PORT.to_string());
    let user = env::var(ENV_POSTGRES_USER).unwrap_or_else(|_| DEFAULT_POSTGRES_USER.to_string());
    let password =
        env::var(ENV_POSTGRES_PASSWORD).unwrap_or_else(|_| DEFAULT_POSTGRES_PASSWORD.to_string());
    let database = env::var(ENV_POSTGRES_DB).unwrap_or_else(|_| DEFAULT_POSTGRES_DB.to_string());

    let database_url = format!(
        "postgres://{}:{}@{}:{}/{}",
        user, password, host, port, database
    );

    tracing::debug!(host = %host, port = %port, database = %database, "Connecting to PostgreSQL");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&database_url)
        .await?;

    tracing::info!(host = %host, port = %port, "PostgreSQL connection established");

    Ok(pool)
}

/// Initialize database schema
pub async fn init_schema(pool: &PgPool) -> Result<(), DbError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id UUID PRIMARY KEY,
            username TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            role VARCHAR(20) NOT NULL DEFAULT 'user',
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS reports (
            id UUID PRIMARY KEY,
            incident_type TEXT NOT NULL,
            platform TEXT NOT NULL,
            description TEXT NOT NULL,
            date VARCHAR(10) NOT NULL,
            severity VARCHAR(10) NOT NULL DEFAULT 'medium',
            ai_analyzed BOOLEAN NOT NULL DEFAULT FALSE,
            ai_confidence DOUBLE PRECISION,
            ai_notes TEXT,
            your_role VARCHAR(20) NOT NULL,
            evidence TEXT,
            anonymous BOOLEAN NOT NULL DEFAULT TRUE,
            flagged BOOLEAN NOT NULL DEFAULT FALSE,
            reactions JSONB NOT NULL DEFAULT '[]',
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Reference ids must stay unique and monotonic across instances, so the
    // counter lives here rather than in process memory.
    sqlx::query("CREATE SEQUENCE IF NOT EXISTS incident_reference_seq")
        .execute(pool)
        .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS incidents (
            id UUID PRIMARY KEY,
            reference_id VARCHAR(20) NOT NULL UNIQUE,
            incident_type TEXT NOT NULL,
            severity VARCHAR(10) NOT NULL,
            description TEXT NOT NULL,
            location TEXT NOT NULL,
            date DATE NOT NULL,
            time VARCHAR(20) NOT NULL,
            witnesses TEXT,
            evidence TEXT,
            reporter_type TEXT NOT NULL,
            anonymous BOOLEAN NOT NULL DEFAULT TRUE,
            contact_info TEXT,
            school_notification BOOLEAN NOT NULL DEFAULT FALSE,
            parent_notification BOOLEAN NOT NULL DEFAULT FALSE,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS posts (
            id UUID PRIMARY KEY,
            post_type VARCHAR(20) NOT NULL,
            content TEXT NOT NULL,
            tags JSONB NOT NULL DEFAULT '[]',
            category TEXT,
            advice_requested BOOLEAN NOT NULL DEFAULT FALSE,
            escalated BOOLEAN NOT NULL DEFAULT FALSE,
            escalation_reported_by UUID,
            escalation_reported_at TIMESTAMPTZ,
            is_anonymous BOOLEAN NOT NULL DEFAULT FALSE,
            created_by UUID REFERENCES users(id) ON DELETE SET NULL,
            likes JSONB NOT NULL DEFAULT '[]',
            comments JSONB NOT NULL DEFAULT '[]',
            deleted_for_user BOOLEAN NOT NULL DEFAULT FALSE,
            flagged BOOLEAN NOT NULL DEFAULT FALSE,
            flag_reason TEXT,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS flags (
            id UUID PRIMARY KEY,
            post_id UUID NOT NULL REFERENCES posts(id) ON DELETE CASCADE,
            reason TEXT NOT NULL,
            flagged_by_user_id TEXT,
            flagged_by_session_id TEXT,
            resolved BOOLEAN NOT NULL DEFAULT FALSE,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS advice (
            id UUID PRIMARY KEY,
            post_id UUID NOT NULL REFERENCES posts(id) ON DELETE CASCADE,
            message TEXT NOT NULL,
            advisor_user_id TEXT,
            advisor_session_id TEXT,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes separately
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_reports_created_at ON reports(created_at)")
        .execute(pool)
        .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_reports_flagged ON reports(flagged)")
        .execute(pool)
        .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_posts_created_at ON posts(created_at)")
        .execute(pool)
        .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_flags_post_id ON flags(post_id)")
        .execute(pool)
        .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_advice_post_id ON advice(post_id)")
        .execute(pool)
        .await?;

    tracing::info!("Database schema initialized");

    Ok(())
}
