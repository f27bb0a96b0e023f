//! Application state and service initialization
//!
//! This module centralizes all service initialization and dependency injection,
//! making it easier to manage the application lifecycle and test services.

use std::sync::Arc;

use sqlx::PgPool;

use crate::db::repository::{
    IncidentRepository, ModerationRepository, PostRepository, ReportRepository, UserRepository,
};
use crate::model::Config;
use crate::service::{ChatService, LlmClient, OpenAiClassifier, SeverityClassifier, TriageService};

const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";

/// Application state containing all services and shared resources
pub struct AppState {
    /// Database connection pool
    pub db_pool: PgPool,
    pub user_repository: UserRepository,
    pub report_repository: ReportRepository,
    pub incident_repository: IncidentRepository,
    pub post_repository: PostRepository,
    pub moderation_repository: ModerationRepository,
    /// Severity triage pipeline
    pub triage_service: Arc<TriageService>,
    /// Chat assistant
    pub chat_service: Arc<ChatService>,
}

impl AppState {
    /// Initialize all services and build application state
    ///
    /// This performs:
    /// 1. Database connection and schema initialization
    /// 2. LLM client initialization (optional - triage and chat fall back to
    ///    keyword classification when OPENAI_API_KEY is absent)
    /// 3. Service dependency graph construction
    pub async fn new(config: &Config) -> Result<Self, AppError> {
        // Initialize PostgreSQL database
        let db_pool = crate::db::create_pool()
            .await
            .map_err(|e| AppError::DatabaseInit(e.to_string()))?;

        // Initialize database schema
        crate::db::init_schema(&db_pool)
            .await
            .map_err(|e| AppError::DatabaseInit(e.to_string()))?;

        // Create the shared LLM client. Missing credentials are not fatal:
        // classification degrades to the keyword fallback.
        let llm_client = match std::env::var(ENV_OPENAI_API_KEY) {
            Ok(api_key) => match LlmClient::new(&api_key, config.triage.base_url.as_deref()) {
                Ok(client) => {
                    tracing::info!("LLM client initialized");
                    Some(client)
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to initialize LLM client, running fallback-only");
                    None
                }
            },
            Err(_) => {
                tracing::warn!("OPENAI_API_KEY not set, running fallback-only");
                None
            }
        };

        let classifier: Option<Arc<dyn SeverityClassifier>> = llm_client
            .clone()
            .map(|client| {
                Arc::new(OpenAiClassifier::new(client, &config.triage))
                    as Arc<dyn SeverityClassifier>
            });

        let triage_service = Arc::new(TriageService::new(classifier));
        let chat_service = Arc::new(ChatService::new(llm_client, &config.triage));

        Ok(Self {
            user_repository: UserRepository::new(db_pool.clone()),
            report_repository: ReportRepository::new(db_pool.clone()),
            incident_repository: IncidentRepository::new(db_pool.clone()),
            post_repository: PostRepository::new(db_pool.clone()),
            moderation_repository: ModerationRepository::new(db_pool.clone()),
            triage_service,
            chat_service,
            db_pool,
        })
    }
}

/// Application-level errors
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum AppError {
    /// Database initialization failed
    #[error("Database initialization failed: {0}")]
    DatabaseInit(String),
}
