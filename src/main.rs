use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use safevoice::api;
use safevoice::app::AppState;
use safevoice::model::Config;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present (ignore if missing)
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    let bind_addr = config.bind_addr();
    let allowed_origins = config.cors_allowed_origins.clone();

    let state = AppState::new(&config)
        .await
        .expect("Failed to initialize application state");

    let db_pool = web::Data::new(state.db_pool.clone());
    let user_repository = web::Data::new(state.user_repository.clone());
    let report_repository = web::Data::new(state.report_repository.clone());
    let incident_repository = web::Data::new(state.incident_repository.clone());
    let post_repository = web::Data::new(state.post_repository.clone());
    let moderation_repository = web::Data::new(state.moderation_repository.clone());
    let triage_service = web::Data::from(state.triage_service.clone());
    let chat_service = web::Data::from(state.chat_service.clone());

    tracing::info!("Starting SafeVoice server on {}", bind_addr);

    HttpServer::new(move || {
        let mut cors = Cors::default()
            .allowed_methods(["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"])
            .allowed_headers([
                actix_web::http::header::CONTENT_TYPE,
                actix_web::http::header::AUTHORIZATION,
            ])
            .supports_credentials();
        for origin in &allowed_origins {
            cors = cors.allowed_origin(origin);
        }

        App::new()
            .wrap(cors)
            .app_data(db_pool.clone())
            .app_data(user_repository.clone())
            .app_data(report_repository.clone())
            .app_data(incident_repository.clone())
            .app_data(post_repository.clone())
            .app_data(moderation_repository.clone())
            .app_data(triage_service.clone())
            .app_data(chat_service.clone())
            .configure(api::auth::configure)
            .configure(api::reports::configure)
            .configure(api::incidents::configure)
            .configure(api::posts::configure)
            .configure(api::moderation::configure)
            .configure(api::escalation::configure)
            .configure(api::chat::configure)
            .configure(api::health::configure)
            .configure(api::openapi::configure)
    })
    .bind(&bind_addr)?
    .run()
    .await
}
