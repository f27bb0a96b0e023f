//! One-shot admin account seeding
//!
//! Reads ADMIN_USERNAME and ADMIN_PASSWORD from the environment, creates the
//! account with the admin role if it does not already exist.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use safevoice::auth::hash_password;
use safevoice::db;
use safevoice::db::repository::UserRepository;
use safevoice::model::Role;

const ENV_ADMIN_USERNAME: &str = "ADMIN_USERNAME";
const ENV_ADMIN_PASSWORD: &str = "ADMIN_PASSWORD";

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let username = std::env::var(ENV_ADMIN_USERNAME).unwrap_or_else(|_| {
        tracing::error!("{} is required", ENV_ADMIN_USERNAME);
        std::process::exit(1);
    });
    let password = std::env::var(ENV_ADMIN_PASSWORD).unwrap_or_else(|_| {
        tracing::error!("{} is required", ENV_ADMIN_PASSWORD);
        std::process::exit(1);
    });

    let pool = db::create_pool().await.expect("Failed to create database pool");
    db::init_schema(&pool)
        .await
        .expect("Failed to initialize database schema");

    let repository = UserRepository::new(pool);

    match repository.find_by_username(&username).await {
        Ok(Some(_)) => {
            tracing::warn!(username = %username, "Admin user already exists");
            return Ok(());
        }
        Ok(None) => {}
        Err(e) => {
            tracing::error!(error = %e, "Failed to look up admin user");
            std::process::exit(1);
        }
    }

    let password_hash = hash_password(&password).expect("Failed to hash password");

    match repository.insert(&username, &password_hash, Role::Admin).await {
        Ok(user) => {
            tracing::info!(id = %user.id, username = %username, "Admin user created");
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to create admin user");
            std::process::exit(1);
        }
    }

    Ok(())
}
