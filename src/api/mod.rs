pub mod auth;
pub mod chat;
pub mod error;
pub mod escalation;
pub mod health;
pub mod incidents;
pub mod moderation;
pub mod openapi;
pub mod posts;
pub mod reports;

pub use error::ApiError;
