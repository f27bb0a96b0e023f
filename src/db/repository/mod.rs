//! Repositories for database operations, one per aggregate

mod incidents;
mod moderation;
mod posts;
mod reports;
mod users;

pub use incidents::IncidentRepository;
pub use moderation::ModerationRepository;
pub use posts::PostRepository;
pub use reports::ReportRepository;
pub use users::UserRepository;
