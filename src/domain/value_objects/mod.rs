//! Domain Value Objects
//!
//! Immutable, validated values shared by every stage.

mod app_port;
mod credential;
mod project_name;

pub use app_port::AppPort;
pub use credential::Credential;
pub use project_name::ProjectName;
