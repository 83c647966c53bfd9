pub mod health;
pub mod sessions;

pub use health::{health_check, service_info};
pub use sessions::{create_session, delete_session, get_session, list_sessions, update_session};
