pub mod admin;
pub mod middleware;

pub use admin::{require_admin_key, AdminKeyValidator};
pub use middleware::{handle_timeout_error, request_tracing};
