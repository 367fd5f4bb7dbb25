pub mod auth;
pub mod authorize;

pub use auth::{require_bearer, require_email_match};
pub use authorize::{ensure_email_match, ensure_owner};
