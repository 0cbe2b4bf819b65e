pub mod auth;
pub mod error;
pub mod module;
pub mod session;
pub mod types;

pub use auth::{Argon2Password, AuthDecision, AuthProvider, DenyAll, SharedPassword};
pub use error::{error_response, ServiceError};
pub use module::Module;
pub use session::Session;
pub use types::{new_id, now_local_minute, ListResult, TIMESTAMP_FORMAT};
