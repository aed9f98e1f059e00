mod auth;

pub use auth::{session_auth_middleware, CurrentSession};
