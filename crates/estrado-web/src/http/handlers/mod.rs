//! Route handlers. Each one builds the request context from the session,
//! runs a core action and maps its outcome to a response.

pub mod admin_speaker;
pub mod auth;
pub mod event;
pub mod health;
pub mod speaker;
