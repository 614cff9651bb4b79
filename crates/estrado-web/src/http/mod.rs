//! HTTP layer for Estrado.
//!
//! Server-rendered pages over axum. Handlers extract the session, call a
//! core service, and turn the resulting `Outcome` into a response.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod method_override;
pub mod render;
pub mod respond;
pub mod router;
