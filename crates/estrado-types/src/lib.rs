//! Shared types for the Estrado events front-end.
//!
//! Payload helpers, request-scoped session context, flash data, uploaded
//! files, configuration and error types. No IO lives here -- only serde,
//! secrecy and thiserror.

pub mod config;
pub mod error;
pub mod flash;
pub mod payload;
pub mod session;
pub mod upload;
