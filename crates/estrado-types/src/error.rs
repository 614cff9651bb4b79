use std::collections::BTreeMap;

use thiserror::Error;

use crate::flash::FormErrors;

/// Errors raised by the upstream mediation client.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("upstream request failed: {0}")]
    Transport(String),

    #[error("upstream returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("failed to decode upstream response: {0}")]
    Decode(String),

    #[error("invalid upstream URL: {0}")]
    InvalidUrl(String),

    #[error("invalid upload: {0}")]
    Upload(String),
}

impl UpstreamError {
    /// HTTP status for `Status` errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            UpstreamError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Field-level validation failure for a submitted form.
#[derive(Debug, Clone, Default, Error)]
#[error("validation failed for {} field(s)", errors.len())]
pub struct ValidationError {
    pub errors: FormErrors,
}

impl ValidationError {
    pub fn new() -> Self {
        Self {
            errors: BTreeMap::new(),
        }
    }

    /// Record a message against a field.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.errors
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// `Ok(())` when nothing was recorded, otherwise `Err(self)`.
    pub fn into_result(self) -> Result<(), ValidationError> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

/// A configuration value the front-end cannot start with.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("api_base_url must start with http:// or https://, got {0:?}")]
    InvalidBaseUrl(String),

    #[error("request_timeout_secs must be greater than zero")]
    ZeroTimeout,

    #[error("invalid bind address {0:?}")]
    InvalidBindAddr(String),

    #[error("session_lifetime_minutes must be greater than zero")]
    ZeroSessionLifetime,
}
