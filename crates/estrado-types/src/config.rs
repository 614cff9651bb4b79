//! Front-end configuration types.
//!
//! `FrontendConfig` represents `estrado.toml`. Every field has a default so
//! an empty or missing file still yields a usable configuration.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level configuration for the web front-end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrontendConfig {
    /// Base URL of the upstream API (paths such as `/speakers` are appended).
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Public URL prefix for upstream-hosted files (speaker photos).
    #[serde(default = "default_storage_url")]
    pub storage_url: String,

    /// Timeout for a single upstream call, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Interpolate upstream error text into user-facing flash messages.
    /// When false the detail only goes to the log.
    #[serde(default = "default_expose_error_details")]
    pub expose_error_details: bool,

    /// Directory served under `/static`.
    #[serde(default = "default_static_dir")]
    pub static_dir: String,

    /// Idle sessions older than this are dropped.
    #[serde(default = "default_session_lifetime_minutes")]
    pub session_lifetime_minutes: u64,
}

fn default_api_base_url() -> String {
    "http://127.0.0.1:3050/api".to_string()
}

fn default_storage_url() -> String {
    "http://127.0.0.1:3050/storage".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_expose_error_details() -> bool {
    true
}

fn default_static_dir() -> String {
    "public".to_string()
}

fn default_session_lifetime_minutes() -> u64 {
    120
}

impl Default for FrontendConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            storage_url: default_storage_url(),
            request_timeout_secs: default_request_timeout_secs(),
            host: default_host(),
            port: default_port(),
            expose_error_details: default_expose_error_details(),
            static_dir: default_static_dir(),
            session_lifetime_minutes: default_session_lifetime_minutes(),
        }
    }
}

impl FrontendConfig {
    /// `host:port` for binding the listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Reject values the server cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.api_base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::InvalidBaseUrl(self.api_base_url.clone()));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        if self.host.trim().is_empty() {
            return Err(ConfigError::InvalidBindAddr(self.bind_addr()));
        }
        if self.session_lifetime_minutes == 0 {
            return Err(ConfigError::ZeroSessionLifetime);
        }
        Ok(())
    }
}
