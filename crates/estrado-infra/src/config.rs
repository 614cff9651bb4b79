//! Configuration loader for the front-end.
//!
//! Reads `estrado.toml` and deserializes it into [`FrontendConfig`]. Falls
//! back to defaults when the file is missing or malformed.

use std::path::Path;

use estrado_types::config::FrontendConfig;

/// Load configuration from `path`.
///
/// - If the file does not exist, returns [`FrontendConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
/// - Otherwise returns the parsed config.
pub async fn load_config(path: &Path) -> FrontendConfig {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config found at {}, using defaults", path.display());
            return FrontendConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", path.display());
            return FrontendConfig::default();
        }
    };

    match toml::from_str::<FrontendConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("Failed to parse {}: {err}, using defaults", path.display());
            FrontendConfig::default()
        }
    }
}

/// Command-line / environment overrides applied on top of the file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub api_base_url: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
}

pub fn apply_overrides(mut config: FrontendConfig, overrides: ConfigOverrides) -> FrontendConfig {
    if let Some(url) = overrides.api_base_url {
        config.api_base_url = url;
    }
    if let Some(host) = overrides.host {
        config.host = host;
    }
    if let Some(port) = overrides.port {
        config.port = port;
    }
    config
}
