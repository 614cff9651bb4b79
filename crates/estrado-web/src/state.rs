//! Application state wiring all services together.
//!
//! Services are generic over the upstream port; AppState pins them to the
//! reqwest client from estrado-infra.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;

use estrado_core::service::ErrorDisclosure;
use estrado_core::service::auth::AuthService;
use estrado_core::service::event::EventService;
use estrado_core::service::speaker::SpeakerDirectoryService;
use estrado_core::service::speaker_admin::SpeakerAdminService;
use estrado_infra::http_client::HttpUpstreamClient;
use estrado_infra::session::SessionStore;
use estrado_types::config::FrontendConfig;

use crate::http::render::Renderer;

pub type ConcreteSpeakerAdminService = SpeakerAdminService<HttpUpstreamClient>;
pub type ConcreteEventService = EventService<HttpUpstreamClient>;
pub type ConcreteSpeakerDirectoryService = SpeakerDirectoryService<HttpUpstreamClient>;
pub type ConcreteAuthService = AuthService<HttpUpstreamClient>;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub speaker_admin_service: Arc<ConcreteSpeakerAdminService>,
    pub event_service: Arc<ConcreteEventService>,
    pub speaker_service: Arc<ConcreteSpeakerDirectoryService>,
    pub auth_service: Arc<ConcreteAuthService>,
    pub sessions: SessionStore,
    pub renderer: Arc<Renderer>,
    pub config: Arc<FrontendConfig>,
}

impl AppState {
    /// Validate the config, build the upstream client and wire services.
    pub fn init(config: FrontendConfig) -> anyhow::Result<Self> {
        config.validate()?;

        let client = HttpUpstreamClient::new(
            &config.api_base_url,
            Duration::from_secs(config.request_timeout_secs),
        )
        .context("Failed to build upstream client")?;
        let disclosure = ErrorDisclosure::from_config(config.expose_error_details);
        let renderer = Renderer::new().context("Failed to load templates")?;

        tracing::debug!(
            api_base_url = %client.base_url(),
            ?disclosure,
            "Application state initialized"
        );

        Ok(Self {
            speaker_admin_service: Arc::new(SpeakerAdminService::new(client.clone(), disclosure)),
            event_service: Arc::new(EventService::new(client.clone(), disclosure)),
            speaker_service: Arc::new(SpeakerDirectoryService::new(client.clone())),
            auth_service: Arc::new(AuthService::new(client)),
            sessions: SessionStore::new(),
            renderer: Arc::new(renderer),
            config: Arc::new(config),
        })
    }
}
