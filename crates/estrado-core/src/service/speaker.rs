//! Public speaker directory.

use estrado_types::session::RequestContext;

use crate::endpoint::Endpoint;
use crate::outcome::{Outcome, View};
use crate::service::fetch;
use crate::upstream::UpstreamApi;

const LIST_FAILED: &str = "No se pudieron cargar los ponentes";
const LOAD_FAILED: &str = "No se pudo cargar el ponente";

/// Controller for `/speakers`. Views get the raw upstream body and read
/// the nested `speakers` / `speaker` keys themselves.
pub struct SpeakerDirectoryService<A: UpstreamApi> {
    api: A,
}

impl<A: UpstreamApi> SpeakerDirectoryService<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }

    pub async fn index(&self, ctx: &RequestContext) -> Outcome {
        match fetch(&self.api, ctx, Endpoint::SpeakerDirectory).await {
            Some(speakers) => Outcome::Render(View::new("speakers/index").with("speakers", speakers)),
            None => Outcome::back_with_error(LIST_FAILED),
        }
    }

    pub async fn show(&self, ctx: &RequestContext, id: &str) -> Outcome {
        match fetch(&self.api, ctx, Endpoint::SpeakerProfile(id)).await {
            Some(speaker) => Outcome::Render(View::new("speakers/show").with("speaker", speaker)),
            None => Outcome::back_with_error(LOAD_FAILED),
        }
    }
}
