//! Public speaker directory.

use axum::extract::{Path, State};
use axum::response::Response;

use crate::http::extractors::session::WebSession;
use crate::http::respond::respond;
use crate::state::AppState;

/// GET /speakers
pub async fn index(State(state): State<AppState>, session: WebSession) -> Response {
    let outcome = state.speaker_service.index(&session.context()).await;
    respond(&state, session, outcome).await
}

/// GET /speakers/{id}
pub async fn show(
    State(state): State<AppState>,
    session: WebSession,
    Path(id): Path<String>,
) -> Response {
    let outcome = state.speaker_service.show(&session.context(), &id).await;
    respond(&state, session, outcome).await
}
