//! `/admin/speakers`. Every route requires a session token.

use axum::extract::{Path, State};
use axum::response::Response;

use crate::http::extractors::session::{RequireToken, WebSession};
use crate::http::extractors::speaker_form::SpeakerMultipart;
use crate::http::respond::respond;
use crate::state::AppState;

pub async fn index(
    State(state): State<AppState>,
    _guard: RequireToken,
    session: WebSession,
) -> Response {
    let outcome = state.speaker_admin_service.index(&session.context()).await;
    respond(&state, session, outcome).await
}

pub async fn create(
    State(state): State<AppState>,
    _guard: RequireToken,
    session: WebSession,
) -> Response {
    let outcome = state.speaker_admin_service.create_form();
    respond(&state, session, outcome).await
}

pub async fn store(
    State(state): State<AppState>,
    _guard: RequireToken,
    session: WebSession,
    SpeakerMultipart(form): SpeakerMultipart,
) -> Response {
    let outcome = state
        .speaker_admin_service
        .store(&session.context(), form)
        .await;
    respond(&state, session, outcome).await
}

pub async fn show(
    State(state): State<AppState>,
    _guard: RequireToken,
    session: WebSession,
    Path(id): Path<String>,
) -> Response {
    let outcome = state
        .speaker_admin_service
        .show(&session.context(), &id)
        .await;
    respond(&state, session, outcome).await
}

pub async fn edit(
    State(state): State<AppState>,
    _guard: RequireToken,
    session: WebSession,
    Path(id): Path<String>,
) -> Response {
    let outcome = state
        .speaker_admin_service
        .edit(&session.context(), &id)
        .await;
    respond(&state, session, outcome).await
}

pub async fn update(
    State(state): State<AppState>,
    _guard: RequireToken,
    session: WebSession,
    Path(id): Path<String>,
    SpeakerMultipart(form): SpeakerMultipart,
) -> Response {
    let outcome = state
        .speaker_admin_service
        .update(&session.context(), &id, form)
        .await;
    respond(&state, session, outcome).await
}

pub async fn destroy(
    State(state): State<AppState>,
    _guard: RequireToken,
    session: WebSession,
    Path(id): Path<String>,
) -> Response {
    let outcome = state
        .speaker_admin_service
        .destroy(&session.context(), &id)
        .await;
    respond(&state, session, outcome).await
}

/// GET /admin/speakers/export
pub async fn export(
    State(state): State<AppState>,
    _guard: RequireToken,
    session: WebSession,
) -> Response {
    let outcome = state.speaker_admin_service.export(&session.context()).await;
    respond(&state, session, outcome).await
}
