//! `/events`, event registration and registration cancellation.

use axum::extract::{Path, State};
use axum::response::Response;
use axum::Form;

use estrado_core::form::EventForm;

use crate::http::extractors::session::{RequireToken, WebSession};
use crate::http::respond::respond;
use crate::state::AppState;

/// GET /events
pub async fn index(State(state): State<AppState>, session: WebSession) -> Response {
    let outcome = state.event_service.index(&session.context()).await;
    respond(&state, session, outcome).await
}

/// GET /events/create
pub async fn create(
    State(state): State<AppState>,
    _guard: RequireToken,
    session: WebSession,
) -> Response {
    let outcome = state.event_service.create_form(&session.context()).await;
    respond(&state, session, outcome).await
}

/// POST /events
pub async fn store(
    State(state): State<AppState>,
    _guard: RequireToken,
    session: WebSession,
    Form(form): Form<EventForm>,
) -> Response {
    let outcome = state.event_service.store(&session.context(), form).await;
    respond(&state, session, outcome).await
}

/// GET /events/{id}
pub async fn show(
    State(state): State<AppState>,
    session: WebSession,
    Path(id): Path<String>,
) -> Response {
    let outcome = state.event_service.show(&session.context(), &id).await;
    respond(&state, session, outcome).await
}

/// GET /events/{id}/edit
pub async fn edit(
    State(state): State<AppState>,
    _guard: RequireToken,
    session: WebSession,
    Path(id): Path<String>,
) -> Response {
    let outcome = state.event_service.edit(&session.context(), &id).await;
    respond(&state, session, outcome).await
}

/// PUT /events/{id}
pub async fn update(
    State(state): State<AppState>,
    _guard: RequireToken,
    session: WebSession,
    Path(id): Path<String>,
    Form(form): Form<EventForm>,
) -> Response {
    let outcome = state.event_service.update(&session.context(), &id, form).await;
    respond(&state, session, outcome).await
}

/// DELETE /events/{id}
pub async fn destroy(
    State(state): State<AppState>,
    _guard: RequireToken,
    session: WebSession,
    Path(id): Path<String>,
) -> Response {
    let outcome = state.event_service.destroy(&session.context(), &id).await;
    respond(&state, session, outcome).await
}

/// GET /events/{id}/register
pub async fn registration_form(
    State(state): State<AppState>,
    _guard: RequireToken,
    session: WebSession,
    Path(id): Path<String>,
) -> Response {
    let outcome = state
        .event_service
        .registration_form(&session.context(), &id)
        .await;
    respond(&state, session, outcome).await
}

/// POST /events/{id}/register
pub async fn register(
    State(state): State<AppState>,
    _guard: RequireToken,
    session: WebSession,
    Path(id): Path<String>,
) -> Response {
    let outcome = state.event_service.register(&session.context(), &id).await;
    respond(&state, session, outcome).await
}

/// GET /events/{id}/register/success
pub async fn registration_success(
    State(state): State<AppState>,
    _guard: RequireToken,
    session: WebSession,
    Path(id): Path<String>,
) -> Response {
    let outcome = state
        .event_service
        .registration_success(&session.context(), &id)
        .await;
    respond(&state, session, outcome).await
}

/// DELETE /registrations/{id}
pub async fn cancel_registration(
    State(state): State<AppState>,
    _guard: RequireToken,
    session: WebSession,
    Path(id): Path<String>,
) -> Response {
    let outcome = state
        .event_service
        .cancel_registration(&session.context(), &id)
        .await;
    respond(&state, session, outcome).await
}
