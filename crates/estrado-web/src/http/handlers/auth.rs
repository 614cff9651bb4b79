//! Login, logout and email verification.

use axum::extract::{Path, State};
use axum::response::Response;
use axum::Form;

use estrado_core::form::LoginForm;

use crate::http::extractors::session::WebSession;
use crate::http::respond::respond;
use crate::state::AppState;

/// GET /login
pub async fn login_form(State(state): State<AppState>, session: WebSession) -> Response {
    let outcome = state.auth_service.login_form();
    respond(&state, session, outcome).await
}

/// POST /login
pub async fn login(
    State(state): State<AppState>,
    mut session: WebSession,
    Form(form): Form<LoginForm>,
) -> Response {
    let result = state.auth_service.login(&session.context(), form).await;
    if let Some(grant) = result.grant {
        session.regenerate(&state.sessions);
        state.sessions.authenticate(&session.id, grant.token, grant.user);
    }
    respond(&state, session, result.outcome).await
}

/// POST /logout
pub async fn logout(State(state): State<AppState>, mut session: WebSession) -> Response {
    state.sessions.forget_credentials(&session.id);
    session.regenerate(&state.sessions);
    let outcome = state.auth_service.logout();
    respond(&state, session, outcome).await
}

/// GET /email/verify/{token}
pub async fn verify_email(
    State(state): State<AppState>,
    session: WebSession,
    Path(token): Path<String>,
) -> Response {
    let outcome = state
        .auth_service
        .verify_email(&session.context(), &token)
        .await;
    respond(&state, session, outcome).await
}
