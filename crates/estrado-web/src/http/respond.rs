//! Turning an action `Outcome` into an HTTP response.

use std::path::Path;

use axum::http::header;
use axum::response::{Html, IntoResponse, Redirect, Response};

use estrado_core::outcome::{Outcome, View};
use estrado_types::flash::FlashBag;

use crate::http::error::AppError;
use crate::http::extractors::session::WebSession;
use crate::http::render::PageData;
use crate::state::AppState;

pub async fn respond(state: &AppState, session: WebSession, outcome: Outcome) -> Response {
    let response = match outcome {
        Outcome::Render(view) => render(state, &session, &view),
        Outcome::Redirect { to, flash } => {
            state.sessions.flash(
                &session.id,
                FlashBag {
                    flash: Some(flash),
                    ..Default::default()
                },
            );
            Redirect::to(&to.path()).into_response()
        }
        Outcome::Back(bag) => {
            state.sessions.flash(&session.id, bag);
            Redirect::to(&session.previous_url).into_response()
        }
        Outcome::Download { path } => download(&path)
            .await
            .unwrap_or_else(IntoResponse::into_response),
    };
    session.finish(&state.sessions, response)
}

fn render(state: &AppState, session: &WebSession, view: &View) -> Response {
    let page = PageData {
        flashed: &session.data.flashed,
        user: session.data.user.as_ref(),
        storage_url: &state.config.storage_url,
    };
    match state.renderer.render(view, &page) {
        Ok(html) => Html(html).into_response(),
        Err(e) => AppError::from(e).into_response(),
    }
}

/// Send a local file as an attachment.
pub async fn download(path: &Path) -> Result<Response, AppError> {
    let bytes = tokio::fs::read(path).await?;
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("export")
        .replace('"', "");
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    let content_type = match extension.as_deref() {
        Some("csv") => "text/csv; charset=utf-8",
        Some("json") => "application/json",
        Some("xlsx") => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        _ => "application/octet-stream",
    };

    tracing::info!(path = %path.display(), bytes = bytes.len(), "Sending download");
    Ok((
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        bytes,
    )
        .into_response())
}
