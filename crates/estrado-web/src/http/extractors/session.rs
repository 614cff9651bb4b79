//! Cookie-backed session extractor and the login guard.
//!
//! The session id travels in the `estrado_session` cookie. A request without
//! a known id gets a fresh session; the cookie is set on the response.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{HeaderMap, HeaderValue, Uri, header};
use axum::response::{IntoResponse, Redirect, Response};

use estrado_core::outcome::Route;
use estrado_core::service::auth::LOGIN_REQUIRED;
use estrado_infra::session::{SessionData, SessionStore};
use estrado_types::flash::{Flash, FlashBag};
use estrado_types::session::RequestContext;

use crate::state::AppState;

pub const SESSION_COOKIE: &str = "estrado_session";

/// The current visitor's session, with this request's flash already taken.
#[derive(Debug)]
pub struct WebSession {
    pub id: String,
    pub is_new: bool,
    pub data: SessionData,
    /// Where "back" redirects go: the `Referer`, or `/`.
    pub previous_url: String,
}

impl WebSession {
    pub fn context(&self) -> RequestContext {
        self.data.context()
    }

    /// Move this session to a fresh id, as on login and logout. The new
    /// cookie goes out with the response.
    pub fn regenerate(&mut self, sessions: &SessionStore) {
        self.id = sessions.regenerate(&self.id);
        self.is_new = true;
    }

    /// Attach the session cookie when this request created or rotated the
    /// session and something was stored in it.
    pub fn finish(&self, sessions: &SessionStore, response: Response) -> Response {
        if self.is_new && sessions.exists(&self.id) {
            with_session_cookie(response, &self.id)
        } else {
            response
        }
    }
}

impl FromRequestParts<AppState> for WebSession {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let (id, is_new) = resolve_session(&parts.headers, &state.sessions);
        let data = state.sessions.load(&id);
        let previous_url = back_target(&parts.headers);

        Ok(Self {
            id,
            is_new,
            data,
            previous_url,
        })
    }
}

/// Guard for routes that need an upstream token in the session.
///
/// Without one the request is redirected to the login page with a flash.
/// Put it before [`WebSession`] in the handler arguments so a rejected
/// request does not consume the pending flash.
pub struct RequireToken;

impl FromRequestParts<AppState> for RequireToken {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let (id, is_new) = resolve_session(&parts.headers, &state.sessions);
        if state.sessions.credentials(&id).0.is_some() {
            return Ok(RequireToken);
        }

        tracing::debug!(path = %parts.uri.path(), "No session token, redirecting to login");
        state.sessions.flash(
            &id,
            FlashBag {
                flash: Some(Flash::error(LOGIN_REQUIRED)),
                ..Default::default()
            },
        );
        let response = Redirect::to(&Route::Login.path()).into_response();
        Err(if is_new {
            with_session_cookie(response, &id)
        } else {
            response
        })
    }
}

/// The `Referer` when it points at this site, otherwise `/`.
fn back_target(headers: &HeaderMap) -> String {
    let Some(referer) = headers
        .get(header::REFERER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
    else {
        return "/".to_string();
    };

    let same_site = match referer.parse::<Uri>() {
        Ok(uri) => match (uri.scheme_str(), uri.authority()) {
            (Some("http" | "https"), Some(authority)) => headers
                .get(header::HOST)
                .and_then(|h| h.to_str().ok())
                .is_some_and(|host| authority.as_str().eq_ignore_ascii_case(host.trim())),
            (None, None) => referer.starts_with('/') && !referer.starts_with("//"),
            _ => false,
        },
        Err(_) => false,
    };

    if same_site {
        referer.to_string()
    } else {
        tracing::debug!(%referer, "Ignoring off-site referer for back redirect");
        "/".to_string()
    }
}

/// Existing session id from the cookie, or a freshly started one.
fn resolve_session(headers: &HeaderMap, sessions: &SessionStore) -> (String, bool) {
    match session_id_from_headers(headers).filter(|id| sessions.exists(id)) {
        Some(id) => (id, false),
        None => (sessions.start(), true),
    }
}

pub fn session_id_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

pub fn session_cookie(id: &str) -> String {
    format!("{SESSION_COOKIE}={id}; Path=/; HttpOnly; SameSite=Lax")
}

pub fn with_session_cookie(mut response: Response, id: &str) -> Response {
    if let Ok(value) = HeaderValue::from_str(&session_cookie(id)) {
        response.headers_mut().append(header::SET_COOKIE, value);
    }
    response
}
