//! Request-scoped session context handed to the upstream client.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The logged-in user as returned by the upstream login endpoint.
///
/// Only `id` is relied upon; the rest is carried for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Per-request context: the bearer token and user held in the session.
///
/// Built fresh for every request and passed explicitly into each upstream
/// call. The token is a [`SecretString`] so it never shows up in `Debug`
/// output or logs.
#[derive(Debug, Default)]
pub struct RequestContext {
    pub token: Option<SecretString>,
    pub user: Option<SessionUser>,
}

impl RequestContext {
    /// Context for an anonymous visitor.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Context carrying a token and (optionally) a user.
    pub fn authenticated(token: impl Into<String>, user: Option<SessionUser>) -> Self {
        Self {
            token: Some(SecretString::from(token.into())),
            user,
        }
    }

    pub fn with_user(mut self, user: SessionUser) -> Self {
        self.user = Some(user);
        self
    }
}
