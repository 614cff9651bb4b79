//! Controller actions.
//!
//! Each service is generic over [`UpstreamApi`] so tests can swap in a
//! scripted stub; the web crate pins them to the reqwest client.

pub mod auth;
pub mod event;
pub mod speaker;
pub mod speaker_admin;

use tracing::{error, warn};

use estrado_types::error::UpstreamError;
use estrado_types::payload::Payload;
use estrado_types::session::RequestContext;
use estrado_types::upload::UploadedFile;

use crate::endpoint::{Endpoint, dispatch};
use crate::upstream::UpstreamApi;

/// Whether upstream error text may appear in user-facing flash messages.
///
/// The full error is always logged; this only decides what the user sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorDisclosure {
    /// `"{message}: {error}"`.
    #[default]
    Detailed,
    /// Just the localized message.
    Generic,
}

impl ErrorDisclosure {
    pub fn from_config(expose_error_details: bool) -> Self {
        if expose_error_details {
            ErrorDisclosure::Detailed
        } else {
            ErrorDisclosure::Generic
        }
    }

    pub fn message(self, base: &str, error: &UpstreamError) -> String {
        match self {
            ErrorDisclosure::Detailed => format!("{base}: {error}"),
            ErrorDisclosure::Generic => base.to_string(),
        }
    }
}

/// Read an endpoint and unwrap its envelope.
///
/// Upstream failures are logged and treated like an empty response.
pub(crate) async fn fetch<A: UpstreamApi>(
    api: &A,
    ctx: &RequestContext,
    endpoint: Endpoint<'_>,
) -> Option<Payload> {
    match dispatch(api, ctx, endpoint, None, None).await {
        Ok(payload) => endpoint.envelope().extract(payload),
        Err(e) => {
            error!(endpoint = endpoint.name(), error = %e, "Upstream read failed");
            None
        }
    }
}

/// Result of a write call judged against the endpoint's success rule.
#[derive(Debug)]
pub(crate) enum Submission {
    Accepted(Payload),
    Rejected,
    Failed(UpstreamError),
}

pub(crate) async fn submit<A: UpstreamApi>(
    api: &A,
    ctx: &RequestContext,
    endpoint: Endpoint<'_>,
    body: Option<&Payload>,
    file: Option<&UploadedFile>,
) -> Submission {
    match dispatch(api, ctx, endpoint, body, file).await {
        Ok(response) if endpoint.success_rule().accepts(&response) => Submission::Accepted(response),
        Ok(response) => {
            warn!(
                endpoint = endpoint.name(),
                response = %response,
                "Upstream did not accept the request"
            );
            Submission::Rejected
        }
        Err(e) => {
            error!(
                endpoint = endpoint.name(),
                error = %e,
                detail = ?e,
                "Upstream write failed"
            );
            Submission::Failed(e)
        }
    }
}
