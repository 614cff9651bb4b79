//! Declarative table of upstream endpoints.
//!
//! The upstream API is inconsistent: some endpoints return the entity at the
//! root, others wrap it under a key, and every write endpoint signals
//! acceptance differently. Each call site is listed once here with its verb,
//! path, [`Envelope`] and [`SuccessRule`], so controller actions never branch
//! on response shapes themselves.

use std::fmt;

use serde_json::Value;

use estrado_types::error::UpstreamError;
use estrado_types::payload::{Payload, is_empty_payload, is_truthy};
use estrado_types::session::RequestContext;
use estrado_types::upload::UploadedFile;

use crate::upstream::UpstreamApi;

/// Exact message the upstream returns after a successful speaker update.
pub const SPEAKER_UPDATED_MESSAGE: &str = "El ponente ha sido actualizado correctamente";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
            Method::Put => write!(f, "PUT"),
            Method::Delete => write!(f, "DELETE"),
        }
    }
}

/// Where the useful data sits inside a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Envelope {
    /// The whole body is the data; an empty body means "nothing".
    Root,
    /// The data sits under this key; a missing or null key means "nothing".
    Key(&'static str),
}

impl Envelope {
    /// Pull the data out of a response, `None` when there is nothing usable.
    pub fn extract(self, payload: Payload) -> Option<Payload> {
        match self {
            Envelope::Root => (!is_empty_payload(&payload)).then_some(payload),
            Envelope::Key(key) => match payload {
                Value::Object(mut map) => map.remove(key).filter(|v| !v.is_null()),
                _ => None,
            },
        }
    }
}

/// How a write endpoint signals that it accepted the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuccessRule {
    /// `data_count` is exactly the integer 1.
    DataCountIsOne,
    /// `message` equals this literal.
    MessageEquals(&'static str),
    /// `success` is truthy.
    SuccessFlag,
    /// The body is non-empty.
    NonEmpty,
    /// `token` is a non-empty string.
    TokenPresent,
}

impl SuccessRule {
    pub fn accepts(self, response: &Payload) -> bool {
        match self {
            SuccessRule::DataCountIsOne => {
                response.get("data_count").and_then(Value::as_i64) == Some(1)
            }
            SuccessRule::MessageEquals(expected) => {
                response.get("message").and_then(Value::as_str) == Some(expected)
            }
            SuccessRule::SuccessFlag => response.get("success").is_some_and(is_truthy),
            SuccessRule::NonEmpty => !is_empty_payload(response),
            SuccessRule::TokenPresent => response
                .get("token")
                .and_then(Value::as_str)
                .is_some_and(|t| !t.is_empty()),
        }
    }
}

/// Every upstream call site used by the controller actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint<'a> {
    AdminSpeakerList,
    AdminSpeakerShow(&'a str),
    AdminSpeakerEdit(&'a str),
    SpeakerCreate,
    SpeakerUpdate(&'a str),
    SpeakerDelete(&'a str),
    SpeakerExport,
    SpeakerDirectory,
    SpeakerProfile(&'a str),
    SpeakerOptions,
    EventList,
    EventShow(&'a str),
    EventCreate,
    EventUpdate(&'a str),
    EventDelete(&'a str),
    EventAvailability(&'a str),
    EventRegister(&'a str),
    EventRegistration(&'a str),
    RegistrationCancel(&'a str),
    VerifyEmail,
    Login,
}

impl Endpoint<'_> {
    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Endpoint::AdminSpeakerList => "admin.speakers.index",
            Endpoint::AdminSpeakerShow(_) => "admin.speakers.show",
            Endpoint::AdminSpeakerEdit(_) => "admin.speakers.edit",
            Endpoint::SpeakerCreate => "admin.speakers.store",
            Endpoint::SpeakerUpdate(_) => "admin.speakers.update",
            Endpoint::SpeakerDelete(_) => "admin.speakers.destroy",
            Endpoint::SpeakerExport => "admin.speakers.export",
            Endpoint::SpeakerDirectory => "speakers.index",
            Endpoint::SpeakerProfile(_) => "speakers.show",
            Endpoint::SpeakerOptions => "ponentes.index",
            Endpoint::EventList => "events.index",
            Endpoint::EventShow(_) => "events.show",
            Endpoint::EventCreate => "events.store",
            Endpoint::EventUpdate(_) => "events.update",
            Endpoint::EventDelete(_) => "events.destroy",
            Endpoint::EventAvailability(_) => "events.availability",
            Endpoint::EventRegister(_) => "events.register",
            Endpoint::EventRegistration(_) => "events.registration",
            Endpoint::RegistrationCancel(_) => "registrations.destroy",
            Endpoint::VerifyEmail => "email.verify",
            Endpoint::Login => "login",
        }
    }

    pub fn method(&self) -> Method {
        match self {
            Endpoint::SpeakerCreate
            | Endpoint::EventCreate
            | Endpoint::EventRegister(_)
            | Endpoint::VerifyEmail
            | Endpoint::Login => Method::Post,
            Endpoint::SpeakerUpdate(_) | Endpoint::EventUpdate(_) => Method::Put,
            Endpoint::SpeakerDelete(_)
            | Endpoint::EventDelete(_)
            | Endpoint::RegistrationCancel(_) => Method::Delete,
            _ => Method::Get,
        }
    }

    /// Upstream path, relative to the configured base URL.
    pub fn path(&self) -> String {
        match self {
            Endpoint::AdminSpeakerList | Endpoint::SpeakerCreate | Endpoint::SpeakerDirectory => {
                "/speakers".to_string()
            }
            Endpoint::AdminSpeakerShow(id)
            | Endpoint::AdminSpeakerEdit(id)
            | Endpoint::SpeakerUpdate(id)
            | Endpoint::SpeakerDelete(id)
            | Endpoint::SpeakerProfile(id) => format!("/speakers/{id}"),
            Endpoint::SpeakerExport => "/speakers/export".to_string(),
            Endpoint::SpeakerOptions => "/ponentes".to_string(),
            Endpoint::EventList | Endpoint::EventCreate => "/events".to_string(),
            Endpoint::EventShow(id) | Endpoint::EventUpdate(id) | Endpoint::EventDelete(id) => {
                format!("/events/{id}")
            }
            Endpoint::EventAvailability(id) => format!("/events/{id}/availability"),
            Endpoint::EventRegister(id) | Endpoint::EventRegistration(id) => {
                format!("/events/{id}/register")
            }
            Endpoint::RegistrationCancel(id) => format!("/registrations/{id}"),
            Endpoint::VerifyEmail => "/v1/verify-email".to_string(),
            Endpoint::Login => "/login".to_string(),
        }
    }

    pub fn envelope(&self) -> Envelope {
        match self {
            Endpoint::AdminSpeakerList => Envelope::Key("speakers"),
            Endpoint::AdminSpeakerEdit(_) => Envelope::Key("speaker"),
            Endpoint::SpeakerExport => Envelope::Key("file_path"),
            _ => Envelope::Root,
        }
    }

    pub fn success_rule(&self) -> SuccessRule {
        match self {
            Endpoint::SpeakerCreate => SuccessRule::DataCountIsOne,
            Endpoint::SpeakerUpdate(_) => SuccessRule::MessageEquals(SPEAKER_UPDATED_MESSAGE),
            Endpoint::SpeakerDelete(_)
            | Endpoint::EventCreate
            | Endpoint::EventUpdate(_)
            | Endpoint::EventDelete(_)
            | Endpoint::VerifyEmail => SuccessRule::SuccessFlag,
            Endpoint::Login => SuccessRule::TokenPresent,
            _ => SuccessRule::NonEmpty,
        }
    }
}

/// Issue the call for `endpoint`, choosing the file-upload variant of the
/// verb when a file is present.
pub async fn dispatch<A: UpstreamApi>(
    api: &A,
    ctx: &RequestContext,
    endpoint: Endpoint<'_>,
    body: Option<&Payload>,
    file: Option<&UploadedFile>,
) -> Result<Payload, UpstreamError> {
    let path = endpoint.path();
    let empty = Payload::Object(Default::default());
    let body = body.unwrap_or(&empty);

    match (endpoint.method(), file) {
        (Method::Get, _) => api.get(ctx, &path).await,
        (Method::Delete, _) => api.delete(ctx, &path).await,
        (Method::Post, Some(file)) => api.post_with_file(ctx, &path, file, body).await,
        (Method::Post, None) => api.post(ctx, &path, body).await,
        (Method::Put, Some(file)) => api.put_with_file(ctx, &path, file, body).await,
        (Method::Put, None) => api.put(ctx, &path, body).await,
    }
}
