//! Scripted upstream stub for controller tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use estrado_types::error::UpstreamError;
use estrado_types::payload::Payload;
use estrado_types::session::RequestContext;
use estrado_types::upload::UploadedFile;

use crate::endpoint::Method;
use crate::upstream::UpstreamApi;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Call {
    Get,
    Post,
    Put,
    Delete,
    PostWithFile,
    PutWithFile,
}

impl Call {
    fn method(self) -> Method {
        match self {
            Call::Get => Method::Get,
            Call::Post | Call::PostWithFile => Method::Post,
            Call::Put | Call::PutWithFile => Method::Put,
            Call::Delete => Method::Delete,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct RecordedCall {
    pub call: Call,
    pub path: String,
    pub body: Option<Payload>,
    pub file: Option<String>,
    pub had_token: bool,
}

type Scripted = Result<Payload, UpstreamError>;

/// Returns queued responses per (method, path); unscripted calls get `null`.
pub(crate) struct StubApi {
    responses: Mutex<HashMap<(Method, String), VecDeque<Scripted>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl StubApi {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn respond(self, method: Method, path: &str, payload: Payload) -> Self {
        self.push(method, path, Ok(payload))
    }

    pub fn fail(self, method: Method, path: &str, error: UpstreamError) -> Self {
        self.push(method, path, Err(error))
    }

    fn push(self, method: Method, path: &str, response: Scripted) -> Self {
        self.responses
            .lock()
            .unwrap()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(response);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Calls made with the given verb (file variants count as their verb).
    pub fn calls_with(&self, method: Method) -> Vec<RecordedCall> {
        self.calls()
            .into_iter()
            .filter(|c| c.call.method() == method)
            .collect()
    }

    fn record(
        &self,
        ctx: &RequestContext,
        call: Call,
        path: &str,
        body: Option<&Payload>,
        file: Option<&UploadedFile>,
    ) -> Scripted {
        self.calls.lock().unwrap().push(RecordedCall {
            call,
            path: path.to_string(),
            body: body.cloned(),
            file: file.map(|f| f.file_name.clone()),
            had_token: ctx.token.is_some(),
        });
        self.responses
            .lock()
            .unwrap()
            .get_mut(&(call.method(), path.to_string()))
            .and_then(VecDeque::pop_front)
            .unwrap_or(Ok(Payload::Null))
    }
}

impl UpstreamApi for StubApi {
    async fn get(&self, ctx: &RequestContext, path: &str) -> Result<Payload, UpstreamError> {
        self.record(ctx, Call::Get, path, None, None)
    }

    async fn post(
        &self,
        ctx: &RequestContext,
        path: &str,
        body: &Payload,
    ) -> Result<Payload, UpstreamError> {
        self.record(ctx, Call::Post, path, Some(body), None)
    }

    async fn put(
        &self,
        ctx: &RequestContext,
        path: &str,
        body: &Payload,
    ) -> Result<Payload, UpstreamError> {
        self.record(ctx, Call::Put, path, Some(body), None)
    }

    async fn delete(&self, ctx: &RequestContext, path: &str) -> Result<Payload, UpstreamError> {
        self.record(ctx, Call::Delete, path, None, None)
    }

    async fn post_with_file(
        &self,
        ctx: &RequestContext,
        path: &str,
        file: &UploadedFile,
        body: &Payload,
    ) -> Result<Payload, UpstreamError> {
        self.record(ctx, Call::PostWithFile, path, Some(body), Some(file))
    }

    async fn put_with_file(
        &self,
        ctx: &RequestContext,
        path: &str,
        file: &UploadedFile,
        body: &Payload,
    ) -> Result<Payload, UpstreamError> {
        self.record(ctx, Call::PutWithFile, path, Some(body), Some(file))
    }
}
