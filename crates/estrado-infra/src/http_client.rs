//! reqwest implementation of the upstream API port.
//!
//! Paths are joined onto the configured base URL. Every request asks for
//! JSON and carries the session's bearer token when one is present. Plain
//! verbs send JSON bodies; the file verbs send `multipart/form-data`.

use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::{Method, RequestBuilder, Response};
use secrecy::ExposeSecret;
use serde_json::Value;
use tracing::{debug, warn};

use estrado_core::upstream::UpstreamApi;
use estrado_types::error::UpstreamError;
use estrado_types::payload::Payload;
use estrado_types::session::RequestContext;
use estrado_types::upload::UploadedFile;

/// Upstream client over a shared `reqwest::Client`. Cloning is cheap.
#[derive(Debug, Clone)]
pub struct HttpUpstreamClient {
    base_url: String,
    http: reqwest::Client,
}

impl HttpUpstreamClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, UpstreamError> {
        let trimmed = base_url.trim_end_matches('/');
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Err(UpstreamError::InvalidUrl(base_url.to_string()));
        }

        let http = reqwest::Client::builder()
            .user_agent(concat!("estrado/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| UpstreamError::Transport(e.to_string()))?;

        Ok(Self {
            base_url: trimmed.to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, ctx: &RequestContext, method: Method, path: &str) -> RequestBuilder {
        let builder = self
            .http
            .request(method, self.url(path))
            .header(reqwest::header::ACCEPT, "application/json");
        match &ctx.token {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        }
    }

    async fn send(
        &self,
        method: &Method,
        path: &str,
        builder: RequestBuilder,
    ) -> Result<Payload, UpstreamError> {
        debug!(%method, path, "upstream request");
        let response = builder.send().await.map_err(|e| {
            warn!(%method, path, error = %e, "upstream request failed");
            UpstreamError::Transport(e.to_string())
        })?;
        read_response(response).await
    }

    async fn json_call(
        &self,
        ctx: &RequestContext,
        method: Method,
        path: &str,
        body: Option<&Payload>,
    ) -> Result<Payload, UpstreamError> {
        let mut builder = self.request(ctx, method.clone(), path);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        self.send(&method, path, builder).await
    }

    async fn multipart_call(
        &self,
        ctx: &RequestContext,
        path: &str,
        file: &UploadedFile,
        body: &Payload,
        override_method: Option<&str>,
    ) -> Result<Payload, UpstreamError> {
        let mut form = multipart_form(body, file)?;
        if let Some(method) = override_method {
            form = form.text("_method", method.to_string());
        }
        let builder = self.request(ctx, Method::POST, path).multipart(form);
        self.send(&Method::POST, path, builder).await
    }
}

impl UpstreamApi for HttpUpstreamClient {
    async fn get(&self, ctx: &RequestContext, path: &str) -> Result<Payload, UpstreamError> {
        self.json_call(ctx, Method::GET, path, None).await
    }

    async fn post(
        &self,
        ctx: &RequestContext,
        path: &str,
        body: &Payload,
    ) -> Result<Payload, UpstreamError> {
        self.json_call(ctx, Method::POST, path, Some(body)).await
    }

    async fn put(
        &self,
        ctx: &RequestContext,
        path: &str,
        body: &Payload,
    ) -> Result<Payload, UpstreamError> {
        self.json_call(ctx, Method::PUT, path, Some(body)).await
    }

    async fn delete(&self, ctx: &RequestContext, path: &str) -> Result<Payload, UpstreamError> {
        self.json_call(ctx, Method::DELETE, path, None).await
    }

    async fn post_with_file(
        &self,
        ctx: &RequestContext,
        path: &str,
        file: &UploadedFile,
        body: &Payload,
    ) -> Result<Payload, UpstreamError> {
        self.multipart_call(ctx, path, file, body, None).await
    }

    async fn put_with_file(
        &self,
        ctx: &RequestContext,
        path: &str,
        file: &UploadedFile,
        body: &Payload,
    ) -> Result<Payload, UpstreamError> {
        // Sent as POST; the upstream reads the verb from `_method`.
        self.multipart_call(ctx, path, file, body, Some("PUT")).await
    }
}

/// Map an upstream response to a payload or an error.
async fn read_response(response: Response) -> Result<Payload, UpstreamError> {
    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| UpstreamError::Transport(e.to_string()))?;

    if !status.is_success() {
        return Err(UpstreamError::Status {
            status: status.as_u16(),
            message: error_message(&text),
        });
    }

    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(&text).map_err(|e| UpstreamError::Decode(e.to_string()))
}

/// Pull a readable message out of an error body.
fn error_message(text: &str) -> String {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(text) {
        for key in ["message", "error"] {
            if let Some(Value::String(s)) = map.get(key) {
                return s.clone();
            }
        }
    }
    text.trim().to_string()
}

fn form_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(true) => "1".to_string(),
        Value::Bool(false) => "0".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Flatten a JSON object into multipart text parts and attach the file.
fn multipart_form(body: &Payload, file: &UploadedFile) -> Result<Form, UpstreamError> {
    let mut form = Form::new();
    if let Value::Object(map) = body {
        for (key, value) in map {
            match value {
                Value::Array(items) => {
                    for item in items {
                        form = form.text(format!("{key}[]"), form_value(item));
                    }
                }
                other => form = form.text(key.clone(), form_value(other)),
            }
        }
    }

    let part = Part::bytes(file.bytes.clone())
        .file_name(file.file_name.clone())
        .mime_str(&file.content_type)
        .map_err(|e| UpstreamError::Upload(e.to_string()))?;
    Ok(form.part(file.field.clone(), part))
}
