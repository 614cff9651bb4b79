//! HTML forms can only send GET and POST. A POST carrying `_method=PUT`,
//! `PATCH` or `DELETE` in its query string is rewritten to that method
//! before routing.

use axum::extract::Request;
use axum::http::Method;
use tower::util::{MapRequest, MapRequestLayer};

/// A service wrapped with the method override.
pub type MethodOverride<S> = MapRequest<S, fn(Request) -> Request>;

pub fn layer() -> MapRequestLayer<fn(Request) -> Request> {
    MapRequestLayer::new(override_method as fn(Request) -> Request)
}

pub fn override_method(mut req: Request) -> Request {
    if req.method() != Method::POST {
        return req;
    }
    if let Some(method) = req.uri().query().and_then(requested_method) {
        tracing::trace!(%method, path = %req.uri().path(), "Method override");
        *req.method_mut() = method;
    }
    req
}

fn requested_method(query: &str) -> Option<Method> {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == "_method")
        .and_then(|(_, value)| match value.to_ascii_uppercase().as_str() {
            "PUT" => Some(Method::PUT),
            "PATCH" => Some(Method::PATCH),
            "DELETE" => Some(Method::DELETE),
            _ => None,
        })
}
