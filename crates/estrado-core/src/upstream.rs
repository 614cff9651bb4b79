//! Upstream API port.

use estrado_types::error::UpstreamError;
use estrado_types::payload::Payload;
use estrado_types::session::RequestContext;
use estrado_types::upload::UploadedFile;

/// Generic client for the upstream events API.
///
/// Implementations live in estrado-infra (e.g., `HttpUpstreamClient`).
/// Every call receives the request-scoped [`RequestContext`] so the bearer
/// token travels explicitly instead of through ambient state. Successful
/// calls return the decoded JSON body (`Payload::Null` for an empty body);
/// transport failures and non-2xx statuses are errors.
///
/// Uses native async fn in traits (Rust 2024 edition, no async_trait macro).
pub trait UpstreamApi: Send + Sync {
    fn get(
        &self,
        ctx: &RequestContext,
        path: &str,
    ) -> impl std::future::Future<Output = Result<Payload, UpstreamError>> + Send;

    fn post(
        &self,
        ctx: &RequestContext,
        path: &str,
        body: &Payload,
    ) -> impl std::future::Future<Output = Result<Payload, UpstreamError>> + Send;

    fn put(
        &self,
        ctx: &RequestContext,
        path: &str,
        body: &Payload,
    ) -> impl std::future::Future<Output = Result<Payload, UpstreamError>> + Send;

    fn delete(
        &self,
        ctx: &RequestContext,
        path: &str,
    ) -> impl std::future::Future<Output = Result<Payload, UpstreamError>> + Send;

    /// POST as multipart: `body` fields plus `file`.
    fn post_with_file(
        &self,
        ctx: &RequestContext,
        path: &str,
        file: &UploadedFile,
        body: &Payload,
    ) -> impl std::future::Future<Output = Result<Payload, UpstreamError>> + Send;

    /// PUT as multipart: `body` fields plus `file`.
    fn put_with_file(
        &self,
        ctx: &RequestContext,
        path: &str,
        file: &UploadedFile,
        body: &Payload,
    ) -> impl std::future::Future<Output = Result<Payload, UpstreamError>> + Send;
}
