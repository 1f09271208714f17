//! Backend library modules.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
#[cfg(feature = "test-support")]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
/// Request correlation id propagated via the `trace-id` header.
pub use domain::TraceId;
/// Middleware scoping a [`TraceId`] around each request.
pub use middleware::Trace;
