//! Inbound ports: capabilities supplied by the application.

use crate::domain::{Envelope, Request, Response};
use async_trait::async_trait;

/// Dispatches an inbound request to a handler.
///
/// Routers are usually layered: each layer consumes one URL segment through
/// [`Request::prefix`] and hands [`Request::route_without_prefix`] to the
/// next.
#[async_trait]
pub trait Router: Send + Sync {
    /// Handle a request and produce its response.
    ///
    /// The session stamps the request ID onto the returned response, so
    /// implementations may build it with any ID.
    async fn handle(&self, request: &Request) -> Response;
}

/// Self-validation for decoded request bodies.
pub trait Validatable {
    /// `Ok(())` when valid, otherwise the envelope to return to the caller.
    fn validate(&self) -> Result<(), Envelope>;
}
