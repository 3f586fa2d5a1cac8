//! HTTP-style status + payload envelope.
//!
//! Every outcome that travels back to a caller, successful or not, is an
//! [`Envelope`]. Application failures are envelopes with a non-2xx status,
//! never Rust errors.

use crate::domain::request::Request;
use crate::domain::response::Response;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Status codes used by the envelope model.
pub mod status {
    pub const OK: u16 = 200;

    pub const BAD_REQUEST: u16 = 400;
    pub const UNAUTHORIZED: u16 = 401;
    pub const FORBIDDEN: u16 = 403;
    pub const NOT_FOUND: u16 = 404;
    pub const CONFLICT: u16 = 409;
    pub const UNSUPPORTED_MEDIA_TYPE: u16 = 415;
    pub const TOO_MANY_REQUESTS: u16 = 429;

    pub const INTERNAL_SERVER_ERROR: u16 = 500;
    pub const GATEWAY_TIMEOUT: u16 = 504;
}

/// Status and payload pair describing the outcome of a request.
///
/// On the wire this is `{ "status": <int>, "payload": <any> }`. A missing
/// status decodes as `0`, which the response classifier treats as "no
/// meaningful status".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// HTTP-style status code
    #[serde(default)]
    pub status: u16,
    /// Opaque payload, shape defined by the endpoint
    #[serde(default)]
    pub payload: Value,
}

impl Envelope {
    /// Create a `200 OK` envelope with an empty object payload.
    pub fn new() -> Self {
        Self {
            status: status::OK,
            payload: Value::Object(Default::default()),
        }
    }

    /// Set the status code.
    #[must_use]
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    /// Set the payload.
    #[must_use]
    pub fn with_payload(mut self, payload: impl Into<Value>) -> Self {
        self.payload = payload.into();
        self
    }

    /// Whether the status is in the 2xx range.
    pub fn is_ok(&self) -> bool {
        (200..=299).contains(&self.status)
    }

    /// Wrap this envelope in a response for `request`.
    ///
    /// A 2xx envelope lands on the body side, anything else on the error side.
    pub fn into_response(self, request: &Request) -> Response {
        if self.is_ok() {
            Response::ok(request.id.clone(), self)
        } else {
            Response::error(request.id.clone(), self)
        }
    }
}

impl Default for Envelope {
    fn default() -> Self {
        Self::new()
    }
}
