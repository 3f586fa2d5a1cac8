//! Response model.
//!
//! Wire shape:
//!
//! ```text
//! { "response_id": "17", "body": { "status": 200, "payload": ... } }
//! { "response_id": "17", "error": { "status": 404, "payload": ... } }
//! ```

use crate::domain::envelope::{status, Envelope};
use crate::domain::errors;
use serde::{Deserialize, Serialize};

/// A response matched to its request by `id`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// Correlation ID of the originating request
    #[serde(rename = "response_id", default)]
    pub id: String,
    /// Success envelope, meaningful only with a 2xx status
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Envelope>,
    /// Failure envelope
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Envelope>,
}

impl Response {
    /// Success-side response
    pub fn ok(id: impl Into<String>, body: Envelope) -> Self {
        Self {
            id: id.into(),
            body: Some(body),
            error: None,
        }
    }

    /// Error-side response
    pub fn error(id: impl Into<String>, error: Envelope) -> Self {
        Self {
            id: id.into(),
            body: None,
            error: Some(error),
        }
    }

    /// Synthesized `504 Gateway Timeout` response with an empty payload.
    pub fn timeout(id: impl Into<String>) -> Self {
        Self::error(id, Envelope::new().with_status(status::GATEWAY_TIMEOUT))
    }

    /// A response is an error when it has no body or the body carries no status.
    pub fn is_error(&self) -> bool {
        self.body.as_ref().map_or(true, |body| body.status == 0)
    }

    /// The envelope a waiting caller receives for this response.
    ///
    /// Error responses yield the error envelope, everything else the body.
    /// An error response without an error envelope yields a 500.
    pub fn into_envelope(self) -> Envelope {
        if self.is_error() {
            self.error
                .unwrap_or_else(|| errors::internal_server_error("Response carried no envelope"))
        } else {
            self.body.unwrap_or_default()
        }
    }
}
