//! Standardized error envelopes.
//!
//! Every error envelope carries a `{ "name", "message" }` payload where `name`
//! identifies the failure kind.

use crate::domain::envelope::{status, Envelope};
use serde_json::json;

/// Semantic failure kinds with a fixed status code and name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    Conflict,
    UnsupportedMediaType,
    TooManyRequests,
    InternalServerError,
}

impl ErrorKind {
    /// Status code for this kind
    pub const fn status(self) -> u16 {
        match self {
            ErrorKind::BadRequest => status::BAD_REQUEST,
            ErrorKind::Unauthorized => status::UNAUTHORIZED,
            ErrorKind::Forbidden => status::FORBIDDEN,
            ErrorKind::NotFound => status::NOT_FOUND,
            ErrorKind::Conflict => status::CONFLICT,
            ErrorKind::UnsupportedMediaType => status::UNSUPPORTED_MEDIA_TYPE,
            ErrorKind::TooManyRequests => status::TOO_MANY_REQUESTS,
            ErrorKind::InternalServerError => status::INTERNAL_SERVER_ERROR,
        }
    }

    /// Identifier placed in the `name` field of the payload
    pub const fn name(self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "BadRequestError",
            ErrorKind::Unauthorized => "UnauthorizedError",
            ErrorKind::Forbidden => "ForbiddenError",
            ErrorKind::NotFound => "NotFoundError",
            ErrorKind::Conflict => "ConflictError",
            ErrorKind::UnsupportedMediaType => "UnsupportedMediaTypeError",
            ErrorKind::TooManyRequests => "TooManyRequestsError",
            ErrorKind::InternalServerError => "InternalServerError",
        }
    }

    /// Message used when the caller does not supply one
    pub const fn default_message(self) -> &'static str {
        match self {
            ErrorKind::BadRequest => "Bad Request",
            ErrorKind::Unauthorized => "Unauthorized",
            ErrorKind::Forbidden => "Forbidden",
            ErrorKind::NotFound => "The request resource could not be found",
            ErrorKind::Conflict => "Conflict",
            ErrorKind::UnsupportedMediaType => "Unsupported Media Type",
            ErrorKind::TooManyRequests => "Too Many Requests",
            ErrorKind::InternalServerError => "Internal Server Error",
        }
    }

    /// Build the envelope for this kind with a custom message.
    pub fn envelope(self, message: impl Into<String>) -> Envelope {
        error(self.status(), self.name(), message)
    }

    /// Build the envelope for this kind with its default message.
    pub fn default_envelope(self) -> Envelope {
        self.envelope(self.default_message())
    }
}

/// Create an error envelope with an arbitrary status, name and message.
pub fn error(status: u16, name: &str, message: impl Into<String>) -> Envelope {
    Envelope::new().with_status(status).with_payload(json!({
        "name": name,
        "message": message.into(),
    }))
}

/// 400
pub fn bad_request(message: impl Into<String>) -> Envelope {
    ErrorKind::BadRequest.envelope(message)
}

/// 401
pub fn unauthorized() -> Envelope {
    ErrorKind::Unauthorized.default_envelope()
}

/// 403
pub fn forbidden() -> Envelope {
    ErrorKind::Forbidden.default_envelope()
}

/// 404
pub fn not_found() -> Envelope {
    ErrorKind::NotFound.default_envelope()
}

/// 409
pub fn conflict(message: impl Into<String>) -> Envelope {
    ErrorKind::Conflict.envelope(message)
}

/// 415
pub fn unsupported_media_type() -> Envelope {
    ErrorKind::UnsupportedMediaType.default_envelope()
}

/// 429
pub fn too_many_requests(message: impl Into<String>) -> Envelope {
    ErrorKind::TooManyRequests.envelope(message)
}

/// 500
pub fn internal_server_error(message: impl Into<String>) -> Envelope {
    ErrorKind::InternalServerError.envelope(message)
}
