//! Wire conversion: raw bytes to and from requests and responses.
//!
//! Decoding always targets an empty shell (every envelope field has a serde
//! default) and then checks that the correlation ID came through. Requests are
//! normalized on the way in; responses are taken as-is.

use crate::domain::{Request, Response};
use crate::error::WireError;
use crate::ports::outbound::Encoding;
use serde::Deserialize;

/// An inbound message whose direction is only known after decoding.
#[derive(Debug, Clone)]
pub enum Frame {
    Request(Request),
    Response(Response),
}

impl Frame {
    /// Correlation ID carried by the frame
    pub fn id(&self) -> &str {
        match self {
            Frame::Request(request) => &request.id,
            Frame::Response(response) => &response.id,
        }
    }
}

/// Only the ID fields, used to tell requests from responses.
#[derive(Debug, Default, Deserialize)]
struct FrameProbe {
    #[serde(default)]
    request_id: Option<String>,
    #[serde(default)]
    response_id: Option<String>,
}

/// Decode and normalize a request.
///
/// # Errors
///
/// - [`WireError::Encoding`] if the bytes do not decode
/// - [`WireError::MissingRequestId`] if the ID is absent or empty
pub fn to_request<E: Encoding>(encoding: &E, bytes: &[u8]) -> Result<Request, WireError> {
    let mut request: Request = encoding.decode(bytes)?;
    if request.id.is_empty() {
        return Err(WireError::MissingRequestId);
    }

    request.normalize();
    Ok(request)
}

/// Decode a response.
///
/// # Errors
///
/// - [`WireError::Encoding`] if the bytes do not decode
/// - [`WireError::MissingResponseId`] if the ID is absent or empty
pub fn to_response<E: Encoding>(encoding: &E, bytes: &[u8]) -> Result<Response, WireError> {
    let response: Response = encoding.decode(bytes)?;
    if response.id.is_empty() {
        return Err(WireError::MissingResponseId);
    }

    Ok(response)
}

/// Decode a message that may be either a request or a response.
///
/// A non-empty `response_id` wins; otherwise a `request_id` field marks a
/// request.
pub fn to_frame<E: Encoding>(encoding: &E, bytes: &[u8]) -> Result<Frame, WireError> {
    let probe: FrameProbe = encoding.decode(bytes)?;

    match (probe.request_id, probe.response_id) {
        (_, Some(id)) if !id.is_empty() => to_response(encoding, bytes).map(Frame::Response),
        (Some(_), _) => to_request(encoding, bytes).map(Frame::Request),
        (None, Some(_)) => Err(WireError::MissingResponseId),
        (None, None) => Err(WireError::UnknownFrame),
    }
}

pub fn from_request<E: Encoding>(encoding: &E, request: &Request) -> Result<Vec<u8>, WireError> {
    Ok(encoding.encode(request)?)
}

pub fn from_response<E: Encoding>(
    encoding: &E,
    response: &Response,
) -> Result<Vec<u8>, WireError> {
    Ok(encoding.encode(response)?)
}
