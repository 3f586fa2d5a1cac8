//! Error types.
//!
//! Application failures are [`Envelope`](crate::Envelope) values. The types
//! here cover protocol, registration, delivery and transport failures.

use thiserror::Error;

/// Method string that is not one of the supported verbs.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unsupported request method: {0:?}")]
pub struct ParseMethodError(pub String);

/// Failure of an [`Encoding`](crate::ports::outbound::Encoding) implementation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncodingError {
    #[error("{encoding} encode failed: {message}")]
    Encode {
        encoding: &'static str,
        message: String,
    },

    #[error("{encoding} decode failed: {message}")]
    Decode {
        encoding: &'static str,
        message: String,
    },
}

/// Protocol errors raised while converting bytes to and from envelopes.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WireError {
    #[error(transparent)]
    Encoding(#[from] EncodingError),

    #[error("failed to get request ID")]
    MissingRequestId,

    #[error("failed to get response ID")]
    MissingResponseId,

    #[error("frame is neither a request nor a response")]
    UnknownFrame,
}

/// Registration failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CacheError {
    #[error("request {id} is already pending")]
    DuplicateId { id: String },

    #[error("no async runtime available to watch request timeouts")]
    NoRuntime,
}

/// Why a response handle resolved without an envelope.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    #[error("request {id} was cancelled")]
    Cancelled { id: String },

    #[error("correlation cache closed before request {id} resolved")]
    Closed { id: String },
}

/// Failures of the outbound transport.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("channel closed")]
    ChannelClosed,

    #[error("send failed: {0}")]
    SendFailed(String),
}

/// Errors surfaced by a [`Session`](crate::service::Session).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error(transparent)]
    Wire(#[from] WireError),

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error(transparent)]
    Delivery(#[from] DeliveryError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("request {id} was sent fire-and-forget, no response will arrive")]
    NoResponseExpected { id: String },
}

/// Invalid configuration values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid timeout: {0}")]
    InvalidTimeout(String),

    #[error("invalid id ceiling: {0}")]
    InvalidIdCeiling(String),

    #[error("invalid value for {key}: {value}")]
    InvalidEnv { key: &'static str, value: String },
}
