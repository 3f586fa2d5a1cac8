//! Outbound ports: capabilities the core calls into.

use crate::error::{EncodingError, TransportError};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Wire encoding (JSON, MessagePack, ...).
///
/// Decoding targets are "empty shells": every field of the envelope types
/// has a serde default, so a decoder only fills what the bytes carry.
pub trait Encoding: Send + Sync {
    /// Short name used in errors and logs
    fn name(&self) -> &'static str;

    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, EncodingError>;

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, EncodingError>;
}

/// Outbound half of the external transport.
#[async_trait]
pub trait MessageSender: Send + Sync {
    /// Hand one encoded message to the transport.
    async fn send(&self, message: Vec<u8>) -> Result<(), TransportError>;
}
