//! JSON encoding adapter.

use crate::error::EncodingError;
use crate::ports::outbound::Encoding;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// [`Encoding`] backed by `serde_json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonEncoding;

impl Encoding for JsonEncoding {
    fn name(&self) -> &'static str {
        "json"
    }

    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, EncodingError> {
        serde_json::to_vec(value).map_err(|e| EncodingError::Encode {
            encoding: self.name(),
            message: e.to_string(),
        })
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, EncodingError> {
        serde_json::from_slice(bytes).map_err(|e| EncodingError::Decode {
            encoding: self.name(),
            message: e.to_string(),
        })
    }
}
