//! Envelope model: requests, responses, envelopes, error envelopes and IDs.
//!
//! Pure data and pure functions; no I/O and no async.

pub mod envelope;
pub mod errors;
pub mod id;
pub mod request;
pub mod response;

// Re-exports for convenience
pub use envelope::{status, Envelope};
pub use errors::ErrorKind;
pub use id::{RequestIdGenerator, DEFAULT_ID_CEILING};
pub use request::{normalize_method, normalize_url, HttpRequest, Method, Request};
pub use response::Response;
