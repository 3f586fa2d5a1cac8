// Allow missing docs for internal items in development
#![allow(missing_docs)]

//! Rapport - request/response correlation over message-oriented transports.
//!
//! Matches responses arriving on a bidirectional transport to the requests
//! that caused them, delivering each caller exactly one outcome: the real
//! response, or a synthesized `504` if the response did not arrive in time.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         Session                              │
//! │  ┌──────────────────┐   ┌──────────────────────────────────┐ │
//! │  │ RequestIdGenerator│   │        CorrelationCache          │ │
//! │  │  (wrapping IDs)   │   │ id → PendingEntry {tx,timer,stop}│ │
//! │  └────────┬─────────┘   └───────────────┬──────────────────┘ │
//! │           │ stamp                       │ register / resolve │
//! │  ┌────────┴─────────────────────────────┴──────────────────┐ │
//! │  │                 Wire conversion (Encoding)              │ │
//! │  └────────┬─────────────────────────────▲──────────────────┘ │
//! └───────────┼─────────────────────────────┼────────────────────┘
//!             ▼ MessageSender               │ inbound bytes
//!                       external transport
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use rapport::adapters::{channel, JsonEncoding};
//! use rapport::{RapportConfig, Session};
//! use std::time::Duration;
//!
//! let (local, remote) = channel::pair(64);
//! let session = Session::new(&RapportConfig::default(), JsonEncoding, local.sender);
//!
//! let request = session.get("/users/4");
//! let envelope = session.call(&request, Duration::from_secs(2)).await?;
//! if envelope.is_ok() { /* ... */ }
//! ```
//!
//! Application failures are [`Envelope`] values with a non-2xx status (see
//! [`domain::errors`]); Rust errors are reserved for protocol, registration
//! and transport failures.

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod adapters;
pub mod cache;
pub mod config;
pub mod domain;
pub mod error;
pub mod ports;
pub mod service;
pub mod wire;

// Re-exports
pub use cache::{
    CacheStats, CacheStatsSnapshot, CorrelationCache, RequestTimeout, ResponseHandle,
    DEFAULT_TIMEOUT,
};
pub use config::{CacheConfig, IdConfig, RapportConfig};
pub use domain::{
    errors, status, Envelope, ErrorKind, HttpRequest, Method, Request, RequestIdGenerator,
    Response,
};
pub use error::{
    CacheError, ConfigError, DeliveryError, EncodingError, ParseMethodError, SessionError,
    TransportError, WireError,
};
pub use ports::{Encoding, MessageSender, Router, Validatable};
pub use service::{Received, Session};
pub use wire::Frame;
