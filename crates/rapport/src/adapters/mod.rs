//! Adapters implementing the outbound ports.
//!
//! - `json`: serde_json encoding
//! - `channel`: in-memory transport over tokio mpsc, for tests and demos

pub mod channel;
pub mod json;

pub use channel::ChannelSender;
pub use json::JsonEncoding;
