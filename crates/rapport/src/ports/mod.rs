//! Ports (hexagonal boundaries).
//!
//! - **Inbound**: `Router`, `Validatable` (implemented by the application)
//! - **Outbound**: `Encoding`, `MessageSender` (implemented by adapters)

pub mod inbound;
pub mod outbound;

pub use inbound::{Router, Validatable};
pub use outbound::{Encoding, MessageSender};
