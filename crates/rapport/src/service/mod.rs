//! Service layer: wires the envelope model, the correlation cache and the
//! ports together.

pub mod session;

pub use session::{Received, Session};
