//! postern-overlay — client for the identity-based overlay network.
//!
//! The overlay fabric itself (routing, encryption, identity trust) sits
//! on the far side of a local agent socket and is consumed as an opaque
//! capability. This crate implements the client half of that boundary:
//! identity bootstrap, service reachability probing, and a single-shot
//! HTTP request session with independently-arriving completion events.

mod agent;
pub mod context;
pub mod error;
pub mod identity;
pub mod protocol;
pub mod session;

pub use context::OverlayContext;
pub use error::OverlayError;
pub use identity::NetworkIdentity;
pub use session::{RequestSession, SessionEvent};
