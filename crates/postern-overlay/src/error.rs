//! Overlay failure taxonomy.
//!
//! Every asynchronous overlay completion reports a raw numeric code.
//! Each workflow stage keeps its own named variant so the top-level
//! report can say which call failed without losing that code. All of
//! these are terminal — nothing in this crate retries.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OverlayError {
    /// Overlay initialization completed with a negative code.
    #[error("overlay init failed: code {code}")]
    Init { code: i32 },

    /// Reachability probe reported a non-zero status.
    #[error("service {service} not available, status: {status}")]
    Probe { service: String, status: i32 },

    /// Request open was rejected — no session handle was produced.
    #[error("request open failed: code {code}")]
    Open { code: i64 },

    /// Upstream reported a negative response status.
    #[error("response failed: {status} (code {code})")]
    Response { code: i32, status: String },

    /// Body transmission completed with a negative status.
    #[error("body send failed: status {status}")]
    Send { status: i32 },

    /// Response body stream ended with an error length.
    #[error("response stream failed: len {len}")]
    Stream { len: i64 },

    /// The agent socket failed at the I/O level.
    #[error("agent transport error: {0}")]
    Transport(#[from] std::io::Error),

    /// The agent closed the connection while a completion was pending.
    #[error("agent connection closed mid-exchange")]
    AgentClosed,

    /// An outgoing frame could not be encoded.
    #[error("malformed agent frame: {0}")]
    Frame(#[from] serde_json::Error),
}
