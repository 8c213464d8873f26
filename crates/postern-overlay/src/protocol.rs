//! Agent wire protocol — newline-delimited JSON frames.
//!
//! These types ARE the boundary to the overlay capability. The client
//! writes one `ClientFrame` per line; the agent answers with
//! `AgentFrame` lines, in whatever order its internal completions fire.
//! Field names and tag strings are part of the wire format — changing
//! anything here is a breaking change against deployed agents.
//!
//! Body bytes travel hex-encoded in both directions so the framing
//! stays line-safe regardless of payload content.

use serde::{Deserialize, Serialize};

/// Clean end-of-stream marker on the response body channel.
///
/// Any other negative length is an I/O-level failure. The value mirrors
/// the transport's own EOF code and is part of the wire contract.
pub const STREAM_EOF: i64 = -4095;

/// Frames written by the client, tagged by `op`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ClientFrame {
    /// Authenticate and bring the overlay connection to a ready state.
    Hello { token: String },

    /// Ask whether a logical service is currently reachable.
    Probe { service: String },

    /// Open one request/response exchange.
    Open {
        url: String,
        method: String,
        /// Ordered header lines, `Name: value`.
        headers: Vec<String>,
    },

    /// Transmit the request body for an open exchange, hex-encoded.
    Send { handle: i64, data: String },
}

/// Frames written by the agent, tagged by `ev`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "ev", rename_all = "snake_case")]
pub enum AgentFrame {
    /// Init completion. Negative code = overlay bring-up failed.
    Ready { code: i32 },

    /// Probe completion. Status 0 = service available.
    ProbeResult { status: i32 },

    /// Open completion. Negative handle = open rejected.
    Opened { handle: i64 },

    /// Response headers arrived. Negative code = upstream rejection.
    Response { code: i32, status: String },

    /// Body-send completion. Negative status = transmission failed.
    Sent { status: i32 },

    /// Response body channel. `len >= 0`: a data chunk (hex in `data`);
    /// `len == STREAM_EOF`: clean end of stream; any other negative
    /// `len`: stream I/O failure.
    Body { len: i64, data: Option<String> },
}
