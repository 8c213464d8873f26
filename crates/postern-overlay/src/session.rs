//! Request session — one in-flight request/response exchange.
//!
//! A session value only exists after the open completion delivered a
//! handle, which is what enforces open-before-send ordering: there is
//! no way to call `send_body` on a session that was never opened.
//!
//! The agent's three completion channels (response headers, body-send,
//! response body) surface here as one stream of tagged events, handled
//! strictly in arrival order — a response may land before, during, or
//! after body transmission.

use std::sync::Arc;

use bytes::Bytes;
use tokio::sync::mpsc;

use crate::agent::AgentConn;
use crate::error::OverlayError;
use crate::protocol::{AgentFrame, STREAM_EOF};

/// A session-scoped completion event.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// Response headers arrived. Negative code = upstream rejection.
    Response { code: i32, status: String },

    /// Body-send completion. Negative status = transmission failed.
    Sent { status: i32 },

    /// One response body chunk.
    Body { data: Bytes },

    /// Terminal stream signal: `STREAM_EOF` for a clean end, any other
    /// negative length for an I/O failure.
    End { len: i64 },
}

impl SessionEvent {
    /// Map a session-scoped agent frame onto an event. Returns `None`
    /// for frames that belong to the pre-session completions.
    pub(crate) fn from_frame(frame: AgentFrame) -> Option<Self> {
        match frame {
            AgentFrame::Response { code, status } => Some(Self::Response { code, status }),
            AgentFrame::Sent { status } => Some(Self::Sent { status }),
            AgentFrame::Body { len, data } if len >= 0 => {
                let data = match data.map(|d| hex::decode(&d)) {
                    Some(Ok(bytes)) => Bytes::from(bytes),
                    Some(Err(e)) => {
                        tracing::warn!(error = %e, "body chunk with undecodable data");
                        return None;
                    }
                    None => Bytes::new(),
                };
                Some(Self::Body { data })
            }
            AgentFrame::Body { len, .. } => Some(Self::End { len }),
            AgentFrame::Ready { .. } | AgentFrame::ProbeResult { .. } | AgentFrame::Opened { .. } => {
                None
            }
        }
    }
}

/// One open request/response exchange over the overlay.
pub struct RequestSession {
    conn: Arc<AgentConn>,
    handle: i64,
    events: mpsc::UnboundedReceiver<SessionEvent>,
}

impl RequestSession {
    pub(crate) fn new(
        conn: Arc<AgentConn>,
        handle: i64,
        events: mpsc::UnboundedReceiver<SessionEvent>,
    ) -> Self {
        Self {
            conn,
            handle,
            events,
        }
    }

    /// The opaque handle delivered by the open completion.
    pub fn handle(&self) -> i64 {
        self.handle
    }

    /// Transmit the request body in a single send.
    ///
    /// `body` must be the exact bytes the signature header was computed
    /// over. The send completion arrives as [`SessionEvent::Sent`] on
    /// the event stream, so a response that lands first is observed
    /// first.
    pub async fn send_body(&self, body: &[u8]) -> Result<(), OverlayError> {
        self.conn.send_body(self.handle, body).await
    }

    /// Next session event, in arrival order. `None` once the agent
    /// connection has closed.
    pub async fn next_event(&mut self) -> Option<SessionEvent> {
        self.events.recv().await
    }

    /// Drive the exchange to its terminal outcome.
    ///
    /// Body chunks are logged and discarded; the only fact that
    /// survives is whether the stream reached its clean end-of-stream
    /// marker. First failure wins: a negative response code, send
    /// status, or stream length ends the exchange immediately.
    pub async fn await_completion(mut self) -> Result<(), OverlayError> {
        loop {
            match self.next_event().await {
                None => return Err(OverlayError::AgentClosed),

                Some(SessionEvent::Response { code, status }) => {
                    if code < 0 {
                        return Err(OverlayError::Response { code, status });
                    }
                    tracing::info!(code, status = %status, "response headers received");
                }

                Some(SessionEvent::Sent { status }) => {
                    if status < 0 {
                        return Err(OverlayError::Send { status });
                    }
                    tracing::debug!(status, "request body sent");
                }

                Some(SessionEvent::Body { data }) => {
                    tracing::info!(
                        len = data.len(),
                        body = %String::from_utf8_lossy(&data),
                        "response body chunk"
                    );
                }

                Some(SessionEvent::End { len }) if len == STREAM_EOF => {
                    tracing::info!("response complete");
                    return Ok(());
                }

                Some(SessionEvent::End { len }) => {
                    return Err(OverlayError::Stream { len });
                }
            }
        }
    }
}
