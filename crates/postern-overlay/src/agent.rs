//! Agent connection — framing, completion routing, session event fan-out.
//!
//! One TCP connection to the local agent carries every exchange of a
//! process run. Writes are serialized through a mutex; a single reader
//! task decodes agent frames and either completes the pending request
//! or forwards the frame onto the open session's event stream. This is
//! the seam where the agent's callback-style completions become
//! awaitable futures.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot, Mutex};

use crate::error::OverlayError;
use crate::protocol::{AgentFrame, ClientFrame};
use crate::session::SessionEvent;

pub(crate) struct AgentConn {
    writer: Mutex<OwnedWriteHalf>,
    pending: Mutex<Pending>,
}

/// Registered completions awaiting an agent frame.
///
/// The workflow is single-shot: at most one completion of each kind is
/// outstanding at a time, and at most one session event stream exists
/// per process run. A frame arriving with no registered waiter is
/// logged and dropped.
#[derive(Default)]
struct Pending {
    ready: Option<oneshot::Sender<i32>>,
    probe: Option<oneshot::Sender<i32>>,
    opened: Option<oneshot::Sender<i64>>,
    session: Option<mpsc::UnboundedSender<SessionEvent>>,
}

impl AgentConn {
    /// Connect to the agent and start the frame reader.
    pub(crate) async fn connect(addr: &str) -> Result<Arc<Self>, OverlayError> {
        let stream = TcpStream::connect(addr).await?;
        let (read_half, write_half) = stream.into_split();

        let conn = Arc::new(Self {
            writer: Mutex::new(write_half),
            pending: Mutex::new(Pending::default()),
        });

        tokio::spawn(read_loop(read_half, conn.clone()));

        Ok(conn)
    }

    async fn write_frame(&self, frame: &ClientFrame) -> Result<(), OverlayError> {
        let mut line = serde_json::to_string(frame)?;
        line.push('\n');

        let mut writer = self.writer.lock().await;
        writer.write_all(line.as_bytes()).await?;
        writer.flush().await?;
        Ok(())
    }

    /// Hello/ready exchange. Resolves with the agent's init code.
    pub(crate) async fn request_ready(&self, token: String) -> Result<i32, OverlayError> {
        let rx = {
            let mut pending = self.pending.lock().await;
            let (tx, rx) = oneshot::channel();
            pending.ready = Some(tx);
            rx
        };

        self.write_frame(&ClientFrame::Hello { token }).await?;
        rx.await.map_err(|_| OverlayError::AgentClosed)
    }

    /// Reachability probe. Resolves with the completion's status field.
    pub(crate) async fn request_probe(&self, service: &str) -> Result<i32, OverlayError> {
        let rx = {
            let mut pending = self.pending.lock().await;
            let (tx, rx) = oneshot::channel();
            pending.probe = Some(tx);
            rx
        };

        self.write_frame(&ClientFrame::Probe {
            service: service.to_string(),
        })
        .await?;
        rx.await.map_err(|_| OverlayError::AgentClosed)
    }

    /// Open a request session. Resolves with the handle from the open
    /// completion; the returned receiver carries every later event for
    /// this session (response, sent, body) in arrival order.
    pub(crate) async fn request_open(
        &self,
        url: &str,
        method: &str,
        headers: Vec<String>,
    ) -> Result<(i64, mpsc::UnboundedReceiver<SessionEvent>), OverlayError> {
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        let rx = {
            let mut pending = self.pending.lock().await;
            let (tx, rx) = oneshot::channel();
            pending.opened = Some(tx);
            pending.session = Some(event_tx);
            rx
        };

        self.write_frame(&ClientFrame::Open {
            url: url.to_string(),
            method: method.to_string(),
            headers,
        })
        .await?;

        let handle = rx.await.map_err(|_| OverlayError::AgentClosed)?;
        Ok((handle, event_rx))
    }

    /// Write the request body frame. The send completion arrives on the
    /// session event stream, not here.
    pub(crate) async fn send_body(&self, handle: i64, body: &[u8]) -> Result<(), OverlayError> {
        self.write_frame(&ClientFrame::Send {
            handle,
            data: hex::encode(body),
        })
        .await
    }
}

async fn read_loop(read_half: OwnedReadHalf, conn: Arc<AgentConn>) {
    let mut lines = BufReader::new(read_half).lines();

    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                if line.trim().is_empty() {
                    continue;
                }
                match serde_json::from_str::<AgentFrame>(&line) {
                    Ok(frame) => dispatch(&conn, frame).await,
                    Err(e) => tracing::warn!(error = %e, "undecodable agent frame"),
                }
            }
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(error = %e, "agent read failed");
                break;
            }
        }
    }

    // Dropping the registered completions wakes every waiter with a
    // closed-channel error, which surfaces as AgentClosed.
    *conn.pending.lock().await = Pending::default();
    tracing::debug!("agent connection closed");
}

async fn dispatch(conn: &AgentConn, frame: AgentFrame) {
    let mut pending = conn.pending.lock().await;

    match frame {
        AgentFrame::Ready { code } => complete(&mut pending.ready, code, "ready"),
        AgentFrame::ProbeResult { status } => complete(&mut pending.probe, status, "probe_result"),
        AgentFrame::Opened { handle } => complete(&mut pending.opened, handle, "opened"),
        frame => {
            let Some(event) = SessionEvent::from_frame(frame) else {
                return;
            };
            match &pending.session {
                Some(session) => {
                    if session.send(event).is_err() {
                        tracing::debug!("session event receiver dropped");
                    }
                }
                None => tracing::warn!("session event with no open session"),
            }
        }
    }
}

fn complete<T: std::fmt::Debug>(slot: &mut Option<oneshot::Sender<T>>, value: T, kind: &str) {
    match slot.take() {
        Some(tx) => {
            let _ = tx.send(value);
        }
        None => tracing::warn!(kind, ?value, "completion frame with no waiter"),
    }
}
