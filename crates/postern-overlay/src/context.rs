//! Overlay context — the explicit process-wide overlay handle.
//!
//! Initialized exactly once per process run; every later overlay
//! operation (probing, request sessions) goes through it. There is no
//! teardown path — the connection is released implicitly at process
//! exit, matching the single-shot lifecycle of the workflow.

use std::sync::Arc;

use crate::agent::AgentConn;
use crate::error::OverlayError;
use crate::identity::NetworkIdentity;
use crate::session::RequestSession;

pub struct OverlayContext {
    conn: Arc<AgentConn>,
}

impl OverlayContext {
    /// Bring the overlay connection to a ready state.
    ///
    /// Two failure classes, both fatal and unretried: the connection
    /// attempt itself can fail synchronously (agent unreachable), or
    /// the ready completion can report a negative code (credential
    /// rejected, overlay unreachable).
    pub async fn init(identity: &NetworkIdentity) -> Result<Self, OverlayError> {
        let conn = AgentConn::connect(&identity.agent).await?;

        let code = conn.request_ready(identity.token.clone()).await?;
        if code < 0 {
            return Err(OverlayError::Init { code });
        }
        tracing::info!(code, "overlay connection ready");

        Ok(Self { conn })
    }

    /// Ask whether `service` is currently reachable through the overlay.
    ///
    /// The status carried in the log line and the error is the one the
    /// probe completion actually reported.
    pub async fn service_available(&self, service: &str) -> Result<(), OverlayError> {
        let status = self.conn.request_probe(service).await?;

        if status != 0 {
            tracing::warn!(service, status, "service not available");
            return Err(OverlayError::Probe {
                service: service.to_string(),
                status,
            });
        }

        tracing::info!(service, "service available");
        Ok(())
    }

    /// Open one request/response exchange.
    ///
    /// Resolves only once the open completion delivers a handle; a
    /// negative handle means the open was rejected and no session
    /// exists.
    pub async fn open_request(
        &self,
        url: &str,
        method: &str,
        headers: Vec<String>,
    ) -> Result<RequestSession, OverlayError> {
        let (handle, events) = self.conn.request_open(url, method, headers).await?;

        if handle < 0 {
            return Err(OverlayError::Open { code: handle });
        }
        tracing::debug!(handle, url, "request session open");

        Ok(RequestSession::new(self.conn.clone(), handle, events))
    }
}
