//! postern — deliver one signed webhook event over a private overlay.
//!
//! The workflow is linear and single-shot: persist the identity
//! credential, bring the overlay up, confirm the target service is
//! reachable, sign the payload, open the request, send the body, and
//! wait for the response stream to finish. Every stage failure is
//! terminal — no retries, no partial-success state, no cleanup beyond
//! reporting. Errors propagate to `main`, which makes the one
//! termination decision.

use thiserror::Error;

use postern_core::inputs::{DeliveryInputs, InputError};
use postern_core::sign::{signature_header, SignError};
use postern_core::{headers, Payload};
use postern_overlay::identity::{self, IdentityError, NetworkIdentity};
use postern_overlay::{OverlayContext, OverlayError};

/// Anything that can end a delivery before the response stream does.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("workflow inputs: {0}")]
    Input(#[from] InputError),

    #[error("identity credential: {0}")]
    Identity(#[from] IdentityError),

    #[error("event payload: {0}")]
    Event(#[from] serde_json::Error),

    #[error("payload signing: {0}")]
    Sign(#[from] SignError),

    #[error(transparent)]
    Overlay(#[from] OverlayError),
}

/// Run the delivery workflow once, to completion or first failure.
pub async fn deliver(inputs: DeliveryInputs) -> Result<(), DeliveryError> {
    tracing::info!(url = %inputs.webhook_url, "delivering webhook");

    // Credential material is persisted before the overlay sees it.
    identity::write_credential(&inputs.identity_path, &inputs.identity)?;
    let network_identity = NetworkIdentity::load(&inputs.identity_path)?;

    let overlay = OverlayContext::init(&network_identity).await?;

    // The overlay requires the logical service name to match the URL
    // host, so reachability is checked under the derived name.
    let service = inputs.service_name()?;
    overlay.service_available(&service).await?;

    // Finalize the payload before signing; the signature and the
    // Content-Length header cover exactly these bytes.
    let payload = Payload::from_event(&inputs.event)?;
    let signature = signature_header(&inputs.webhook_secret, payload.as_bytes())?;
    let header_lines = headers::delivery_headers(&payload, &signature, &inputs.event_name);

    let session = overlay
        .open_request(&inputs.webhook_url, headers::METHOD, header_lines)
        .await?;

    session.send_body(payload.as_bytes()).await?;
    session.await_completion().await?;

    tracing::info!("delivery complete");
    Ok(())
}
