//! Payload signing — keyed digest the receiver recomputes to verify
//! integrity and authenticity.
//!
//! The header value is `sha1=` followed by the lowercase hex HMAC-SHA1
//! of the payload bytes keyed by the shared secret. The receiving end
//! computes the same digest over the bytes it reads off the wire, so
//! the input here must be the exact transmitted byte sequence.

use hmac::{Hmac, Mac};
use sha1::Sha1;
use thiserror::Error;

type HmacSha1 = Hmac<Sha1>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignError {
    /// An empty secret is a caller mistake, not a signing failure.
    #[error("signing secret is empty")]
    EmptySecret,
}

/// Compute the signature header value for a finalized payload.
///
/// Deterministic: same secret and bytes always yield the same output.
pub fn signature_header(secret: &str, payload: &[u8]) -> Result<String, SignError> {
    if secret.is_empty() {
        return Err(SignError::EmptySecret);
    }

    let mut mac =
        <HmacSha1 as Mac>::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(payload);

    Ok(format!("sha1={}", hex::encode(mac.finalize().into_bytes())))
}
