//! Event payload — the exact bytes that are signed and transmitted.

use bytes::Bytes;

/// The serialized event body.
///
/// Immutable once constructed. The signature and the Content-Length
/// header both describe these exact bytes; anything that re-serializes
/// the event after signing would invalidate the signature, so nothing
/// here exposes a mutable view.
#[derive(Debug, Clone)]
pub struct Payload {
    bytes: Bytes,
}

impl Payload {
    /// Wrap already-serialized bytes verbatim.
    pub fn from_bytes(bytes: impl Into<Bytes>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    /// Serialize an event value, pretty-printed with 2-space indentation.
    ///
    /// Receivers display and re-sign the body as delivered, so the
    /// indentation style is part of the outgoing format.
    pub fn from_event(event: &serde_json::Value) -> Result<Self, serde_json::Error> {
        Ok(Self {
            bytes: Bytes::from(serde_json::to_vec_pretty(event)?),
        })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Byte length — authoritative for the Content-Length header.
    pub fn content_length(&self) -> usize {
        self.bytes.len()
    }
}
