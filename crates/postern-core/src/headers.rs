//! Outgoing request shape — method and the fixed, ordered header set.
//!
//! Receivers key off these headers bit-exactly (name, value, and
//! order), so this module is the single place they are assembled.

use crate::payload::Payload;

/// Fixed user-agent token. Part of the outgoing wire shape.
pub const USER_AGENT: &str = "GitHub-Hookshot/7abb35b";

/// The only method this workflow ever sends.
pub const METHOD: &str = "POST";

/// Build the delivery header lines in wire order.
///
/// `signature` must have been computed over the same `payload` passed
/// here — Content-Length and X-Hub-Signature both describe the exact
/// bytes that go out in the body.
pub fn delivery_headers(payload: &Payload, signature: &str, event_name: &str) -> Vec<String> {
    vec![
        format!("User-Agent: {USER_AGENT}"),
        "Content-Type: application/json".to_string(),
        format!("Content-Length: {}", payload.content_length()),
        format!("X-Hub-Signature: {signature}"),
        format!("X-GitHub-Event: {event_name}"),
    ]
}
