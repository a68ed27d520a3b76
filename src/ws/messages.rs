//! Outbound WebSocket envelope.
//!
//! Inbound frames are plain text and are consumed as raw strings; only the
//! server's replies are structured. The wire shape is fixed:
//!
//! ```json
//! {"type": "broadcast", "message": "hello", "timestamp": "2024-05-01T10:00:00Z", "connections": 2}
//! ```
//!
//! `connections` is present on `broadcast` envelopes only.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Greeting sent once to every new broadcast connection.
pub const WELCOME_MESSAGE: &str = "Connected to broadcast channel";

/// Server-to-client message envelope.
///
/// Built fresh for every outbound send and never mutated afterwards; one
/// broadcast envelope is serialized once and the same text goes to every
/// recipient of the pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Message type discriminator.
    #[serde(rename = "type")]
    pub msg_type: EnvelopeType,
    /// Text payload, possibly empty.
    pub message: String,
    /// Envelope construction time (ISO-8601).
    pub timestamp: DateTime<Utc>,
    /// Registry size at dispatch time. Broadcast envelopes only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connections: Option<usize>,
}

/// Discriminator for envelope types.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EnvelopeType {
    /// First message on a broadcast connection.
    Welcome,
    /// Fan-out of a message received from any broadcast connection.
    Broadcast,
    /// Reply on the echo channel.
    Echo,
}

impl Envelope {
    /// Builds the greeting for a newly opened broadcast connection.
    #[must_use]
    pub fn welcome() -> Self {
        Self {
            msg_type: EnvelopeType::Welcome,
            message: WELCOME_MESSAGE.to_string(),
            timestamp: Utc::now(),
            connections: None,
        }
    }

    /// Builds a broadcast of `message` annotated with the live count.
    #[must_use]
    pub fn broadcast(message: &str, connections: usize) -> Self {
        Self {
            msg_type: EnvelopeType::Broadcast,
            message: message.to_string(),
            timestamp: Utc::now(),
            connections: Some(connections),
        }
    }

    /// Builds an echo reply for `message`.
    #[must_use]
    pub fn echo(message: &str) -> Self {
        Self {
            msg_type: EnvelopeType::Echo,
            message: message.to_string(),
            timestamp: Utc::now(),
            connections: None,
        }
    }

    /// Serializes the envelope to its JSON wire text.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}
