//! Wire envelopes exchanged over the chat websocket.
//!
//! Inbound traffic is a JSON object `{ time, package }` where `package` is
//! tagged by `type` with its payload under `data`. Outbound traffic only ever
//! carries a chat line: `{ "package": { "data": { "msg": ... } } }`.
//!
//! Parsing is lenient in one direction only: anything that does not match a
//! known package shape is dropped, never reported to the user.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::debug;

// =============================================================================
// INBOUND
// =============================================================================

/// A single inbound event from the room.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Envelope {
    /// Server timestamp; absent or unreadable values fall back to receive time.
    #[serde(default)]
    pub time: Option<Timestamp>,
    pub package: Package,
}

/// Server timestamp as it appears on the wire.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    /// Milliseconds since the Unix epoch.
    Millis(f64),
    /// RFC 3339 date-time string.
    Text(String),
    /// Any other JSON value; resolves to no time.
    Other(serde_json::Value),
}

impl Timestamp {
    /// Resolve the wire value to a UTC date-time, if it is readable.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn to_datetime(&self) -> Option<OffsetDateTime> {
        match self {
            Self::Millis(ms) if ms.is_finite() => {
                let nanos = (ms * 1_000_000.0) as i128;
                OffsetDateTime::from_unix_timestamp_nanos(nanos).ok()
            }
            Self::Millis(_) => None,
            Self::Text(raw) => OffsetDateTime::parse(raw, &Rfc3339).ok(),
            Self::Other(_) => None,
        }
    }
}

/// Room event payload, tagged by `type`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Package {
    /// Full snapshot of the room's members, in server order.
    #[serde(rename = "participant-update")]
    ParticipantUpdate(Vec<String>),
    #[serde(rename = "participant-joined")]
    ParticipantJoined(String),
    #[serde(rename = "participant-left")]
    ParticipantLeft(String),
    #[serde(rename = "message")]
    Message(ChatLine),
}

/// A chat line as relayed by the server.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ChatLine {
    pub nick: String,
    pub msg: String,
}

/// Parse one websocket text frame into an envelope.
///
/// Returns `None` for malformed JSON, a missing package, an unknown package
/// type, or a payload of the wrong shape.
#[must_use]
pub fn parse_envelope(text: &str) -> Option<Envelope> {
    match serde_json::from_str::<Envelope>(text) {
        Ok(envelope) => Some(envelope),
        Err(error) => {
            debug!(%error, len = text.len(), "chat: dropped inbound envelope");
            None
        }
    }
}

// =============================================================================
// OUTBOUND
// =============================================================================

/// The only envelope the client ever sends.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OutboundMessage {
    package: OutboundPackage,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
struct OutboundPackage {
    data: OutboundData,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
struct OutboundData {
    msg: String,
}

impl OutboundMessage {
    /// Wrap input text as-is. Empty input is still a valid message.
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            package: OutboundPackage {
                data: OutboundData { msg: msg.into() },
            },
        }
    }

    #[must_use]
    pub fn msg(&self) -> &str {
        &self.package.data.msg
    }

    /// Serialize to the JSON text sent on the socket.
    ///
    /// # Errors
    ///
    /// Returns the serializer error; in practice string payloads always encode.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
#[path = "envelope_test.rs"]
mod tests;
