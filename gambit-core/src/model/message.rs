use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors crossing the serialization boundary.
///
/// An unknown `type` tag decodes to [`ProtocolError::Malformed`]; the
/// receiver logs it and drops the message, the session keeps running.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("malformed message: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Application message exchanged directly over the data channel.
///
/// Serialized as JSON text: `{"type": "msg" | "game", "data": ...}`. This
/// never travels over the signaling socket.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "data")]
pub enum AppMessage {
    /// A chat line.
    #[serde(rename = "msg")]
    Msg(String),
    /// A move made by the remote side. Promotion is implied as queen.
    #[serde(rename = "game")]
    Game {
        #[serde(rename = "sourceSquare")]
        source_square: String,
        #[serde(rename = "targetSquare")]
        target_square: String,
    },
}

impl AppMessage {
    pub fn encode(&self) -> Result<String, ProtocolError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn decode(text: &str) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_str(text)?)
    }
}
