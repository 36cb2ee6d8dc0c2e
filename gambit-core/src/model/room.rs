use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque name of a two-party room. Supplied externally (route, CLI
/// argument) and never parsed.
#[derive(Debug, Clone, Serialize, Deserialize, Hash, Eq, PartialEq)]
pub struct RoomId(pub String);

impl RoomId {
    /// Generate a fresh room id, for hosting a brand-new game.
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl From<&str> for RoomId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for RoomId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
