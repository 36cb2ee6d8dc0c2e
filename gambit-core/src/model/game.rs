use serde::{Deserialize, Serialize};

/// The only promotion piece the protocol supports.
pub const QUEEN: char = 'q';

/// A single chess move handed to the rules collaborator.
///
/// The wire format carries only the source and target squares; promotion is
/// always a queen. No under-promotion — this is a protocol contract, not a
/// gap to fix silently.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameMove {
    /// Source square in algebraic notation, e.g. `"e2"`.
    pub from: String,
    /// Target square, e.g. `"e4"`.
    pub to: String,
    pub promotion: char,
}

impl GameMove {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            promotion: QUEEN,
        }
    }
}
