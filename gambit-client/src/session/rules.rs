use gambit_core::GameMove;
use std::fmt::Display;

/// External chess-rules collaborator.
///
/// Treated as an opaque copy-on-write value: applying a move yields a new
/// value and the session atomically replaces the one it stores. The session
/// never inspects the position itself.
pub trait GameRules: Clone + Send + Sync + 'static {
    type Error: Display + Send;

    /// Apply a move, returning the mutated copy. A rejection leaves the
    /// stored state untouched.
    fn apply_move(&self, mv: &GameMove) -> Result<Self, Self::Error>;

    /// Whether the game ended with the last applied move.
    fn is_game_over(&self) -> bool;
}
