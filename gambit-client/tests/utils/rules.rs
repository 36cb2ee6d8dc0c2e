use gambit_client::GameRules;
use gambit_core::GameMove;
use std::convert::Infallible;

/// Rules collaborator double: records applied moves and ends the game
/// after a scripted number of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptedRules {
    pub moves: Vec<GameMove>,
    pub ends_after: Option<usize>,
}

impl ScriptedRules {
    /// A game that never ends.
    pub fn endless() -> Self {
        Self {
            moves: Vec::new(),
            ends_after: None,
        }
    }

    /// A game that is over once `n` moves have been applied.
    pub fn ending_after(n: usize) -> Self {
        Self {
            moves: Vec::new(),
            ends_after: Some(n),
        }
    }
}

impl GameRules for ScriptedRules {
    type Error = Infallible;

    fn apply_move(&self, mv: &GameMove) -> Result<Self, Self::Error> {
        let mut next = self.clone();
        next.moves.push(mv.clone());
        Ok(next)
    }

    fn is_game_over(&self) -> bool {
        self.ends_after.is_some_and(|n| self.moves.len() >= n)
    }
}
