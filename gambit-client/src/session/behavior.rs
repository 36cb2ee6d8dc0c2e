use async_trait::async_trait;

/// One line of the chat log.
///
/// The collaborator owns the ordered list and prepends incoming entries
/// (most-recent-first).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatEntry {
    /// True when the local side wrote the line.
    pub own: bool,
    pub text: String,
}

/// Modal notifications the front end renders. Fire-and-forget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    /// The remote peer left or the link died; the session is over.
    Leave,
    /// The remote move ended the game, against the local side.
    Lose,
    /// The room already has two participants; the session never started.
    /// The front end alerts and navigates back.
    RoomFull,
}

/// UI-side collaborator of a session, generic over the rules value `R`.
///
/// Mirrors what the front end owns: the chat list, the rendered game state
/// and the pop-up layer. No return values are consumed.
#[async_trait]
pub trait SessionBehavior<R>: Send + Sync {
    /// A chat line arrived from the remote peer.
    async fn on_chat(&self, entry: ChatEntry);

    /// The stored game value was replaced after a remote move.
    async fn on_game(&self, game: &R);

    /// A modal notification to display.
    async fn on_notice(&self, notice: Notice);
}
