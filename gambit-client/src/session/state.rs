use crate::peer::LinkState;

/// Lifecycle of one game session, as exposed to the front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Waiting for a second participant; no negotiation started.
    Idle,
    /// Offer/answer/ICE exchange in flight.
    Negotiating,
    /// Peer link established; the live game view can render.
    Connected,
    /// The remote peer went away.
    Disconnected,
    /// Negotiation or the established link failed.
    Failed,
    /// The link was closed.
    Closed,
}

impl ConnectionState {
    /// Render gate: show the live game instead of the loading placeholder.
    pub fn is_connected(self) -> bool {
        matches!(self, Self::Connected)
    }

    /// A terminal session never resumes; the front end redirects away.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Disconnected | Self::Failed | Self::Closed)
    }
}

impl From<LinkState> for ConnectionState {
    fn from(state: LinkState) -> Self {
        match state {
            LinkState::Connected => Self::Connected,
            LinkState::Disconnected => Self::Disconnected,
            LinkState::Failed => Self::Failed,
            LinkState::Closed => Self::Closed,
        }
    }
}
