use std::sync::Arc;
use webrtc::data_channel::RTCDataChannel;
use webrtc::ice_transport::ice_connection_state::RTCIceConnectionState;

/// ICE connection states the session acts on.
///
/// Everything except `Connected` is terminal: once observed, the session is
/// finished and the front end is told to leave.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Connected,
    Disconnected,
    Failed,
    Closed,
}

impl LinkState {
    /// Map the raw ICE connection state. `None` for the transitional
    /// states (checking, new, ...) the session does not react to.
    pub fn from_ice(state: RTCIceConnectionState) -> Option<Self> {
        match state {
            RTCIceConnectionState::Connected | RTCIceConnectionState::Completed => {
                Some(Self::Connected)
            }
            RTCIceConnectionState::Disconnected => Some(Self::Disconnected),
            RTCIceConnectionState::Failed => Some(Self::Failed),
            RTCIceConnectionState::Closed => Some(Self::Closed),
            _ => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Connected)
    }
}

/// Events a [`super::PeerLink`] feeds into the session loop.
pub enum LinkEvent {
    /// A local ICE candidate is ready to be relayed to the remote peer.
    CandidateReady(String),
    /// The ICE connection state changed to something actionable.
    StateChanged(LinkState),
    /// The data channel is open and writable.
    ChannelOpen(Arc<RTCDataChannel>),
    /// A text frame arrived on the data channel.
    ChannelText(String),
}
