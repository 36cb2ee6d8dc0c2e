use gambit_core::ProtocolError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("webrtc error: {0}")]
    WebRtc(#[from] webrtc::Error),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The signaling connection is gone; nothing can be emitted anymore.
    #[error("signaling transport closed")]
    TransportClosed,

    /// The session event loop has exited; the handle is stale.
    #[error("session closed")]
    SessionClosed,
}
