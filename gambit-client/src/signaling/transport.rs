use crate::ClientError;
use async_trait::async_trait;
use gambit_core::SignalMessage;

/// Outbound half of the rendezvous connection.
///
/// The inbound half is the `mpsc::Receiver<SignalMessage>` handed out when
/// the transport is opened; the session loop drains it. No retries live at
/// this layer — a severed transport is surfaced as a terminal state by the
/// session, never auto-reconnected.
#[async_trait]
pub trait SignalingTransport: Send + Sync {
    /// Send one envelope to the rendezvous server.
    async fn emit(&self, msg: SignalMessage) -> Result<(), ClientError>;

    /// Close the underlying connection. Safe to call more than once; only
    /// the first call closes anything.
    async fn disconnect(&self);
}
