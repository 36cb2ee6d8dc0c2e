use crate::ClientError;
use crate::signaling::SignalingTransport;
use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use gambit_core::{ProtocolError, SignalMessage};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};

/// WebSocket signaling transport.
///
/// Exactly one long-lived socket per session. A reader task parses incoming
/// text frames into [`SignalMessage`]s (malformed frames are logged and
/// skipped); a writer task drains an unbounded channel into the sink. When
/// the server side goes away the receiver returned by [`WsTransport::connect`]
/// yields `None` and the session treats that as terminal.
pub struct WsTransport {
    out_tx: mpsc::UnboundedSender<Message>,
    closed: AtomicBool,
}

impl WsTransport {
    /// Open the rendezvous connection and start the pump tasks.
    pub async fn connect(
        url: &str,
    ) -> Result<(Self, mpsc::Receiver<SignalMessage>), ClientError> {
        let (socket, _) = connect_async(url).await?;
        info!(url, "signaling connected");

        let (mut sink, mut stream) = socket.split();
        let (out_tx, mut out_rx) = mpsc::unbounded_channel::<Message>();
        let (in_tx, in_rx) = mpsc::channel(64);

        tokio::spawn(async move {
            while let Some(msg) = out_rx.recv().await {
                let is_close = matches!(msg, Message::Close(_));
                if sink.send(msg).await.is_err() || is_close {
                    break;
                }
            }
            debug!("signaling writer finished");
        });

        tokio::spawn(async move {
            while let Some(Ok(msg)) = stream.next().await {
                match msg {
                    Message::Text(text) => {
                        match serde_json::from_str::<SignalMessage>(&text) {
                            Ok(signal) => {
                                if in_tx.send(signal).await.is_err() {
                                    break;
                                }
                            }
                            Err(e) => warn!("dropping malformed signal frame: {e}"),
                        }
                    }
                    Message::Close(_) => break,
                    _ => {}
                }
            }
            info!("signaling stream ended");
        });

        Ok((
            Self {
                out_tx,
                closed: AtomicBool::new(false),
            },
            in_rx,
        ))
    }
}

#[async_trait]
impl SignalingTransport for WsTransport {
    async fn emit(&self, msg: SignalMessage) -> Result<(), ClientError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(ClientError::TransportClosed);
        }
        let text = serde_json::to_string(&msg).map_err(ProtocolError::from)?;
        self.out_tx
            .send(Message::Text(text.into()))
            .map_err(|_| ClientError::TransportClosed)?;
        Ok(())
    }

    async fn disconnect(&self) {
        if !self.closed.swap(true, Ordering::SeqCst) {
            let _ = self.out_tx.send(Message::Close(None));
        }
    }
}
