use crate::ClientError;
use crate::peer::{LinkConfig, LinkEvent, LinkState};
use gambit_core::ProtocolError;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use webrtc::api::APIBuilder;
use webrtc::api::interceptor_registry::register_default_interceptors;
use webrtc::api::media_engine::MediaEngine;
use webrtc::data_channel::RTCDataChannel;
use webrtc::data_channel::data_channel_message::DataChannelMessage;
use webrtc::ice_transport::ice_candidate::{RTCIceCandidate, RTCIceCandidateInit};
use webrtc::ice_transport::ice_connection_state::RTCIceConnectionState;
use webrtc::ice_transport::ice_server::RTCIceServer;
use webrtc::interceptor::registry::Registry;
use webrtc::peer_connection::RTCPeerConnection;
use webrtc::peer_connection::configuration::RTCConfiguration;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;

/// Owns the peer-to-peer connection for one session.
///
/// Callbacks forward everything into the session loop through `event_tx`;
/// nothing is mutated from inside a webrtc callback.
pub struct PeerLink {
    pc: Arc<RTCPeerConnection>,
    config: LinkConfig,
    event_tx: mpsc::Sender<LinkEvent>,
}

impl PeerLink {
    pub async fn new(
        config: LinkConfig,
        event_tx: mpsc::Sender<LinkEvent>,
    ) -> Result<Self, ClientError> {
        let mut media = MediaEngine::default();
        media.register_default_codecs()?;
        let registry = register_default_interceptors(Registry::new(), &mut media)?;

        let api = APIBuilder::new()
            .with_media_engine(media)
            .with_interceptor_registry(registry)
            .build();

        let ice_servers = if config.ice_servers.is_empty() {
            vec![]
        } else {
            vec![RTCIceServer {
                urls: config.ice_servers.clone(),
                ..Default::default()
            }]
        };

        let pc = Arc::new(
            api.new_peer_connection(RTCConfiguration {
                ice_servers,
                ..Default::default()
            })
            .await?,
        );

        // Trickle ICE: every discovered local candidate goes to the session,
        // which wraps it in a room-scoped envelope.
        let ice_tx = event_tx.clone();
        pc.on_ice_candidate(Box::new(move |c: Option<RTCIceCandidate>| {
            let tx = ice_tx.clone();
            Box::pin(async move {
                let Some(candidate) = c else { return };
                let Ok(init) = candidate.to_json() else {
                    return;
                };
                let Ok(json) = serde_json::to_string(&init) else {
                    return;
                };
                let _ = tx.send(LinkEvent::CandidateReady(json)).await;
            })
        }));

        let state_tx = event_tx.clone();
        pc.on_ice_connection_state_change(Box::new(move |s: RTCIceConnectionState| {
            let tx = state_tx.clone();
            Box::pin(async move {
                debug!("ice connection state: {s:?}");
                if let Some(mapped) = LinkState::from_ice(s) {
                    let _ = tx.send(LinkEvent::StateChanged(mapped)).await;
                }
            })
        }));

        Ok(Self {
            pc,
            config,
            event_tx,
        })
    }

    /// Host path: create the data channel and the offer, set the offer as
    /// the local description and return its SDP for the signaling layer.
    pub async fn open_as_host(&self) -> Result<String, ClientError> {
        let dc = self
            .pc
            .create_data_channel(&self.config.channel_label, None)
            .await?;
        wire_channel(dc, self.event_tx.clone());

        let offer = self.pc.create_offer(None).await?;
        let sdp = offer.sdp.clone();
        self.pc.set_local_description(offer).await?;
        Ok(sdp)
    }

    /// Guest path: start watching for the host-created data channel, apply
    /// the remote offer and produce the local answer.
    pub async fn accept_offer(&self, offer_sdp: String) -> Result<String, ClientError> {
        let dc_tx = self.event_tx.clone();
        self.pc
            .on_data_channel(Box::new(move |dc: Arc<RTCDataChannel>| {
                let tx = dc_tx.clone();
                Box::pin(async move {
                    info!("data channel '{}' received", dc.label());
                    wire_channel(dc, tx);
                })
            }));

        let offer = RTCSessionDescription::offer(offer_sdp)?;
        self.pc.set_remote_description(offer).await?;

        let answer = self.pc.create_answer(None).await?;
        let sdp = answer.sdp.clone();
        self.pc.set_local_description(answer).await?;
        Ok(sdp)
    }

    /// Host side: apply the guest's answer as the remote description.
    pub async fn apply_answer(&self, answer_sdp: String) -> Result<(), ClientError> {
        let answer = RTCSessionDescription::answer(answer_sdp)?;
        self.pc.set_remote_description(answer).await?;
        Ok(())
    }

    /// Add a remote trickle ICE candidate. The candidate string is the
    /// JSON-encoded init produced by the other side's `on_ice_candidate`.
    pub async fn add_remote_candidate(&self, candidate_json: &str) -> Result<(), ClientError> {
        let init: RTCIceCandidateInit =
            serde_json::from_str(candidate_json).map_err(ProtocolError::from)?;
        self.pc.add_ice_candidate(init).await?;
        Ok(())
    }

    pub async fn close(&self) {
        if let Err(e) = self.pc.close().await {
            debug!("peer connection close: {e}");
        }
    }
}

/// Wire a data channel (locally created or remotely received) into the
/// session loop: surface it once writable, forward every text frame.
fn wire_channel(dc: Arc<RTCDataChannel>, event_tx: mpsc::Sender<LinkEvent>) {
    let open_dc = dc.clone();
    let open_tx = event_tx.clone();
    dc.on_open(Box::new(move || {
        let tx = open_tx.clone();
        let dc = open_dc.clone();
        Box::pin(async move {
            info!("data channel '{}' open", dc.label());
            let _ = tx.send(LinkEvent::ChannelOpen(dc)).await;
        })
    }));

    dc.on_message(Box::new(move |msg: DataChannelMessage| {
        let tx = event_tx.clone();
        Box::pin(async move {
            match String::from_utf8(msg.data.to_vec()) {
                Ok(text) => {
                    let _ = tx.send(LinkEvent::ChannelText(text)).await;
                }
                Err(_) => warn!("non-utf8 frame on data channel, dropping"),
            }
        })
    }));
}
