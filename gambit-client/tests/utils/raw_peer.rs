use super::hub::{HubTransport, RendezvousHub};
use anyhow::{Context, Result};
use gambit_client::signaling::SignalingTransport;
use gambit_core::{RoomId, SignalMessage};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, mpsc, watch};
use webrtc::api::APIBuilder;
use webrtc::api::interceptor_registry::register_default_interceptors;
use webrtc::api::media_engine::MediaEngine;
use webrtc::data_channel::RTCDataChannel;
use webrtc::data_channel::data_channel_message::DataChannelMessage;
use webrtc::ice_transport::ice_candidate::{RTCIceCandidate, RTCIceCandidateInit};
use webrtc::interceptor::registry::Registry;
use webrtc::peer_connection::RTCPeerConnection;
use webrtc::peer_connection::configuration::RTCConfiguration;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;

/// A bare webrtc guest driven directly against the hub, bypassing the
/// session stack. Lets tests inject arbitrary raw frames into a real
/// session's data channel.
pub struct RawPeer {
    pc: Arc<RTCPeerConnection>,
    channel: Arc<Mutex<Option<Arc<RTCDataChannel>>>>,
    received: Arc<Mutex<Vec<String>>>,
    open_rx: watch::Receiver<bool>,
}

impl RawPeer {
    /// Join the room as the answering side and start reacting to offers
    /// and ICE candidates in the background.
    pub async fn join(hub: &RendezvousHub, room_id: RoomId) -> Result<Self> {
        let (transport, signal_rx) = hub.connect().await;
        let transport = Arc::new(transport);

        let mut media = MediaEngine::default();
        media.register_default_codecs()?;
        let registry = register_default_interceptors(Registry::new(), &mut media)?;
        let api = APIBuilder::new()
            .with_media_engine(media)
            .with_interceptor_registry(registry)
            .build();
        let pc = Arc::new(
            api.new_peer_connection(RTCConfiguration::default())
                .await?,
        );

        let channel: Arc<Mutex<Option<Arc<RTCDataChannel>>>> = Arc::new(Mutex::new(None));
        let received: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
        let (open_tx, open_rx) = watch::channel(false);

        let dc_slot = channel.clone();
        let dc_received = received.clone();
        pc.on_data_channel(Box::new(move |dc: Arc<RTCDataChannel>| {
            let slot = dc_slot.clone();
            let received = dc_received.clone();
            let open_tx = open_tx.clone();
            Box::pin(async move {
                let msg_received = received.clone();
                dc.on_message(Box::new(move |msg: DataChannelMessage| {
                    let received = msg_received.clone();
                    Box::pin(async move {
                        if let Ok(text) = String::from_utf8(msg.data.to_vec()) {
                            received.lock().await.push(text);
                        }
                    })
                }));
                dc.on_open(Box::new(move || {
                    let open_tx = open_tx.clone();
                    Box::pin(async move {
                        let _ = open_tx.send(true);
                    })
                }));
                *slot.lock().await = Some(dc);
            })
        }));

        let ice_transport = transport.clone();
        let ice_room = room_id.clone();
        pc.on_ice_candidate(Box::new(move |c: Option<RTCIceCandidate>| {
            let transport = ice_transport.clone();
            let room_id = ice_room.clone();
            Box::pin(async move {
                let Some(candidate) = c else { return };
                let Ok(init) = candidate.to_json() else {
                    return;
                };
                let Ok(json) = serde_json::to_string(&init) else {
                    return;
                };
                let _ = transport
                    .emit(SignalMessage::Ice {
                        room_id,
                        candidate: json,
                    })
                    .await;
            })
        }));

        transport
            .emit(SignalMessage::JoinRoom {
                room_id: room_id.clone(),
            })
            .await
            .ok();

        tokio::spawn(drive_signaling(
            pc.clone(),
            transport,
            room_id,
            signal_rx,
        ));

        Ok(Self {
            pc,
            channel,
            received,
            open_rx,
        })
    }

    pub async fn wait_channel_open(&self, timeout_ms: u64) -> Result<()> {
        let mut open_rx = self.open_rx.clone();
        tokio::time::timeout(Duration::from_millis(timeout_ms), async {
            while !*open_rx.borrow() {
                if open_rx.changed().await.is_err() {
                    break;
                }
            }
        })
        .await
        .context("data channel never opened")?;
        Ok(())
    }

    /// Send a raw text frame, valid protocol or not.
    pub async fn send_text(&self, text: &str) -> Result<()> {
        let guard = self.channel.lock().await;
        let dc = guard.as_ref().context("no data channel yet")?;
        dc.send_text(text.to_string()).await?;
        Ok(())
    }

    pub async fn texts(&self) -> Vec<String> {
        self.received.lock().await.clone()
    }

    pub async fn close(&self) -> Result<()> {
        self.pc.close().await?;
        Ok(())
    }
}

/// Answer the first offer and feed remote candidates into the connection.
async fn drive_signaling(
    pc: Arc<RTCPeerConnection>,
    transport: Arc<HubTransport>,
    room_id: RoomId,
    mut signal_rx: mpsc::Receiver<SignalMessage>,
) {
    while let Some(msg) = signal_rx.recv().await {
        match msg {
            SignalMessage::Offer { offer, .. } => {
                let Ok(desc) = RTCSessionDescription::offer(offer) else {
                    continue;
                };
                if pc.set_remote_description(desc).await.is_err() {
                    continue;
                }
                let Ok(answer) = pc.create_answer(None).await else {
                    continue;
                };
                let sdp = answer.sdp.clone();
                if pc.set_local_description(answer).await.is_err() {
                    continue;
                }
                let _ = transport
                    .emit(SignalMessage::Answer {
                        room_id: room_id.clone(),
                        answer: sdp,
                    })
                    .await;
            }
            SignalMessage::Ice { candidate, .. } => {
                if let Ok(init) = serde_json::from_str::<RTCIceCandidateInit>(&candidate) {
                    let _ = pc.add_ice_candidate(init).await;
                }
            }
            _ => {}
        }
    }
}
