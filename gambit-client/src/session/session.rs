use crate::peer::{LinkConfig, LinkEvent, LinkState, PeerLink};
use crate::session::{
    ChatEntry, ConnectionState, GameRules, Notice, SessionBehavior, SessionCommand, SessionHandle,
};
use crate::signaling::SignalingTransport;
use gambit_core::{AppMessage, GameMove, PeerRole, RoomId, SignalMessage};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, warn};
use webrtc::data_channel::RTCDataChannel;

/// Lifecycle controller for one two-party game session.
///
/// Owns the peer link, the bound data channel, the game value and the
/// connection state for its whole lifetime. Everything is mutated from the
/// single [`Session::run`] task, so there are no locks; webrtc callbacks
/// and the signaling socket only feed events into the loop's channels.
pub struct Session<R, B>
where
    R: GameRules,
    B: SessionBehavior<R>,
{
    room_id: RoomId,
    transport: Arc<dyn SignalingTransport>,
    signal_rx: mpsc::Receiver<SignalMessage>,
    link_config: LinkConfig,
    link_tx: mpsc::Sender<LinkEvent>,
    link_rx: mpsc::Receiver<LinkEvent>,
    cmd_rx: mpsc::Receiver<SessionCommand>,
    link: Option<PeerLink>,
    channel: Option<Arc<RTCDataChannel>>,
    role: Option<PeerRole>,
    game: R,
    behavior: B,
    state_tx: watch::Sender<ConnectionState>,
    torn_down: bool,
}

impl<R, B> Session<R, B>
where
    R: GameRules,
    B: SessionBehavior<R>,
{
    /// Build a session over an already-connected signaling transport.
    /// The caller spawns [`Session::run`] and keeps the returned handle.
    pub fn new(
        room_id: RoomId,
        transport: Arc<dyn SignalingTransport>,
        signal_rx: mpsc::Receiver<SignalMessage>,
        link_config: LinkConfig,
        game: R,
        behavior: B,
    ) -> (Self, SessionHandle) {
        let (cmd_tx, cmd_rx) = mpsc::channel(64);
        let (link_tx, link_rx) = mpsc::channel(256);
        let (state_tx, state_rx) = watch::channel(ConnectionState::Idle);

        let session = Self {
            room_id,
            transport,
            signal_rx,
            link_config,
            link_tx,
            link_rx,
            cmd_rx,
            link: None,
            channel: None,
            role: None,
            game,
            behavior,
            state_tx,
            torn_down: false,
        };
        let handle = SessionHandle::new(cmd_tx, state_rx);
        (session, handle)
    }

    /// The session event loop. Runs until the session terminates, then
    /// tears everything down exactly once.
    pub async fn run(mut self) {
        if let Err(e) = self
            .transport
            .emit(SignalMessage::JoinRoom {
                room_id: self.room_id.clone(),
            })
            .await
        {
            error!("failed to announce room join: {e}");
            self.set_state(ConnectionState::Failed);
            self.teardown().await;
            return;
        }
        info!(room = %self.room_id, "session started");

        loop {
            tokio::select! {
                signal = self.signal_rx.recv() => match signal {
                    Some(signal) => {
                        if self.handle_signal(signal).await {
                            break;
                        }
                    }
                    None => {
                        warn!("signaling connection lost");
                        self.set_state(ConnectionState::Failed);
                        self.behavior.on_notice(Notice::Leave).await;
                        break;
                    }
                },
                event = self.link_rx.recv() => {
                    // link_tx is held by self, so recv never yields None.
                    if let Some(event) = event {
                        if self.handle_link_event(event).await {
                            break;
                        }
                    }
                },
                cmd = self.cmd_rx.recv() => match cmd {
                    Some(SessionCommand::Leave) | None => break,
                    Some(cmd) => self.handle_command(cmd).await,
                },
            }
        }

        self.teardown().await;
    }

    /// React to one envelope from the rendezvous server. Returns true when
    /// the session should terminate.
    async fn handle_signal(&mut self, signal: SignalMessage) -> bool {
        match signal {
            SignalMessage::Joined => self.assign_role(PeerRole::Host).await,
            SignalMessage::OtherJoined => self.assign_role(PeerRole::Guest).await,
            SignalMessage::Offer { offer, .. } => self.answer_offer(offer).await,
            SignalMessage::Answer { answer, .. } => {
                match &self.link {
                    Some(link) => {
                        if let Err(e) = link.apply_answer(answer).await {
                            // Not retried; a failed negotiation surfaces as
                            // an ICE failure later.
                            error!("failed to apply answer: {e}");
                        }
                    }
                    None => debug!("answer received before peer connection exists, dropping"),
                }
                false
            }
            SignalMessage::Ice { candidate, .. } => {
                // Candidates may race ahead of link creation; those are
                // dropped, not errors.
                if let Some(link) = &self.link {
                    if let Err(e) = link.add_remote_candidate(&candidate).await {
                        warn!("failed to add remote candidate: {e}");
                    }
                }
                false
            }
            SignalMessage::RoomFull => {
                warn!(room = %self.room_id, "room is full");
                self.behavior.on_notice(Notice::RoomFull).await;
                true
            }
            // Client-to-server events; a server echoing them is ignored.
            SignalMessage::JoinRoom { .. } | SignalMessage::Leave { .. } => false,
        }
    }

    /// Peer arrival: fix the role for the rest of the session and start
    /// negotiating. The host also creates the channel and sends the offer.
    async fn assign_role(&mut self, role: PeerRole) -> bool {
        if self.role.is_some() {
            warn!(?role, "duplicate arrival event ignored, role already fixed");
            return false;
        }
        self.role = Some(role);
        self.set_state(ConnectionState::Negotiating);
        info!(?role, "peer arrived, negotiating");

        let link = match PeerLink::new(self.link_config.clone(), self.link_tx.clone()).await {
            Ok(link) => link,
            Err(e) => {
                error!("failed to create peer connection: {e}");
                self.set_state(ConnectionState::Failed);
                self.behavior.on_notice(Notice::Leave).await;
                return true;
            }
        };

        if role.is_host() {
            match link.open_as_host().await {
                Ok(offer) => {
                    let envelope = SignalMessage::Offer {
                        room_id: self.room_id.clone(),
                        offer,
                    };
                    if let Err(e) = self.transport.emit(envelope).await {
                        error!("failed to send offer: {e}");
                    }
                }
                Err(e) => error!("failed to create offer: {e}"),
            }
        }

        self.link = Some(link);
        false
    }

    /// Guest side: answer the host's offer.
    async fn answer_offer(&mut self, offer: String) -> bool {
        let Some(link) = &self.link else {
            debug!("offer received before peer connection exists, dropping");
            return false;
        };
        match link.accept_offer(offer).await {
            Ok(answer) => {
                let envelope = SignalMessage::Answer {
                    room_id: self.room_id.clone(),
                    answer,
                };
                if let Err(e) = self.transport.emit(envelope).await {
                    error!("failed to send answer: {e}");
                }
            }
            Err(e) => error!("failed to answer offer: {e}"),
        }
        false
    }

    /// React to one event from the peer link. Returns true when the session
    /// should terminate.
    async fn handle_link_event(&mut self, event: LinkEvent) -> bool {
        match event {
            LinkEvent::CandidateReady(candidate) => {
                let envelope = SignalMessage::Ice {
                    room_id: self.room_id.clone(),
                    candidate,
                };
                if let Err(e) = self.transport.emit(envelope).await {
                    warn!("failed to relay ice candidate: {e}");
                }
                false
            }
            LinkEvent::StateChanged(LinkState::Connected) => {
                info!("peer link established");
                self.set_state(ConnectionState::Connected);
                false
            }
            LinkEvent::StateChanged(state) => {
                // Late callbacks after teardown must stay no-ops.
                if self.torn_down || self.state().is_terminal() {
                    return true;
                }
                info!(?state, "peer link terminated");
                self.set_state(state.into());
                self.behavior.on_notice(Notice::Leave).await;
                true
            }
            LinkEvent::ChannelOpen(channel) => {
                self.channel = Some(channel);
                false
            }
            LinkEvent::ChannelText(text) => {
                self.dispatch(text).await;
                false
            }
        }
    }

    /// Application message multiplexer, receive side: decode, validate the
    /// kind, dispatch to the collaborators.
    async fn dispatch(&mut self, text: String) {
        let msg = match AppMessage::decode(&text) {
            Ok(msg) => msg,
            Err(e) => {
                // Unknown or malformed kinds are dropped; nothing else
                // changes and the session keeps running.
                error!("invalid application message: {e}");
                return;
            }
        };

        match msg {
            AppMessage::Msg(text) => {
                self.behavior.on_chat(ChatEntry { own: false, text }).await;
            }
            AppMessage::Game {
                source_square,
                target_square,
            } => {
                // Promotion is forced to queen at this boundary.
                let mv = GameMove::new(source_square, target_square);
                match self.game.apply_move(&mv) {
                    Ok(next) => {
                        self.game = next;
                        self.behavior.on_game(&self.game).await;
                        if self.game.is_game_over() {
                            // The remote peer made the ending move, so the
                            // local side is the losing party.
                            self.behavior.on_notice(Notice::Lose).await;
                        }
                    }
                    Err(e) => error!("rules collaborator rejected remote move: {e}"),
                }
            }
        }
    }

    async fn handle_command(&mut self, cmd: SessionCommand) {
        let msg = match cmd {
            SessionCommand::SendChat(text) => AppMessage::Msg(text),
            SessionCommand::SendMove(mv) => AppMessage::Game {
                source_square: mv.from,
                target_square: mv.to,
            },
            // Handled by the loop itself.
            SessionCommand::Leave => return,
        };
        self.send_app_message(msg).await;
    }

    /// Application message multiplexer, send side. Without a bound channel
    /// the message is silently dropped — documented contract.
    async fn send_app_message(&self, msg: AppMessage) {
        let Some(channel) = &self.channel else {
            debug!("no data channel bound, dropping outgoing message");
            return;
        };
        match msg.encode() {
            Ok(text) => {
                if let Err(e) = channel.send_text(text).await {
                    warn!("data channel send failed: {e}");
                }
            }
            Err(e) => error!("failed to encode application message: {e}"),
        }
    }

    fn state(&self) -> ConnectionState {
        *self.state_tx.borrow()
    }

    /// Terminal states are sticky; everything else replaces freely.
    fn set_state(&self, state: ConnectionState) {
        let current = self.state();
        if current == state || current.is_terminal() {
            return;
        }
        let _ = self.state_tx.send(state);
    }

    /// Mirrors the front end's unmount cleanup: leave the room, close the
    /// socket, close the peer connection. Runs at most once.
    async fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;

        let _ = self
            .transport
            .emit(SignalMessage::Leave {
                room_id: self.room_id.clone(),
            })
            .await;
        self.transport.disconnect().await;
        if let Some(link) = self.link.take() {
            link.close().await;
        }
        self.channel = None;
        info!(room = %self.room_id, "session torn down");
    }
}
