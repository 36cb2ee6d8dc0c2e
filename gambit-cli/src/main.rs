use std::convert::Infallible;
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use clap::Parser;
use colored::Colorize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use gambit_client::peer::LinkConfig;
use gambit_client::signaling::WsTransport;
use gambit_client::{
    ChatEntry, GameRules, Notice, Session, SessionBehavior, SessionHandle,
};
use gambit_core::{GameMove, RoomId};

/// Peer-to-peer chess client. Connects to a rendezvous server, joins a
/// room and talks to the other player directly once negotiation completes.
#[derive(Parser)]
#[command(name = "gambit")]
struct Args {
    /// Signaling server url, e.g. ws://localhost:4000/signal
    #[arg(short, long)]
    server: String,

    /// Room to join. A fresh room id is generated (and printed) when
    /// omitted, so the other player can join it.
    #[arg(short, long)]
    room: Option<String>,
}

/// Stand-in for the real chess-rules collaborator: records the moves it is
/// asked to apply and never declares the game over. A proper front end
/// plugs a rules engine in here.
#[derive(Clone, Default)]
struct MoveLog {
    moves: Vec<GameMove>,
}

impl GameRules for MoveLog {
    type Error = Infallible;

    fn apply_move(&self, mv: &GameMove) -> Result<Self, Self::Error> {
        let mut next = self.clone();
        next.moves.push(mv.clone());
        Ok(next)
    }

    fn is_game_over(&self) -> bool {
        false
    }
}

/// Prints everything the session reports.
struct Console;

#[async_trait]
impl SessionBehavior<MoveLog> for Console {
    async fn on_chat(&self, entry: ChatEntry) {
        let who = if entry.own { "you" } else { "them" };
        println!("{} {}", format!("[{who}]").cyan(), entry.text);
    }

    async fn on_game(&self, game: &MoveLog) {
        if let Some(mv) = game.moves.last() {
            println!("{} {} -> {}", "[move]".green(), mv.from, mv.to);
        }
    }

    async fn on_notice(&self, notice: Notice) {
        let line = match notice {
            Notice::Leave => "the other player left the game",
            Notice::Lose => "checkmate — you lose",
            Notice::RoomFull => "that room is already full",
        };
        println!("{} {}", "[!]".red().bold(), line);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let room_id = match &args.room {
        Some(room) => RoomId::from(room.clone()),
        None => {
            let room_id = RoomId::random();
            println!("hosting room {}", room_id.to_string().yellow());
            room_id
        }
    };

    let (transport, signal_rx) = WsTransport::connect(&args.server)
        .await
        .context("failed to reach the signaling server")?;

    let (session, handle) = Session::new(
        room_id,
        Arc::new(transport),
        signal_rx,
        LinkConfig::default(),
        MoveLog::default(),
        Console,
    );
    let session_task = tokio::spawn(session.run());

    println!("waiting for an opponent... (chat, {} to move, {} to quit)",
        "/move e2 e4".bold(),
        "/quit".bold(),
    );
    repl(handle).await?;

    session_task.await.ok();
    Ok(())
}

/// Line-oriented stand-in for the game screen: plain text is chat, `/move`
/// sends a move, `/quit` leaves.
async fn repl(handle: SessionHandle) -> Result<()> {
    let mut watch = handle.clone();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            state = watch.state_changed() => match state {
                Some(state) if state.is_connected() => {
                    println!("{}", "connected — game on".green().bold());
                }
                Some(state) if state.is_terminal() => return Ok(()),
                Some(_) => {}
                // The session loop exited without a terminal state (room
                // full); the watch is closed for good, so leave the screen.
                None => return Ok(()),
            },
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                if line == "/quit" {
                    break;
                }
                if let Some(rest) = line.strip_prefix("/move ") {
                    match rest.split_once(' ') {
                        Some((from, to)) => {
                            if handle.send_move(GameMove::new(from, to)).await.is_err() {
                                return Ok(());
                            }
                        }
                        None => println!("usage: /move <from> <to>"),
                    }
                    continue;
                }
                if handle.send_chat(line).await.is_err() {
                    return Ok(());
                }
                Console.on_chat(ChatEntry { own: true, text: line.to_string() }).await;
            }
        }
    }

    handle.leave().await;
    Ok(())
}
