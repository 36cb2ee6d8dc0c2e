use super::rules::ScriptedRules;
use async_trait::async_trait;
use gambit_client::{ChatEntry, Notice, SessionBehavior};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Everything a session reports to its front end, in arrival order.
#[derive(Debug, Clone)]
pub enum UiEvent {
    Chat(ChatEntry),
    Game(ScriptedRules),
    Notice(Notice),
}

/// Behavior double that records every collaborator call.
#[derive(Clone, Default)]
pub struct RecordingBehavior {
    events: Arc<Mutex<Vec<UiEvent>>>,
}

impl RecordingBehavior {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn events(&self) -> Vec<UiEvent> {
        self.events.lock().await.clone()
    }

    pub async fn chats(&self) -> Vec<ChatEntry> {
        self.events
            .lock()
            .await
            .iter()
            .filter_map(|e| match e {
                UiEvent::Chat(entry) => Some(entry.clone()),
                _ => None,
            })
            .collect()
    }

    pub async fn games(&self) -> Vec<ScriptedRules> {
        self.events
            .lock()
            .await
            .iter()
            .filter_map(|e| match e {
                UiEvent::Game(game) => Some(game.clone()),
                _ => None,
            })
            .collect()
    }

    pub async fn notices(&self) -> Vec<Notice> {
        self.events
            .lock()
            .await
            .iter()
            .filter_map(|e| match e {
                UiEvent::Notice(notice) => Some(*notice),
                _ => None,
            })
            .collect()
    }

    pub async fn notice_count(&self, notice: Notice) -> usize {
        self.notices().await.iter().filter(|n| **n == notice).count()
    }

    /// Poll until a notice arrives or the timeout expires.
    pub async fn wait_for_notice(&self, notice: Notice, timeout_ms: u64) -> bool {
        let start = Instant::now();
        let timeout = Duration::from_millis(timeout_ms);

        loop {
            if self.notice_count(notice).await > 0 {
                return true;
            }
            if start.elapsed() > timeout {
                return false;
            }
            tokio::time::sleep(Duration::from_millis(25)).await;
        }
    }

    /// Poll until at least one chat entry was recorded.
    pub async fn wait_for_chat(&self, timeout_ms: u64) -> bool {
        let start = Instant::now();
        let timeout = Duration::from_millis(timeout_ms);

        loop {
            if !self.chats().await.is_empty() {
                return true;
            }
            if start.elapsed() > timeout {
                return false;
            }
            tokio::time::sleep(Duration::from_millis(25)).await;
        }
    }

    /// Poll until at least one game replacement was recorded.
    pub async fn wait_for_game(&self, timeout_ms: u64) -> bool {
        let start = Instant::now();
        let timeout = Duration::from_millis(timeout_ms);

        loop {
            if !self.games().await.is_empty() {
                return true;
            }
            if start.elapsed() > timeout {
                return false;
            }
            tokio::time::sleep(Duration::from_millis(25)).await;
        }
    }
}

#[async_trait]
impl SessionBehavior<ScriptedRules> for RecordingBehavior {
    async fn on_chat(&self, entry: ChatEntry) {
        tracing::info!(?entry, "recorded chat");
        self.events.lock().await.push(UiEvent::Chat(entry));
    }

    async fn on_game(&self, game: &ScriptedRules) {
        tracing::info!(moves = game.moves.len(), "recorded game");
        self.events.lock().await.push(UiEvent::Game(game.clone()));
    }

    async fn on_notice(&self, notice: Notice) {
        tracing::info!(?notice, "recorded notice");
        self.events.lock().await.push(UiEvent::Notice(notice));
    }
}
