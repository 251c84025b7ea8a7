use std::sync::Arc;

use flume::Sender;

use crate::{
    audio::{commands::Intent, state::PlayerState, traits::MediaPlayer},
    http::model::Song,
    ui::state::UiState,
};

/// Events published to the presentation layer.
#[derive(Debug, Clone)]
pub enum Event {
    StateUpdated(Arc<UiState>),
    Share(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerEvent {
    StateChanged(PlayerState),
    IndexChanged(usize),
}

/// Everything that reaches the playback controller goes through its mailbox.
pub enum ControllerMessage {
    Intent(Intent),
    Player(PlayerEvent),
    BindPlayer(Box<dyn MediaPlayer>),
    PageFetched { page: u32, songs: Vec<Song> },
    PollTick,
    Shutdown,
}

/// Handed to a [`MediaPlayer`] so it can report back to the controller.
#[derive(Clone)]
pub struct PlayerEventSink {
    tx: Sender<ControllerMessage>,
}

impl PlayerEventSink {
    pub fn new(tx: Sender<ControllerMessage>) -> Self {
        Self { tx }
    }

    pub fn send(&self, event: PlayerEvent) {
        let _ = self.tx.send(ControllerMessage::Player(event));
    }
}
