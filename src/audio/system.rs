use std::sync::Arc;

use arc_swap::ArcSwap;
use flume::Sender;
use tokio::task::JoinHandle;

use crate::{
    audio::{
        commands::Intent,
        config::FeedConfig,
        controller::PlaybackController,
        traits::{MediaPlayer, SongProvider},
    },
    event::events::{ControllerMessage, Event, PlayerEventSink},
    ui::state::UiState,
};

/// Starts a controller on its own task.
pub fn spawn_controller(
    config: FeedConfig,
    provider: Arc<dyn SongProvider>,
    event_tx: Sender<Event>,
) -> (ControllerHandle, JoinHandle<()>) {
    let controller = PlaybackController::new(config, provider, event_tx);
    let handle = controller.handle();
    (handle, tokio::spawn(controller.run()))
}

/// Cheap, cloneable front door to a running [`PlaybackController`].
#[derive(Clone)]
pub struct ControllerHandle {
    tx: Sender<ControllerMessage>,
    state: Arc<ArcSwap<UiState>>,
}

impl ControllerHandle {
    pub(crate) fn new(tx: Sender<ControllerMessage>, state: Arc<ArcSwap<UiState>>) -> Self {
        Self { tx, state }
    }

    pub fn send(&self, intent: Intent) {
        let _ = self.tx.send(ControllerMessage::Intent(intent));
    }

    pub fn bind_player(&self, player: Box<dyn MediaPlayer>) {
        let _ = self.tx.send(ControllerMessage::BindPlayer(player));
    }

    pub fn player_events(&self) -> PlayerEventSink {
        PlayerEventSink::new(self.tx.clone())
    }

    pub fn shutdown(&self) {
        let _ = self.tx.send(ControllerMessage::Shutdown);
    }

    pub fn snapshot(&self) -> Arc<UiState> {
        self.state.load_full()
    }

    pub fn num_songs(&self) -> usize {
        self.state.load().songs.len()
    }

    pub fn toggle_playing(&self) {
        self.send(Intent::TogglePlaying);
    }

    pub fn seek_to_index(&self, index: usize) {
        self.send(Intent::SeekToIndex(index));
    }

    pub fn drag_slider(&self, time_ms: f32) {
        self.send(Intent::SliderDrag(time_ms));
    }

    pub fn commit_seek(&self) {
        self.send(Intent::SeekCommit);
    }

    pub fn seek_to_start(&self) {
        self.send(Intent::SeekToStart);
    }

    pub fn set_liked(&self, liked: bool) {
        self.send(Intent::Like(liked));
    }

    pub fn set_disliked(&self, disliked: bool) {
        self.send(Intent::Dislike(disliked));
    }

    pub fn share(&self) {
        self.send(Intent::Share);
    }
}
