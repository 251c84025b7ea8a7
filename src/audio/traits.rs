use crate::audio::{
    error::AudioError,
    state::{MediaItem, PlayerState},
};
use crate::http::model::Song;
use async_trait::async_trait;
use std::time::Duration;

#[async_trait]
pub trait SongProvider: Send + Sync {
    async fn fetch_songs(&self, page: u32, page_size: u32) -> Result<Vec<Song>, AudioError>;
}

/// Queue-based player driven by the playback controller.
///
/// Commands never block; progress is reported back through a
/// [`PlayerEventSink`](crate::event::events::PlayerEventSink).
pub trait MediaPlayer: Send {
    fn add_items(&mut self, items: Vec<MediaItem>);
    fn prepare(&mut self);
    fn set_play_when_ready(&mut self, play: bool);
    fn seek_to_index(&mut self, index: usize);
    fn seek_to_position(&mut self, position: Duration);

    fn current_index(&self) -> Option<usize>;
    fn position(&self) -> Duration;
    fn item_count(&self) -> usize;
    fn playback_state(&self) -> PlayerState;
}
