use std::{sync::Arc, time::Duration};

use arc_swap::ArcSwap;
use flume::{Receiver, Sender};
use im::Vector;
use tracing::{debug, info, warn};

use crate::{
    audio::{
        commands::Intent,
        config::FeedConfig,
        progress::{SeekTracker, TrackingPhase},
        queue::{Pagination, Prefetch, within_look_ahead},
        state::MediaItem,
        system::ControllerHandle,
        traits::{MediaPlayer, SongProvider},
    },
    event::events::{ControllerMessage, Event, PlayerEvent},
    http::model::Song,
    ui::state::{SongMetadata, UiState},
    util::{task::TaskManager, track::songs_to_media},
};

const POLL_TASK: &str = "position_poll";
const FETCH_TASK: &str = "page_fetch";

/// Owns the feed, the pagination cursor and the playhead, and drives the
/// bound [`MediaPlayer`].
///
/// All mutation happens on whichever task drives [`run`](Self::run); the
/// outside world talks to it through a [`ControllerHandle`].
pub struct PlaybackController {
    config: FeedConfig,
    provider: Arc<dyn SongProvider>,
    player: Option<Box<dyn MediaPlayer>>,
    queued_items: Vec<MediaItem>,
    deferred_seek: Option<usize>,
    state: Arc<ArcSwap<UiState>>,
    pagination: Pagination,
    prefetch: Prefetch,
    tracker: SeekTracker,
    tasks: TaskManager,
    mailbox_tx: Sender<ControllerMessage>,
    mailbox_rx: Receiver<ControllerMessage>,
    event_tx: Sender<Event>,
}

impl PlaybackController {
    pub fn new(
        config: FeedConfig,
        provider: Arc<dyn SongProvider>,
        event_tx: Sender<Event>,
    ) -> Self {
        let (mailbox_tx, mailbox_rx) = flume::unbounded();
        let pagination = Pagination::new(config.first_page);

        Self {
            config,
            provider,
            player: None,
            queued_items: Vec::new(),
            deferred_seek: None,
            state: Arc::new(ArcSwap::from_pointee(UiState::default())),
            pagination,
            prefetch: Prefetch::new(),
            tracker: SeekTracker::new(),
            tasks: TaskManager::new(),
            mailbox_tx,
            mailbox_rx,
            event_tx,
        }
    }

    pub fn handle(&self) -> ControllerHandle {
        ControllerHandle::new(self.mailbox_tx.clone(), self.state.clone())
    }

    pub fn snapshot(&self) -> Arc<UiState> {
        self.state.load_full()
    }

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    pub fn tracking_phase(&self) -> TrackingPhase {
        self.tracker.phase()
    }

    pub fn is_player_bound(&self) -> bool {
        self.player.is_some()
    }

    pub fn is_fetching(&self) -> bool {
        self.prefetch.in_flight().is_some()
    }

    pub fn num_songs(&self) -> usize {
        self.state.load().songs.len()
    }

    pub fn active_poll_timers(&self) -> usize {
        usize::from(self.tasks.is_active(POLL_TASK))
    }

    pub async fn run(mut self) {
        info!("playback_controller_started");
        while self.process_next().await {}
        self.shutdown();
        info!("playback_controller_stopped");
    }

    /// Handles one mailbox message. Returns `false` on shutdown.
    pub async fn process_next(&mut self) -> bool {
        match self.mailbox_rx.recv_async().await {
            Ok(ControllerMessage::Shutdown) | Err(_) => false,
            Ok(message) => {
                self.handle_message(message);
                true
            }
        }
    }

    pub fn handle_message(&mut self, message: ControllerMessage) {
        match message {
            ControllerMessage::Intent(intent) => self.handle_intent(intent),
            ControllerMessage::Player(event) => self.on_player_event(event),
            ControllerMessage::BindPlayer(player) => self.bind_player(player),
            ControllerMessage::PageFetched { page, songs } => self.on_page_fetched(page, songs),
            ControllerMessage::PollTick => self.update_current_time(),
            ControllerMessage::Shutdown => self.shutdown(),
        }
    }

    pub fn handle_intent(&mut self, intent: Intent) {
        match intent {
            Intent::TogglePlaying => self.toggle_playing(),
            Intent::SetPlaying(playing) => self.set_playing(playing),
            Intent::SeekToIndex(index) => self.request_seek_to_index(index),
            Intent::SliderDrag(time_ms) => self.on_slider_drag(time_ms),
            Intent::SeekCommit => self.on_seek_commit(),
            Intent::SeekToStart => self.seek_to_start(),
            Intent::Like(liked) => self.set_liked(liked),
            Intent::Dislike(disliked) => self.set_disliked(disliked),
            Intent::Share => self.share(),
        }
    }

    /// Cancels the position poll and any in-flight page fetch.
    pub fn shutdown(&mut self) {
        self.tasks.abort_all();
        self.prefetch.reset();
    }

    pub fn bind_player(&mut self, mut player: Box<dyn MediaPlayer>) {
        info!(queued = self.queued_items.len(), "media_player_bound");

        if !self.queued_items.is_empty() {
            player.add_items(std::mem::take(&mut self.queued_items));
            player.prepare();
        }
        player.set_play_when_ready(self.state.load().is_playing);
        self.player = Some(player);
        self.tracker.bind();

        if let Some(index) = self.deferred_seek.take() {
            self.seek_player_to(index);
        } else if self.queue_len() == 0 {
            self.request_seek_to_index(0);
        }
    }

    /// Seeks to `target`, loading the next page first when `target` is
    /// within the look-ahead threshold of the end of the queue.
    pub fn request_seek_to_index(&mut self, target: usize) {
        let queue_len = self.queue_len();
        if within_look_ahead(target, queue_len, self.config.look_ahead) {
            debug!(target, queue_len, "seek target near end of queue");
            self.prefetch.defer_seek(target);
            self.load_next_page();
        } else {
            self.prefetch.cancel_pending_seek();
            self.seek_player_to(target);
        }
    }

    pub fn on_page_fetched(&mut self, page: u32, songs: Vec<Song>) {
        if !self.prefetch.complete(page) {
            debug!(page, "ignoring stale page");
            return;
        }

        if songs.is_empty() {
            info!(page, "feed_page_empty");
            if let Some(target) = self.prefetch.take_pending_seek()
                && target < self.queue_len()
            {
                self.seek_player_to(target);
            }
            return;
        }

        let returned = songs.len();
        self.pagination.advance(returned);
        let (items, metadata) = songs_to_media(songs);
        info!(
            page,
            returned,
            playable = items.len(),
            total = self.pagination.total_songs(),
            "feed_page_loaded"
        );

        self.enqueue(items);
        self.publish(|s| {
            s.is_playing = true;
            s.songs.append(Vector::from(metadata));
        });

        if let Some(horizon) = self.prefetch.horizon()
            && within_look_ahead(horizon, self.queue_len(), self.config.look_ahead)
        {
            self.load_next_page();
            return;
        }
        if let Some(target) = self.prefetch.take_pending_seek() {
            self.request_seek_to_index(target);
        }
    }

    pub fn set_playing(&mut self, playing: bool) {
        if let Some(player) = self.player.as_mut() {
            player.set_play_when_ready(playing);
        }
        self.publish(|s| s.is_playing = playing);
    }

    pub fn toggle_playing(&mut self) {
        let playing = self.state.load().is_playing;
        self.set_playing(!playing);
    }

    pub fn on_slider_drag(&mut self, time_ms: f32) {
        if !self.tracker.begin_drag() {
            debug!("slider drag ignored, no player bound");
            return;
        }
        self.publish(|s| s.current_time_ms = time_ms.max(0.0));
    }

    pub fn on_seek_commit(&mut self) {
        if !self.tracker.commit() {
            return;
        }
        let time_ms = self.state.load().current_time_ms;
        if let Some(player) = self.player.as_mut() {
            player.seek_to_position(Duration::from_millis(time_ms as u64));
        }
    }

    pub fn seek_to_start(&mut self) {
        let Some(player) = self.player.as_mut() else {
            return;
        };
        player.seek_to_position(Duration::ZERO);
        if !self.tracker.is_locked() {
            self.publish(|s| s.current_time_ms = 0.0);
        }
    }

    pub fn set_liked(&mut self, liked: bool) {
        self.update_current_song(|song| {
            song.is_liked = liked;
            song.is_disliked = false;
        });
    }

    pub fn set_disliked(&mut self, disliked: bool) {
        self.update_current_song(|song| {
            song.is_liked = false;
            song.is_disliked = disliked;
        });
    }

    pub fn share_url(&self) -> Option<String> {
        let index = self
            .player
            .as_ref()
            .and_then(|p| p.current_index())
            .unwrap_or(self.state.load().current_index);
        self.state
            .load()
            .songs
            .get(index)
            .and_then(|song| song.share_url.clone())
    }

    fn share(&self) {
        match self.share_url() {
            Some(url) => {
                let _ = self.event_tx.send(Event::Share(url));
            }
            None => debug!("nothing to share"),
        }
    }

    pub fn on_player_event(&mut self, event: PlayerEvent) {
        match event {
            PlayerEvent::StateChanged(state) => {
                debug!(?state, "player_state_changed");
                self.update_current_time();
            }
            PlayerEvent::IndexChanged(index) => {
                debug!(index, "player_index_changed");
                let locked = self.tracker.is_locked();
                self.publish(|s| {
                    if s.current_index != index && !locked {
                        s.current_time_ms = 0.0;
                    }
                    s.current_index = index;
                });
                if within_look_ahead(index, self.queue_len(), self.config.look_ahead) {
                    self.prefetch.extend_horizon(index);
                    self.load_next_page();
                }
            }
        }
    }

    fn update_current_time(&mut self) {
        let Some(player) = self.player.as_ref() else {
            return;
        };
        let position_ms = player.position().as_millis() as f32;
        let state = player.playback_state();

        if !self.tracker.is_locked() {
            self.publish(|s| s.current_time_ms = position_ms);
        }

        if state.is_terminal() {
            self.tasks.abort(POLL_TASK);
        } else {
            self.schedule_poll();
        }
    }

    fn schedule_poll(&mut self) {
        let tx = self.mailbox_tx.clone();
        let interval = self.config.poll_interval;
        self.tasks.spawn(POLL_TASK, async move {
            tokio::time::sleep(interval).await;
            let _ = tx.send(ControllerMessage::PollTick);
        });
    }

    fn load_next_page(&mut self) {
        let page = self.pagination.next_page();
        if !self.prefetch.begin(page) {
            debug!(page, "page fetch already in flight");
            return;
        }

        let page_size = self.config.page_size;
        info!(page, page_size, "feed_page_requested");

        let provider = self.provider.clone();
        let tx = self.mailbox_tx.clone();
        self.tasks.spawn(FETCH_TASK, async move {
            let songs = match provider.fetch_songs(page, page_size).await {
                Ok(songs) => songs,
                Err(e) => {
                    warn!(page, error = %e, "feed_page_failed");
                    Vec::new()
                }
            };
            let _ = tx.send(ControllerMessage::PageFetched { page, songs });
        });
    }

    fn enqueue(&mut self, items: Vec<MediaItem>) {
        match self.player.as_mut() {
            Some(player) => {
                player.add_items(items);
                player.prepare();
                player.set_play_when_ready(true);
            }
            None => self.queued_items.extend(items),
        }
    }

    fn seek_player_to(&mut self, index: usize) {
        match self.player.as_mut() {
            Some(player) => player.seek_to_index(index),
            None => self.deferred_seek = Some(index),
        }
        debug!(index, "seek_to_index");

        let locked = self.tracker.is_locked();
        self.publish(|s| {
            if s.current_index != index && !locked {
                s.current_time_ms = 0.0;
            }
            s.current_index = index;
        });
        if !self.state.load().is_playing {
            self.set_playing(true);
        }
    }

    fn update_current_song<F>(&mut self, update: F)
    where
        F: FnOnce(&mut SongMetadata),
    {
        let Some(index) = self.player.as_ref().and_then(|p| p.current_index()) else {
            debug!("no current item to update");
            return;
        };
        let state = self.state.load_full();
        let Some(song) = state.songs.get(index) else {
            debug!(index, songs = state.songs.len(), "current item out of bounds");
            return;
        };

        let mut song = song.clone();
        update(&mut song);
        self.publish(|s| {
            s.songs.set(index, song);
        });
    }

    fn queue_len(&self) -> usize {
        match self.player.as_ref() {
            Some(player) => player.item_count(),
            None => self.queued_items.len(),
        }
    }

    /// Replaces the snapshot with a modified copy and notifies the
    /// presentation layer. Unchanged snapshots are not republished.
    fn publish<F>(&self, update: F)
    where
        F: FnOnce(&mut UiState),
    {
        let current = self.state.load_full();
        let mut next = UiState::clone(&current);
        update(&mut next);
        if next == *current {
            return;
        }

        let next = Arc::new(next);
        self.state.store(next.clone());
        let _ = self.event_tx.send(Event::StateUpdated(next));
    }
}
