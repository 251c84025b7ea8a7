use std::{
    io::Cursor,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use rodio::{Decoder, OutputStream};
use tracing::{debug, info, warn};

use crate::{
    audio::{
        error::AudioError,
        playback::PlaybackEngine,
        state::{MediaItem, PlayerState},
        traits::MediaPlayer,
    },
    event::events::{PlayerEvent, PlayerEventSink},
    util::task::TaskManager,
};

const MONITOR_INTERVAL: Duration = Duration::from_millis(250);
const MONITOR_TASK: &str = "monitor";
const LOAD_TASK: &str = "load";

#[derive(Default)]
struct Shared {
    items: Vec<MediaItem>,
    index: Option<usize>,
    state: PlayerState,
    play_when_ready: bool,
    generation: u64,
}

impl Shared {
    /// Item to start after new items were queued: the head of a fresh queue,
    /// or the item after the last one once the queue had run dry.
    fn prepare_target(&self) -> Option<usize> {
        match self.index {
            None if !self.items.is_empty() => Some(0),
            Some(i) if self.state == PlayerState::Ended && i + 1 < self.items.len() => Some(i + 1),
            _ => None,
        }
    }

    /// Item following `from`, or `None` at the tail of the queue.
    fn advance_target(&self, from: usize) -> Option<usize> {
        (from + 1 < self.items.len()).then_some(from + 1)
    }

    /// `index` unless it is past the end or already playing.
    fn seek_target(&self, index: usize) -> Option<usize> {
        if index >= self.items.len() {
            return None;
        }
        if self.index == Some(index) && self.state != PlayerState::Ended {
            return None;
        }
        Some(index)
    }

    /// Position seeks only apply to a loaded source. The sink keeps a seek
    /// issued while empty and applies it to whatever gets appended next.
    fn can_seek_position(&self) -> bool {
        self.state == PlayerState::Ready
    }
}

/// Decodes a fully downloaded item into a seekable source.
fn decode(data: Vec<u8>) -> Result<Decoder<Cursor<Vec<u8>>>, AudioError> {
    let len = data.len() as u64;
    let decoder = Decoder::builder()
        .with_data(Cursor::new(data))
        .with_byte_len(len)
        .with_seekable(true)
        .with_gapless(true)
        .build()?;
    Ok(decoder)
}

#[derive(Clone)]
struct PlayerCore {
    engine: Arc<PlaybackEngine>,
    http: reqwest::Client,
    shared: Arc<Mutex<Shared>>,
    tasks: Arc<Mutex<TaskManager>>,
    events: PlayerEventSink,
}

impl PlayerCore {
    fn shared(&self) -> MutexGuard<'_, Shared> {
        self.shared.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn tasks(&self) -> MutexGuard<'_, TaskManager> {
        self.tasks.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_current(&self, generation: u64) -> bool {
        self.shared().generation == generation
    }

    fn set_state(&self, state: PlayerState) {
        {
            let mut shared = self.shared();
            if shared.state == state {
                return;
            }
            shared.state = state;
        }
        self.events.send(PlayerEvent::StateChanged(state));
    }

    /// Drops whatever is playing and starts loading `index`. Loads that
    /// finish after a newer `start` are discarded.
    fn start(&self, index: usize) {
        let generation = {
            let mut shared = self.shared();
            shared.generation += 1;
            shared.index = Some(index);
            shared.generation
        };
        self.engine.stop();
        self.events.send(PlayerEvent::IndexChanged(index));
        self.set_state(PlayerState::Buffering);

        let core = self.clone();
        self.tasks().spawn(LOAD_TASK, async move {
            if let Err(e) = core.load(index, generation).await {
                warn!(index, error = %e, "player_load_failed");
                if core.is_current(generation) {
                    core.advance(index);
                }
            }
        });
    }

    fn advance(&self, from: usize) {
        let target = self.shared().advance_target(from);
        if let Some(next) = target {
            self.start(next);
        } else {
            debug!(from, "player_queue_ended");
            self.set_state(PlayerState::Ended);
        }
    }

    async fn load(&self, index: usize, generation: u64) -> Result<(), AudioError> {
        let uri = self
            .shared()
            .items
            .get(index)
            .map(|item| item.uri.clone())
            .ok_or(AudioError::ItemNotFound(index))?;

        let bytes = self
            .http
            .get(&uri)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        info!(index, bytes = bytes.len(), "player_item_downloaded");

        let core = self.clone();
        tokio::task::spawn_blocking(move || core.append(bytes.to_vec(), generation))
            .await
            .map_err(|e| AudioError::Unknown(e.to_string()))?
    }

    fn append(&self, data: Vec<u8>, generation: u64) -> Result<(), AudioError> {
        let decoder = decode(data)?;

        let play_when_ready = {
            let shared = self.shared();
            if shared.generation != generation {
                return Ok(());
            }
            shared.play_when_ready
        };

        self.engine.play_source(decoder);
        if play_when_ready {
            self.engine.play();
        } else {
            self.engine.pause();
        }
        self.set_state(PlayerState::Ready);
        Ok(())
    }
}

async fn monitor(core: PlayerCore) {
    loop {
        tokio::time::sleep(MONITOR_INTERVAL).await;

        let finished = {
            let shared = core.shared();
            if shared.state == PlayerState::Ready && core.engine.is_empty() {
                shared.index
            } else {
                None
            }
        };

        if let Some(index) = finished {
            core.advance(index);
        }
    }
}

/// [`MediaPlayer`] that downloads each queue item over HTTP and plays it on
/// a rodio sink, advancing through the queue on its own.
pub struct RodioPlayer {
    core: PlayerCore,
}

impl RodioPlayer {
    pub fn new(stream: &OutputStream, events: PlayerEventSink) -> Self {
        Self::with_engine(PlaybackEngine::new(stream), reqwest::Client::new(), events)
    }

    pub fn with_engine(engine: PlaybackEngine, http: reqwest::Client, events: PlayerEventSink) -> Self {
        let core = PlayerCore {
            engine: Arc::new(engine),
            http,
            shared: Arc::new(Mutex::new(Shared::default())),
            tasks: Arc::new(Mutex::new(TaskManager::new())),
            events,
        };
        core.tasks().spawn(MONITOR_TASK, monitor(core.clone()));

        Self { core }
    }
}

impl Drop for RodioPlayer {
    fn drop(&mut self) {
        // Tasks hold clones of the core, so the manager is never dropped on
        // its own. A decode already running on the blocking pool sees the
        // bumped generation and discards its source.
        self.core.shared().generation += 1;
        self.core.tasks().abort_all();
        self.core.engine.stop();
    }
}

impl MediaPlayer for RodioPlayer {
    fn add_items(&mut self, items: Vec<MediaItem>) {
        self.core.shared().items.extend(items);
    }

    fn prepare(&mut self) {
        let target = self.core.shared().prepare_target();
        if let Some(index) = target {
            self.core.start(index);
        }
    }

    fn set_play_when_ready(&mut self, play: bool) {
        self.core.shared().play_when_ready = play;
        if play {
            self.core.engine.play();
        } else {
            self.core.engine.pause();
        }
    }

    fn seek_to_index(&mut self, index: usize) {
        let (target, len) = {
            let shared = self.core.shared();
            (shared.seek_target(index), shared.items.len())
        };

        match target {
            Some(index) => self.core.start(index),
            None if index >= len => warn!(index, len, "seek past end of player queue"),
            None => {}
        }
    }

    fn seek_to_position(&mut self, position: Duration) {
        if !self.core.shared().can_seek_position() {
            debug!(?position, "position seek skipped, nothing loaded");
            return;
        }
        if let Err(e) = self.core.engine.try_seek(position) {
            warn!(?position, error = %e, "player_seek_failed");
        }
    }

    fn current_index(&self) -> Option<usize> {
        self.core.shared().index
    }

    fn position(&self) -> Duration {
        self.core.engine.get_pos()
    }

    fn item_count(&self) -> usize {
        self.core.shared().items.len()
    }

    fn playback_state(&self) -> PlayerState {
        self.core.shared().state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rodio::Source;

    fn queue(len: usize, index: Option<usize>, state: PlayerState) -> Shared {
        Shared {
            items: vec![MediaItem::default(); len],
            index,
            state,
            ..Shared::default()
        }
    }

    /// 16-bit mono PCM wav with a short ramp.
    fn wav_clip(sample_rate: u32, samples: usize) -> Vec<u8> {
        let data_len = (samples * 2) as u32;
        let mut out = Vec::with_capacity(44 + samples * 2);
        out.extend_from_slice(b"RIFF");
        out.extend_from_slice(&(36 + data_len).to_le_bytes());
        out.extend_from_slice(b"WAVEfmt ");
        out.extend_from_slice(&16u32.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&sample_rate.to_le_bytes());
        out.extend_from_slice(&(sample_rate * 2).to_le_bytes());
        out.extend_from_slice(&2u16.to_le_bytes());
        out.extend_from_slice(&16u16.to_le_bytes());
        out.extend_from_slice(b"data");
        out.extend_from_slice(&data_len.to_le_bytes());
        for n in 0..samples {
            out.extend_from_slice(&(((n % 200) as i16 - 100) * 100).to_le_bytes());
        }
        out
    }

    #[test]
    fn prepare_starts_fresh_queue_at_head() {
        assert_eq!(queue(3, None, PlayerState::Idle).prepare_target(), Some(0));
        assert_eq!(queue(0, None, PlayerState::Idle).prepare_target(), None);
    }

    #[test]
    fn prepare_resumes_after_queue_ran_dry() {
        assert_eq!(queue(6, Some(2), PlayerState::Ended).prepare_target(), Some(3));
        assert_eq!(queue(6, Some(2), PlayerState::Ready).prepare_target(), None);
    }

    #[test]
    fn tail_of_queue_has_nothing_to_advance_to() {
        let shared = queue(3, Some(2), PlayerState::Ended);
        assert_eq!(shared.prepare_target(), None);
        assert_eq!(shared.advance_target(2), None);
        assert_eq!(shared.advance_target(1), Some(2));
    }

    #[test]
    fn seek_past_end_or_to_playing_item_is_skipped() {
        let shared = queue(3, Some(1), PlayerState::Ready);
        assert_eq!(shared.seek_target(3), None);
        assert_eq!(shared.seek_target(1), None);
        assert_eq!(shared.seek_target(0), Some(0));

        assert_eq!(queue(3, Some(1), PlayerState::Ended).seek_target(1), Some(1));
    }

    #[test]
    fn position_seek_needs_a_loaded_source() {
        assert!(!queue(3, Some(1), PlayerState::Buffering).can_seek_position());
        assert!(!queue(3, Some(2), PlayerState::Ended).can_seek_position());
        assert!(queue(3, Some(1), PlayerState::Ready).can_seek_position());
    }

    #[test]
    fn decoded_item_seeks_back_to_start() {
        let mut decoder = decode(wav_clip(8000, 8000)).unwrap();
        assert_eq!(decoder.by_ref().take(4000).count(), 4000);

        assert!(decoder.try_seek(Duration::ZERO).is_ok());
        assert!(decoder.try_seek(Duration::from_millis(250)).is_ok());
    }
}
