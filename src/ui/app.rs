use std::sync::Arc;

use flume::Receiver;
use rodio::OutputStream;
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    task::JoinHandle,
};
use tracing::info;

use crate::{
    audio::{
        config::FeedConfig,
        player::RodioPlayer,
        system::{ControllerHandle, spawn_controller},
        util::open_output_stream,
    },
    event::events::Event,
    http::ApiService,
};

use super::{input::InputHandler, message::AppMessage, state::UiState};

const HELP: &str = "commands: <enter>/p play-pause | n next | b previous | l like | d dislike \
                    | s share | r replay | seek <secs> | q quit";

pub struct App {
    pub event_rx: Receiver<Event>,
    pub controller: ControllerHandle,
    controller_task: JoinHandle<()>,
    _stream: OutputStream,
    last_status: Option<String>,
    pub should_quit: bool,
}

impl App {
    pub fn new(config: FeedConfig) -> color_eyre::Result<Self> {
        let (event_tx, event_rx) = flume::unbounded();
        let api = Arc::new(ApiService::new(&config)?);
        let (controller, controller_task) = spawn_controller(config, api, event_tx);

        let stream = open_output_stream()?;
        let player = RodioPlayer::new(&stream, controller.player_events());
        controller.bind_player(Box::new(player));

        Ok(Self {
            event_rx,
            controller,
            controller_task,
            _stream: stream,
            last_status: None,
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> color_eyre::Result<()> {
        println!("{HELP}");
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        while !self.should_quit {
            tokio::select! {
                line = lines.next_line() => match line? {
                    Some(line) => match InputHandler::handle_line(&line) {
                        Some(message) => self.handle_message(message),
                        None => println!("unknown command, try `help`"),
                    },
                    None => self.should_quit = true,
                },
                event = self.event_rx.recv_async() => match event {
                    Ok(event) => self.handle_event(event),
                    Err(_) => self.should_quit = true,
                },
            }
        }

        info!("shutting down");
        self.controller.shutdown();
        let _ = (&mut self.controller_task).await;
        Ok(())
    }

    fn handle_message(&mut self, message: AppMessage) {
        let state = self.controller.snapshot();
        let current = state.current_song();

        match message {
            AppMessage::Quit => self.should_quit = true,
            AppMessage::TogglePlayPause => self.controller.toggle_playing(),
            AppMessage::NextTrack => self.controller.seek_to_index(state.current_index + 1),
            AppMessage::PreviousTrack => self
                .controller
                .seek_to_index(state.current_index.saturating_sub(1)),
            AppMessage::ToggleLike => self
                .controller
                .set_liked(!current.is_some_and(|song| song.is_liked)),
            AppMessage::ToggleDislike => self
                .controller
                .set_disliked(!current.is_some_and(|song| song.is_disliked)),
            AppMessage::Share => self.controller.share(),
            AppMessage::Replay => self.controller.seek_to_start(),
            AppMessage::SeekTo(secs) => {
                self.controller.drag_slider(secs * 1000.0);
                self.controller.commit_seek();
            }
            AppMessage::Help => println!("{HELP}"),
        }
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::StateUpdated(state) => {
                let line = status_line(&state);
                if self.last_status.as_deref() != Some(line.as_str()) {
                    println!("{line}");
                    self.last_status = Some(line);
                }
            }
            Event::Share(url) => println!("share: {url}"),
        }
    }
}

pub fn status_line(state: &UiState) -> String {
    let marker = if state.is_playing { ">" } else { "||" };
    let Some(song) = state.current_song() else {
        return format!("{marker} loading feed...");
    };

    let reaction = if song.is_liked {
        " [liked]"
    } else if song.is_disliked {
        " [disliked]"
    } else {
        ""
    };

    format!(
        "{marker} {}/{} {} - {} [{} / {}]{reaction}",
        state.current_index + 1,
        state.songs.len(),
        song.title.as_deref().unwrap_or("Untitled"),
        song.author_name.as_deref().unwrap_or("unknown"),
        format_time(state.current_time_ms),
        song.duration_ms
            .map(format_time)
            .unwrap_or_else(|| "--:--".to_string()),
    )
}

fn format_time(ms: f32) -> String {
    let secs = (ms.max(0.0) / 1000.0) as u64;
    format!("{}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::state::SongMetadata;
    use im::vector;

    #[test]
    fn status_line_before_first_page() {
        assert_eq!(status_line(&UiState::default()), "> loading feed...");
    }

    #[test]
    fn status_line_for_current_song() {
        let state = UiState {
            is_playing: false,
            current_time_ms: 65_400.0,
            current_index: 1,
            songs: vector![
                SongMetadata::default(),
                SongMetadata {
                    title: Some("Night Drive".to_string()),
                    author_name: Some("neon".to_string()),
                    duration_ms: Some(187_000.0),
                    is_liked: true,
                    ..Default::default()
                },
            ],
        };

        assert_eq!(
            status_line(&state),
            "|| 2/2 Night Drive - neon [1:05 / 3:07] [liked]"
        );
    }
}
