use crate::ui::message::AppMessage;

pub struct InputHandler;

impl InputHandler {
    pub fn handle_line(line: &str) -> Option<AppMessage> {
        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            return Some(AppMessage::TogglePlayPause);
        };

        match command {
            "p" | "play" | "pause" => Some(AppMessage::TogglePlayPause),
            "n" | "next" => Some(AppMessage::NextTrack),
            "b" | "prev" => Some(AppMessage::PreviousTrack),
            "l" | "like" => Some(AppMessage::ToggleLike),
            "d" | "dislike" => Some(AppMessage::ToggleDislike),
            "s" | "share" => Some(AppMessage::Share),
            "r" | "replay" => Some(AppMessage::Replay),
            "q" | "quit" => Some(AppMessage::Quit),
            "h" | "help" | "?" => Some(AppMessage::Help),
            "seek" => words
                .next()
                .and_then(|secs| secs.parse::<f32>().ok())
                .filter(|secs| secs.is_finite() && *secs >= 0.0)
                .map(AppMessage::SeekTo),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_line_toggles_playback() {
        assert_eq!(InputHandler::handle_line(""), Some(AppMessage::TogglePlayPause));
        assert_eq!(InputHandler::handle_line("   "), Some(AppMessage::TogglePlayPause));
    }

    #[test]
    fn parses_commands() {
        assert_eq!(InputHandler::handle_line("n"), Some(AppMessage::NextTrack));
        assert_eq!(InputHandler::handle_line(" like "), Some(AppMessage::ToggleLike));
        assert_eq!(InputHandler::handle_line("seek 42.5"), Some(AppMessage::SeekTo(42.5)));
        assert_eq!(InputHandler::handle_line("q"), Some(AppMessage::Quit));
    }

    #[test]
    fn rejects_bad_seek_and_unknown_commands() {
        assert_eq!(InputHandler::handle_line("seek"), None);
        assert_eq!(InputHandler::handle_line("seek -3"), None);
        assert_eq!(InputHandler::handle_line("seek soon"), None);
        assert_eq!(InputHandler::handle_line("volume 3"), None);
    }
}
