#[derive(Debug, Clone, PartialEq)]
pub enum AppMessage {
    Quit,
    TogglePlayPause,
    NextTrack,
    PreviousTrack,
    ToggleLike,
    ToggleDislike,
    Share,
    Replay,
    /// Seconds into the current song.
    SeekTo(f32),
    Help,
}
