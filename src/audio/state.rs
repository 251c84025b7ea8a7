use std::time::Duration;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PlayerState {
    #[default]
    Idle,
    Buffering,
    Ready,
    Ended,
}

impl PlayerState {
    /// Idle and ended players report no moving position.
    pub fn is_terminal(self) -> bool {
        matches!(self, PlayerState::Idle | PlayerState::Ended)
    }
}

/// One entry of the player queue.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MediaItem {
    pub id: Option<String>,
    pub uri: String,
    pub title: Option<String>,
    pub artist: Option<String>,
    pub artwork_uri: Option<String>,
    pub description: Option<String>,
    pub duration: Option<Duration>,
}
