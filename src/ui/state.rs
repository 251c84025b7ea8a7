use im::Vector;

/// Snapshot published to the presentation layer after every mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct UiState {
    pub is_playing: bool,
    pub current_time_ms: f32,
    pub current_index: usize,
    pub songs: Vector<SongMetadata>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            is_playing: true,
            current_time_ms: 0.0,
            current_index: 0,
            songs: Vector::new(),
        }
    }
}

impl UiState {
    pub fn current_song(&self) -> Option<&SongMetadata> {
        self.songs.get(self.current_index)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SongMetadata {
    pub id: Option<String>,
    pub title: Option<String>,
    pub author_name: Option<String>,
    pub avatar_image_uri: Option<String>,
    pub image_uri: Option<String>,
    pub duration_ms: Option<f32>,
    pub tags: Option<String>,
    pub is_liked: bool,
    pub is_disliked: bool,
    pub upvote_count: Option<u32>,
    pub share_url: Option<String>,
}
