//! Wire types for the `/songs` feed endpoint.
//!
//! Every field is optional on the wire; unknown fields are ignored.

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SongsPage {
    pub end: Option<u32>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub songs: Option<Vec<Option<Song>>>,
    pub start: Option<u32>,
    pub total_pages: Option<u32>,
    pub total_songs: Option<u32>,
}

impl SongsPage {
    /// Songs of the page with `null` entries dropped.
    pub fn into_songs(self) -> Vec<Song> {
        self.songs.unwrap_or_default().into_iter().flatten().collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Song {
    pub id: Option<String>,
    pub title: Option<String>,
    pub audio_url: Option<String>,
    pub video_url: Option<String>,
    pub image_url: Option<String>,
    pub image_large_url: Option<String>,
    pub avatar_image_url: Option<String>,
    pub handle: Option<String>,
    pub display_name: Option<String>,
    pub user_id: Option<String>,
    pub created_at: Option<String>,
    pub status: Option<String>,
    pub model_name: Option<String>,
    pub major_model_version: Option<String>,
    pub is_liked: Option<bool>,
    pub is_trashed: Option<bool>,
    pub is_public: Option<bool>,
    pub is_handle_updated: Option<bool>,
    pub is_video_pending: Option<bool>,
    pub upvote_count: Option<u32>,
    pub play_count: Option<u32>,
    pub metadata: Option<SongDetails>,
    pub reaction: Option<Reaction>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SongDetails {
    /// Seconds.
    pub duration: Option<f64>,
    pub prompt: Option<String>,
    pub tags: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub concat_history: Option<Vec<Option<ConcatHistory>>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Reaction {
    pub clip: Option<String>,
    pub flagged: Option<bool>,
    pub play_count: Option<u32>,
    pub reaction_type: Option<String>,
    pub skip_count: Option<u32>,
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ConcatHistory {
    pub continue_at: Option<f64>,
    pub id: Option<String>,
}
