use std::time::Duration;

use crate::{audio::state::MediaItem, http::model::Song, ui::state::SongMetadata};

const MILLIS_IN_SECOND: f64 = 1000.0;

/// Maps a feed song to its queue entry and display metadata.
///
/// Songs without an audio URL are unplayable and map to nothing, so the
/// player queue and the UI list stay index-aligned.
pub fn song_to_media(song: Song) -> Option<(MediaItem, SongMetadata)> {
    let uri = song.audio_url?;
    let duration_secs = song
        .metadata
        .as_ref()
        .and_then(|m| m.duration)
        .filter(|d| d.is_finite() && *d >= 0.0);
    let tags = song.metadata.and_then(|m| m.tags);
    let author = song.handle.or(song.display_name);

    let item = MediaItem {
        id: song.id.clone(),
        uri,
        title: song.title.clone(),
        artist: author.clone(),
        artwork_uri: song.image_url.clone(),
        description: tags.clone(),
        duration: duration_secs.map(Duration::from_secs_f64),
    };

    let metadata = SongMetadata {
        id: song.id,
        title: song.title,
        author_name: author,
        avatar_image_uri: song.avatar_image_url,
        image_uri: song.image_url,
        duration_ms: duration_secs.map(|s| (s * MILLIS_IN_SECOND) as f32),
        tags,
        is_liked: song.is_liked.unwrap_or(false),
        is_disliked: song.is_trashed.unwrap_or(false),
        upvote_count: song.upvote_count,
        share_url: song.video_url,
    };

    Some((item, metadata))
}

pub fn songs_to_media(songs: Vec<Song>) -> (Vec<MediaItem>, Vec<SongMetadata>) {
    songs.into_iter().filter_map(song_to_media).unzip()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::model::SongDetails;

    fn song(id: &str) -> Song {
        Song {
            id: Some(id.to_string()),
            title: Some(format!("title {id}")),
            audio_url: Some(format!("https://cdn.example/{id}.mp3")),
            video_url: Some(format!("https://cdn.example/{id}.mp4")),
            handle: Some("neon".to_string()),
            is_trashed: Some(true),
            metadata: Some(SongDetails {
                duration: Some(12.25),
                tags: Some("lofi".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn maps_song_fields() {
        let (item, meta) = song_to_media(song("a")).unwrap();

        assert_eq!(item.uri, "https://cdn.example/a.mp3");
        assert_eq!(item.duration, Some(Duration::from_millis(12_250)));
        assert_eq!(item.artist.as_deref(), Some("neon"));
        assert_eq!(meta.duration_ms, Some(12_250.0));
        assert_eq!(meta.share_url.as_deref(), Some("https://cdn.example/a.mp4"));
        assert!(!meta.is_liked);
        assert!(meta.is_disliked);
    }

    #[test]
    fn author_falls_back_to_display_name() {
        let mut s = song("a");
        s.handle = None;
        s.display_name = Some("Neon Nights".to_string());

        let (_, meta) = song_to_media(s).unwrap();
        assert_eq!(meta.author_name.as_deref(), Some("Neon Nights"));
    }

    #[test]
    fn unplayable_songs_are_skipped_in_both_lists() {
        let mut silent = song("b");
        silent.audio_url = None;

        let (items, metadata) = songs_to_media(vec![song("a"), silent, song("c")]);
        let ids: Vec<_> = metadata.iter().map(|m| m.id.clone().unwrap()).collect();

        assert_eq!(items.len(), 2);
        assert_eq!(ids, vec!["a", "c"]);
    }
}
