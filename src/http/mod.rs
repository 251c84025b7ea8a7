pub mod model;

use async_trait::async_trait;
use reqwest::Client;
use tracing::info;

use crate::audio::{config::FeedConfig, error::AudioError, traits::SongProvider};

use self::model::{Song, SongsPage};

pub struct ApiService {
    client: Client,
    songs_url: String,
}

impl ApiService {
    pub fn new(config: &FeedConfig) -> Result<Self, AudioError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .gzip(true)
            .build()?;

        Ok(Self::with_client(client, &config.api_url))
    }

    pub fn with_client(client: Client, api_url: &str) -> Self {
        Self {
            client,
            songs_url: format!("{}/songs", api_url.trim_end_matches('/')),
        }
    }

    pub fn songs_url(&self) -> &str {
        &self.songs_url
    }

    pub async fn fetch_page(&self, page: u32, page_size: u32) -> Result<SongsPage, AudioError> {
        let response = self
            .client
            .get(format!("{}?page={page}&page_size={page_size}", self.songs_url))
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json::<SongsPage>().await?)
    }
}

#[async_trait]
impl SongProvider for ApiService {
    async fn fetch_songs(&self, page: u32, page_size: u32) -> Result<Vec<Song>, AudioError> {
        let body = self.fetch_page(page, page_size).await?;
        let songs = body.into_songs();
        info!(page, page_size, returned = songs.len(), "api_songs_fetched");
        Ok(songs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn songs_url_tolerates_trailing_slash() {
        let with_slash = ApiService::with_client(Client::new(), "https://api.example/api/");
        let without = ApiService::with_client(Client::new(), "https://api.example/api");

        assert_eq!(with_slash.songs_url(), "https://api.example/api/songs");
        assert_eq!(without.songs_url(), with_slash.songs_url());
    }
}
