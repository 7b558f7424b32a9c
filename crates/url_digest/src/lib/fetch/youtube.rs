use digest_core::Document;
use reqwest::{Client, Url};

use crate::{error::FetchError, parser::WatchPageDocument, types::TimedText};

/// Fetches a video's captions as transcript text.
pub struct TranscriptFetcher {
    client: Client,
    base_url: String,
    languages: Vec<String>,
}

impl TranscriptFetcher {
    const BASE_URL: &str = "https://www.youtube.com";

    pub fn new(client: Client, languages: Vec<String>) -> Self {
        Self {
            client,
            base_url: Self::BASE_URL.into(),
            languages,
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Loads the watch page html of `video_id`
    #[tracing::instrument(skip(self))]
    async fn fetch_watch_page(&self, video_id: &str) -> Result<WatchPageDocument, FetchError> {
        let url = format!("{}/watch", self.base_url);
        let resp = self
            .client
            .get(&url)
            .query(&[("v", video_id)])
            .header("Accept-Language", "en-US,en;q=0.9")
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to make http request"))?;

        if !resp.status().is_success() {
            return Err(FetchError::Status {
                status: resp.status().as_u16(),
                url,
            });
        }

        Ok(resp.text().await?.into())
    }

    /// Caption urls are usually absolute, older pages used site-relative ones
    fn caption_url(&self, base_url: &str) -> Result<Url, FetchError> {
        let url = if base_url.starts_with('/') {
            format!("{}{base_url}", self.base_url)
        } else {
            base_url.to_string()
        };
        Url::parse(&url).map_err(|_| FetchError::ParseError("Invalid caption track url"))
    }

    #[tracing::instrument(skip(self))]
    pub async fn fetch_transcript(&self, video_id: &str) -> Result<Document, FetchError> {
        let page = self.fetch_watch_page(video_id).await?;
        let player = page
            .player_response()
            .inspect_err(|e| tracing::error!(error = %e, "Failed to parse watch page"))?;
        player.ensure_playable(video_id)?;

        if let Some(title) = player.video_details.as_ref().and_then(|d| d.title.as_deref()) {
            tracing::debug!(title, "Found video");
        }

        let track = player
            .select_track(&self.languages)
            .ok_or_else(|| FetchError::TranscriptUnavailable {
                video_id: video_id.to_string(),
                languages: self.languages.join(", "),
            })?;
        tracing::debug!(
            language = %track.language_code,
            generated = track.is_generated(),
            "Selected caption track"
        );

        let resp = self
            .client
            .get(self.caption_url(&track.base_url)?)
            .query(&[("fmt", "json3")])
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to fetch caption track"))?;

        if !resp.status().is_success() {
            return Err(FetchError::Status {
                status: resp.status().as_u16(),
                url: track.base_url.clone(),
            });
        }

        let timed_text = resp.json::<TimedText>().await?;
        let text = timed_text.text();
        if text.is_empty() {
            return Err(FetchError::TranscriptUnavailable {
                video_id: video_id.to_string(),
                languages: track.language_code.clone(),
            });
        }

        let source = format!("{}/watch?v={video_id}", self.base_url);
        Ok(Document::new(text).with_source(source))
    }
}
