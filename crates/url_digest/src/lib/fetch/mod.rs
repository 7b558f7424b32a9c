pub mod webpage;
pub mod youtube;

use std::{future::Future, sync::LazyLock};

use digest_core::Document;
use regex::Regex;
use reqwest::Url;

use crate::{
    error::{FetchError, ValidationError},
    fetch::{webpage::PageFetcher, youtube::TranscriptFetcher},
};

static VIDEO_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{11}$").unwrap());

const YOUTUBE_HOSTS: [&str; 4] = [
    "youtube.com",
    "www.youtube.com",
    "m.youtube.com",
    "music.youtube.com",
];

/// A validated URL and the kind of content behind it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Video { video_id: String, url: Url },
    Webpage(Url),
}

impl Source {
    /// Validates `input` as an http(s) URL and classifies it.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ValidationError::MissingUrl);
        }

        let url = Url::parse(input).map_err(|_| ValidationError::MalformedUrl(input.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ValidationError::UnsupportedScheme(url.scheme().to_string()));
        }
        if url.host_str().map_or(true, str::is_empty) {
            return Err(ValidationError::MalformedUrl(input.to_string()));
        }

        Ok(match youtube_video_id(&url) {
            Some(video_id) => Source::Video { video_id, url },
            None => Source::Webpage(url),
        })
    }

    pub fn url(&self) -> &Url {
        match self {
            Source::Video { url, .. } => url,
            Source::Webpage(url) => url,
        }
    }
}

/// Video id of a YouTube video URL; `None` for anything else, including
/// YouTube pages that are not a single video.
fn youtube_video_id(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    let mut segments = url.path_segments()?.filter(|s| !s.is_empty());

    let candidate = if host == "youtu.be" {
        segments.next().map(str::to_string)
    } else if YOUTUBE_HOSTS.contains(&host) {
        match segments.next()? {
            "watch" => url
                .query_pairs()
                .find(|(key, _)| key == "v")
                .map(|(_, value)| value.into_owned()),
            "shorts" | "live" | "embed" => segments.next().map(str::to_string),
            _ => None,
        }
    } else {
        None
    };

    candidate.filter(|id| VIDEO_ID_RE.is_match(id))
}

pub trait ContentFetcher {
    fn fetch(&self, source: &Source) -> impl Future<Output = Result<Vec<Document>, FetchError>>;
}

impl<T: ContentFetcher> ContentFetcher for &T {
    async fn fetch(&self, source: &Source) -> Result<Vec<Document>, FetchError> {
        (**self).fetch(source).await
    }
}

/// Fetches transcripts for video URLs and page text for everything else.
pub struct UrlFetcher {
    transcripts: TranscriptFetcher,
    pages: PageFetcher,
}

impl UrlFetcher {
    const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 13_5_1) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/116.0.0.0 Safari/537.36";

    pub fn new(languages: Vec<String>, accept_invalid_certs: bool) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(Self::USER_AGENT)
            .danger_accept_invalid_certs(accept_invalid_certs)
            .build()?;

        Ok(Self {
            transcripts: TranscriptFetcher::new(client.clone(), languages),
            pages: PageFetcher::new(client),
        })
    }

    pub fn with_youtube_base_url(mut self, url: impl Into<String>) -> Self {
        self.transcripts = self.transcripts.with_base_url(url);
        self
    }
}

impl ContentFetcher for UrlFetcher {
    async fn fetch(&self, source: &Source) -> Result<Vec<Document>, FetchError> {
        let document = match source {
            Source::Video { video_id, .. } => self.transcripts.fetch_transcript(video_id).await?,
            Source::Webpage(url) => self.pages.fetch_page(url).await?,
        };
        Ok(vec![document])
    }
}
