/// Top level error of a single summarization request.
///
/// None of these are fatal to the process: the caller reports the message
/// and is free to try another URL.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Failed to fetch content: {0}")]
    Fetch(#[from] FetchError),
    #[error("Failed to summarize content: {0:#}")]
    Summarization(anyhow::Error),
}

/// Input problems caught before any network call.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please provide an API key")]
    MissingCredential,
    #[error("Please provide a URL")]
    MissingUrl,
    #[error("Please provide a valid URL: {0}")]
    MalformedUrl(String),
    #[error("Unsupported URL scheme '{0}', expected http or https")]
    UnsupportedScheme(String),
    #[error("Invalid setting: {0}")]
    InvalidSetting(String),
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("{url} responded with status {status}")]
    Status { status: u16, url: String },
    #[error("Video {video_id} is unavailable: {reason}")]
    VideoUnavailable { video_id: String, reason: String },
    #[error("No transcript available for video {video_id} in languages [{languages}]")]
    TranscriptUnavailable { video_id: String, languages: String },
    #[error("Parse error: {0}")]
    ParseError(&'static str),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Failed to extract text: {0}")]
    Extraction(String),
    #[error("No text content found at {0}")]
    EmptyContent(String),
}

impl From<digest_core::ChunkError> for ValidationError {
    fn from(e: digest_core::ChunkError) -> Self {
        ValidationError::InvalidSetting(e.to_string())
    }
}
