//! # Watch page parser
//!
//! Pulls the `ytInitialPlayerResponse` object out of a YouTube watch page and
//! turns caption tracks into plain transcript text.

use std::{ops::Deref, sync::LazyLock};

use itertools::Itertools;
use regex::Regex;
use serde::de::DeserializeOwned;

use crate::{
    error::FetchError,
    types::{CaptionTrack, PlayerResponse, TimedText},
};

static YT_PLAYER_RESPONSE_RE: LazyLock<Regex> = LazyLock::new(|| {
    regex::Regex::new(
        r"(?s)var\s+ytInitialPlayerResponse\s*=\s*(\{.*?\});\s*(?:var\s+meta\b|</script>)",
    )
    .unwrap()
});

pub struct WatchPageDocument(String);

impl Deref for WatchPageDocument {
    type Target = String;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl WatchPageDocument {
    pub fn new(doc: String) -> Self {
        WatchPageDocument(doc)
    }

    pub fn to_json<T>(&self) -> Result<T, FetchError>
    where
        T: DeserializeOwned,
    {
        let player_response = YT_PLAYER_RESPONSE_RE
            .captures(self)
            .and_then(|cap| cap.get(1))
            .ok_or(FetchError::ParseError(
                "Failed to extract ytInitialPlayerResponse from the page's script tag",
            ))?;
        Ok(serde_json::from_str(player_response.as_str())?)
    }

    pub fn player_response(&self) -> Result<PlayerResponse, FetchError> {
        self.to_json::<PlayerResponse>()
    }
}

impl From<String> for WatchPageDocument {
    fn from(value: String) -> Self {
        WatchPageDocument(value)
    }
}

impl PlayerResponse {
    /// Fails unless YouTube reports the video as playable.
    pub fn ensure_playable(&self, video_id: &str) -> Result<(), FetchError> {
        match &self.playability_status {
            Some(status) if status.status != "OK" => Err(FetchError::VideoUnavailable {
                video_id: video_id.to_string(),
                reason: status
                    .reason
                    .clone()
                    .unwrap_or_else(|| status.status.clone()),
            }),
            _ => Ok(()),
        }
    }

    pub fn caption_tracks(&self) -> &[CaptionTrack] {
        self.captions
            .as_ref()
            .and_then(|c| c.tracklist.as_ref())
            .map(|t| t.caption_tracks.as_slice())
            .unwrap_or_default()
    }

    /// Picks the first language in `languages` that has a track, preferring a
    /// manually created track over an auto-generated one.
    pub fn select_track(&self, languages: &[String]) -> Option<&CaptionTrack> {
        let tracks = self.caption_tracks();
        languages.iter().find_map(|lang| {
            let mut candidates = tracks.iter().filter(|t| &t.language_code == lang);
            candidates
                .clone()
                .find(|t| !t.is_generated())
                .or_else(|| candidates.next())
        })
    }
}

impl TimedText {
    /// Joins every caption line with a single space.
    pub fn text(&self) -> String {
        self.events
            .iter()
            .map(|event| {
                event
                    .segs
                    .iter()
                    .map(|seg| seg.utf8.as_str())
                    .collect::<String>()
                    .replace('\n', " ")
            })
            .map(|line| line.trim().to_string())
            .filter(|line| !line.is_empty())
            .join(" ")
    }
}
