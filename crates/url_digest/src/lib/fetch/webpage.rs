use digest_core::Document;
use itertools::Itertools;
use reqwest::{header::CONTENT_TYPE, Client, Url};

use crate::error::FetchError;

/// Line width handed to the html renderer
const TEXT_WIDTH: usize = 200;

/// Fetches a page and extracts its readable text.
pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    #[tracing::instrument(skip(self), fields(url = %url))]
    pub async fn fetch_page(&self, url: &Url) -> Result<Document, FetchError> {
        let resp = self
            .client
            .get(url.clone())
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to make http request"))?;

        if !resp.status().is_success() {
            return Err(FetchError::Status {
                status: resp.status().as_u16(),
                url: url.to_string(),
            });
        }

        let is_plain_text = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.starts_with("text/plain"));
        let body = resp.text().await?;

        let text = if is_plain_text {
            body
        } else {
            html_to_text(&body)?
        };
        let text = collapse_blank_lines(&text);

        if text.is_empty() {
            return Err(FetchError::EmptyContent(url.to_string()));
        }
        tracing::debug!(chars = text.len(), "Extracted page text");

        Ok(Document::new(text).with_source(url.as_str()))
    }
}

/// Converts html into plain text.
pub fn html_to_text(html: &str) -> Result<String, FetchError> {
    html2text::from_read(html.as_bytes(), TEXT_WIDTH)
        .map_err(|e| FetchError::Extraction(e.to_string()))
}

/// Trims trailing whitespace and squeezes runs of blank lines into one.
fn collapse_blank_lines(text: &str) -> String {
    text.lines()
        .map(str::trim_end)
        .coalesce(|prev, next| {
            if prev.is_empty() && next.is_empty() {
                Ok(prev)
            } else {
                Err((prev, next))
            }
        })
        .join("\n")
        .trim()
        .to_string()
}
