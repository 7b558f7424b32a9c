use std::sync::{Arc, Mutex};

use digest_core::Document;
use url_digest::{
    fetch::{ContentFetcher, Source},
    FetchError,
};

#[derive(Clone, Default)]
pub struct MockFetcher {
    pub documents: Vec<Document>,
    pub calls: Arc<Mutex<Vec<Source>>>,
    pub fail_with_status: Option<u16>,
}

impl MockFetcher {
    pub fn new(documents: Vec<Document>) -> Self {
        Self {
            documents,
            ..Default::default()
        }
    }

    pub fn with_text(text: impl Into<String>) -> Self {
        Self::new(vec![Document::new(text)])
    }

    pub fn failing(status: u16) -> Self {
        Self {
            fail_with_status: Some(status),
            ..Default::default()
        }
    }
}

impl ContentFetcher for MockFetcher {
    async fn fetch(&self, source: &Source) -> Result<Vec<Document>, FetchError> {
        self.calls.lock().unwrap().push(source.clone());
        if let Some(status) = self.fail_with_status {
            return Err(FetchError::Status {
                status,
                url: source.url().to_string(),
            });
        }
        Ok(self.documents.clone())
    }
}
