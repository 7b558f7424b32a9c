use digest_core::{
    RecursiveSplitter, StrategyThresholds, TextSplitter, TokenBudget, WindowSplitter,
    DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE,
};

use crate::{
    error::ValidationError,
    llm::{groq::GroqClient, summarizer::DEFAULT_REDUCE_TOKEN_MAX},
};

/// How documents are cut into chunks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum SplitterKind {
    /// Fixed character windows
    #[default]
    Window,
    /// Paragraph, line, then word boundaries
    Recursive,
}

/// Every setting of one digest run, handed to the processor builder as a
/// single value.
#[derive(Debug, Clone)]
pub struct DigestConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub temperature: f32,
    pub budget: TokenBudget,
    pub thresholds: StrategyThresholds,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub splitter: SplitterKind,
    pub languages: Vec<String>,
    pub reduce_token_max: usize,
    pub accept_invalid_certs: bool,
}

impl Default for DigestConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: GroqClient::DEFAULT_MODEL.into(),
            base_url: GroqClient::DEFAULT_BASE_URL.into(),
            temperature: GroqClient::DEFAULT_TEMPERATURE,
            budget: TokenBudget::default(),
            thresholds: StrategyThresholds::default(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
            splitter: SplitterKind::default(),
            languages: vec!["en".into(), "hi".into()],
            reduce_token_max: DEFAULT_REDUCE_TOKEN_MAX,
            accept_invalid_certs: false,
        }
    }
}

impl DigestConfig {
    /// The API key, rejecting a missing or blank one.
    pub fn api_key(&self) -> Result<&str, ValidationError> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or(ValidationError::MissingCredential)
    }

    pub fn splitter(&self) -> Result<Box<dyn TextSplitter>, ValidationError> {
        let splitter: Box<dyn TextSplitter> = match self.splitter {
            SplitterKind::Window => Box::new(WindowSplitter::new(self.chunk_size, self.chunk_overlap)?),
            SplitterKind::Recursive => {
                Box::new(RecursiveSplitter::new(self.chunk_size, self.chunk_overlap)?)
            }
        };
        Ok(splitter)
    }

    /// Groq client configured from these settings.
    pub fn groq_client(&self) -> Result<GroqClient, ValidationError> {
        Ok(GroqClient::new(self.api_key()?)
            .with_base_url(&self.base_url)
            .with_model(&self.model)
            .with_temperature(self.temperature))
    }
}
