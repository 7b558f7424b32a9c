pub mod config;
mod error;
pub mod fetch;
mod llm;
pub mod parser;
mod processor;
pub mod tracing;
pub mod types;

pub use error::{Error, FetchError, ValidationError};
pub use llm::groq;
pub use llm::{
    completion::Completion,
    prompt::{PromptError, PromptSet, PromptTemplate, SummaryPlan},
    summarizer::{ChainSummarizer, Summarizer, DEFAULT_REDUCE_TOKEN_MAX},
};
pub use processor::{builder::DigestProcessorBuilder, Digest, DigestProcessor};
