pub mod builder;

use digest_core::{
    select_strategy, select_within_budget, Document, Strategy, StrategyThresholds, TextSplitter,
    TokenBudget, TokenEstimator,
};
use itertools::Itertools;
use serde::Serialize;

use crate::{
    error::Error,
    fetch::{ContentFetcher, Source},
    llm::{
        prompt::{PromptSet, SummaryPlan},
        summarizer::Summarizer,
    },
};

/// Result of summarizing one URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Digest {
    pub summary: String,
    pub strategy: Strategy,
    /// Estimate for the whole fetched content
    pub total_tokens: usize,
    /// Zero when the content was summarized without chunking
    pub chunks_total: usize,
    pub chunks_selected: usize,
    /// Estimate for the content actually handed to the summarizer
    pub selected_tokens: usize,
}

/// Turns a URL into a summary: fetch, estimate, pick a strategy, chunk and
/// trim to the token budget when needed, summarize.
pub struct DigestProcessor<F, S, E>
where
    F: ContentFetcher,
    S: Summarizer,
    E: TokenEstimator,
{
    fetcher: F,
    summarizer: S,
    estimator: E,
    splitter: Box<dyn TextSplitter>,
    budget: TokenBudget,
    thresholds: StrategyThresholds,
    prompts: PromptSet,
}

impl<F, S, E> DigestProcessor<F, S, E>
where
    F: ContentFetcher,
    S: Summarizer,
    E: TokenEstimator,
{
    #[tracing::instrument(skip(self))]
    pub async fn summarize_url(&self, url: &str) -> Result<Digest, Error> {
        let source = Source::parse(url)
            .inspect_err(|e| tracing::warn!(error = %e, "Rejected input url"))?;

        let documents = self
            .fetcher
            .fetch(&source)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to fetch content"))?;
        tracing::info!(documents = documents.len(), "Fetched content");

        self.summarize_documents(documents).await
    }

    #[tracing::instrument(skip_all, fields(documents = documents.len()))]
    pub async fn summarize_documents(&self, documents: Vec<Document>) -> Result<Digest, Error> {
        let total_tokens = self
            .estimator
            .estimate(&documents.iter().map(Document::text).join(" "));
        let strategy = select_strategy(total_tokens, &self.thresholds);
        let plan = self.prompts.plan(strategy);
        tracing::info!(total_tokens, %strategy, "Selected summarization strategy");

        if !strategy.needs_chunking() {
            let summary = self.summarize(&documents, &plan).await?;
            return Ok(Digest {
                summary,
                strategy,
                total_tokens,
                chunks_total: 0,
                chunks_selected: 0,
                selected_tokens: total_tokens,
            });
        }

        let chunks = self.splitter.split_documents(&documents);
        let chunks_total = chunks.len();
        let selected = select_within_budget(chunks, self.budget, &self.estimator);
        let selected_tokens: usize = selected
            .iter()
            .map(|chunk| self.estimator.estimate(chunk.as_ref()))
            .sum();

        if selected.is_empty() && chunks_total > 0 {
            tracing::warn!(
                ceiling = self.budget.ceiling(),
                "The first chunk alone exceeds the token budget"
            );
        }
        tracing::info!(
            chunks_total,
            chunks_selected = selected.len(),
            selected_tokens,
            "Selected chunks within budget"
        );

        let summary = self.summarize(&selected, &plan).await?;
        Ok(Digest {
            summary,
            strategy,
            total_tokens,
            chunks_total,
            chunks_selected: selected.len(),
            selected_tokens,
        })
    }

    async fn summarize<T: AsRef<str>>(
        &self,
        inputs: &[T],
        plan: &SummaryPlan,
    ) -> Result<String, Error> {
        self.summarizer
            .summarize(inputs, plan)
            .await
            .map_err(|e| Error::Summarization(e.into()))
            .inspect_err(|e| tracing::error!(error = %e, "Failed to summarize content"))
    }
}
