use std::future::Future;

use digest_core::TokenEstimator;
use itertools::Itertools;

use crate::llm::{
    completion::Completion,
    prompt::{PromptTemplate, SummaryPlan, EXISTING_ANSWER, TEXT},
};

const DOCUMENT_SEPARATOR: &str = "\n\n";

/// Largest merge prompt content, in tokens, before partial summaries are
/// collapsed first
pub const DEFAULT_REDUCE_TOKEN_MAX: usize = 3_000;

pub trait Summarizer {
    type Error: Into<anyhow::Error>;

    /// Produces one summary of `inputs` following `plan`.
    fn summarize<T: AsRef<str>>(
        &self,
        inputs: &[T],
        plan: &SummaryPlan,
    ) -> impl Future<Output = Result<String, Self::Error>>;
}

/// Runs a [`SummaryPlan`] against a chat model, one call at a time.
pub struct ChainSummarizer<C, E> {
    completion: C,
    estimator: E,
    reduce_token_max: usize,
}

impl<C, E> ChainSummarizer<C, E>
where
    C: Completion,
    E: TokenEstimator,
{
    pub fn new(completion: C, estimator: E) -> Self {
        Self {
            completion,
            estimator,
            reduce_token_max: DEFAULT_REDUCE_TOKEN_MAX,
        }
    }

    pub fn with_reduce_token_max(mut self, reduce_token_max: usize) -> Self {
        self.reduce_token_max = reduce_token_max;
        self
    }

    async fn complete(
        &self,
        prompt: &PromptTemplate,
        values: &[(&str, &str)],
    ) -> Result<String, C::Error> {
        self.completion.complete(&prompt.render(values)).await
    }

    /// Everything in one prompt.
    async fn stuff<T: AsRef<str>>(
        &self,
        inputs: &[T],
        prompt: &PromptTemplate,
    ) -> Result<String, C::Error> {
        let text = inputs.iter().map(AsRef::as_ref).join(DOCUMENT_SEPARATOR);
        self.complete(prompt, &[(TEXT, text.as_str())]).await
    }

    /// Summarizes every input on its own, then merges the partial summaries.
    #[tracing::instrument(skip_all, fields(inputs = inputs.len()))]
    async fn map_reduce<T: AsRef<str>>(
        &self,
        inputs: &[T],
        prompt: &PromptTemplate,
    ) -> Result<String, C::Error> {
        let mut summaries = Vec::with_capacity(inputs.len());
        for input in inputs {
            summaries.push(self.complete(prompt, &[(TEXT, input.as_ref())]).await?);
        }

        let summaries = self.collapse(summaries, prompt).await?;
        self.stuff(&summaries, prompt).await
    }

    /// Merges groups of partial summaries until their combined size fits
    /// `reduce_token_max`, or until no group holds more than one summary.
    async fn collapse(
        &self,
        mut summaries: Vec<String>,
        prompt: &PromptTemplate,
    ) -> Result<Vec<String>, C::Error> {
        loop {
            let combined = self
                .estimator
                .estimate(&summaries.join(DOCUMENT_SEPARATOR));
            if combined <= self.reduce_token_max || summaries.len() <= 1 {
                return Ok(summaries);
            }

            let groups = self.group_within_limit(&summaries);
            if groups.len() == summaries.len() {
                tracing::warn!(
                    combined,
                    limit = self.reduce_token_max,
                    "Partial summaries cannot be collapsed further"
                );
                return Ok(summaries);
            }

            tracing::debug!(from = summaries.len(), to = groups.len(), "Collapsing summaries");
            let mut collapsed = Vec::with_capacity(groups.len());
            for group in groups {
                collapsed.push(self.stuff(group, prompt).await?);
            }
            summaries = collapsed;
        }
    }

    /// Consecutive, non-empty groups each within `reduce_token_max`.
    fn group_within_limit<'a>(&self, summaries: &'a [String]) -> Vec<&'a [String]> {
        let mut groups = Vec::new();
        let mut start = 0;
        let mut total = 0;

        for (i, summary) in summaries.iter().enumerate() {
            let tokens = self.estimator.estimate(summary);
            if i > start && total + tokens > self.reduce_token_max {
                groups.push(&summaries[start..i]);
                start = i;
                total = 0;
            }
            total += tokens;
        }
        if start < summaries.len() {
            groups.push(&summaries[start..]);
        }
        groups
    }

    /// Summarizes the first input, then revises that summary with each
    /// following input in order.
    #[tracing::instrument(skip_all, fields(inputs = inputs.len()))]
    async fn refine<T: AsRef<str>>(
        &self,
        inputs: &[T],
        initial: &PromptTemplate,
        refine: &PromptTemplate,
    ) -> Result<String, C::Error> {
        let Some((first, rest)) = inputs.split_first() else {
            return Ok(String::new());
        };

        let mut summary = self.complete(initial, &[(TEXT, first.as_ref())]).await?;
        for input in rest {
            summary = self
                .complete(refine, &[(EXISTING_ANSWER, summary.as_str()), (TEXT, input.as_ref())])
                .await?;
        }
        Ok(summary)
    }
}

impl<C, E> Summarizer for ChainSummarizer<C, E>
where
    C: Completion,
    C::Error: Into<anyhow::Error>,
    E: TokenEstimator,
{
    type Error = C::Error;

    #[tracing::instrument(skip_all, fields(strategy = %plan.strategy(), model = self.completion.model()))]
    async fn summarize<T: AsRef<str>>(
        &self,
        inputs: &[T],
        plan: &SummaryPlan,
    ) -> Result<String, Self::Error> {
        if inputs.is_empty() {
            tracing::warn!("Nothing to summarize");
            return Ok(String::new());
        }

        match plan {
            SummaryPlan::Direct { prompt } => self.stuff(inputs, prompt).await,
            SummaryPlan::IterativeMerge { prompt } => self.map_reduce(inputs, prompt).await,
            SummaryPlan::SequentialRefine { initial, refine } => {
                self.refine(inputs, initial, refine).await
            }
        }
    }
}
