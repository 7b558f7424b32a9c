use digest_core::{StrategyThresholds, TextSplitter, TokenBudget, TokenEstimator, WindowSplitter};

use crate::{
    config::DigestConfig,
    error::ValidationError,
    fetch::ContentFetcher,
    llm::{prompt::PromptSet, summarizer::Summarizer},
    DigestProcessor,
};

pub struct DigestProcessorBuilder<F = (), S = (), E = ()> {
    fetcher: F,
    summarizer: S,
    estimator: E,
    splitter: Box<dyn TextSplitter>,
    budget: TokenBudget,
    thresholds: StrategyThresholds,
    prompts: PromptSet,
}

impl DigestProcessorBuilder {
    pub fn new() -> Self {
        Self {
            fetcher: (),
            summarizer: (),
            estimator: (),
            splitter: Box::new(WindowSplitter::default()),
            budget: TokenBudget::default(),
            thresholds: StrategyThresholds::default(),
            prompts: PromptSet::default(),
        }
    }
}

impl Default for DigestProcessorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl<F, S, E> DigestProcessorBuilder<F, S, E> {
    pub fn fetcher<F2: ContentFetcher>(self, fetcher: F2) -> DigestProcessorBuilder<F2, S, E> {
        DigestProcessorBuilder {
            fetcher,
            summarizer: self.summarizer,
            estimator: self.estimator,
            splitter: self.splitter,
            budget: self.budget,
            thresholds: self.thresholds,
            prompts: self.prompts,
        }
    }

    pub fn summarizer<S2: Summarizer>(self, summarizer: S2) -> DigestProcessorBuilder<F, S2, E> {
        DigestProcessorBuilder {
            fetcher: self.fetcher,
            summarizer,
            estimator: self.estimator,
            splitter: self.splitter,
            budget: self.budget,
            thresholds: self.thresholds,
            prompts: self.prompts,
        }
    }

    pub fn estimator<E2: TokenEstimator>(self, estimator: E2) -> DigestProcessorBuilder<F, S, E2> {
        DigestProcessorBuilder {
            fetcher: self.fetcher,
            summarizer: self.summarizer,
            estimator,
            splitter: self.splitter,
            budget: self.budget,
            thresholds: self.thresholds,
            prompts: self.prompts,
        }
    }

    pub fn splitter(mut self, splitter: impl TextSplitter + 'static) -> Self {
        self.splitter = Box::new(splitter);
        self
    }

    pub fn budget(mut self, budget: TokenBudget) -> Self {
        self.budget = budget;
        self
    }

    pub fn thresholds(mut self, thresholds: StrategyThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn prompts(mut self, prompts: PromptSet) -> Self {
        self.prompts = prompts;
        self
    }

    /// Applies the budget, thresholds and splitter of `config`.
    pub fn config(mut self, config: &DigestConfig) -> Result<Self, ValidationError> {
        self.splitter = config.splitter()?;
        self.budget = config.budget;
        self.thresholds = config.thresholds;
        Ok(self)
    }
}

impl<F, S, E> DigestProcessorBuilder<F, S, E>
where
    F: ContentFetcher,
    S: Summarizer,
    E: TokenEstimator,
{
    pub fn build(self) -> DigestProcessor<F, S, E> {
        DigestProcessor {
            fetcher: self.fetcher,
            summarizer: self.summarizer,
            estimator: self.estimator,
            splitter: self.splitter,
            budget: self.budget,
            thresholds: self.thresholds,
            prompts: self.prompts,
        }
    }
}
