use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// How the fetched content is turned into a summary.
///
/// Variants are ordered from simplest to most involved, so `Ord` follows the
/// amount of content each one is picked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Everything in a single model call
    Direct,
    /// Summarize each chunk, then merge the partial summaries
    IterativeMerge,
    /// Summarize the first chunk, then revise the running summary chunk by chunk
    SequentialRefine,
}

impl Strategy {
    /// Whether the content must be chunked and budgeted before summarizing
    pub fn needs_chunking(&self) -> bool {
        !matches!(self, Strategy::Direct)
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Direct => write!(f, "direct"),
            Strategy::IterativeMerge => write!(f, "iterative-merge"),
            Strategy::SequentialRefine => write!(f, "sequential-refine"),
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unknown strategy: {0}")]
pub struct ParseStrategyError(String);

impl FromStr for Strategy {
    type Err = ParseStrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "direct" => Ok(Strategy::Direct),
            "iterative-merge" => Ok(Strategy::IterativeMerge),
            "sequential-refine" => Ok(Strategy::SequentialRefine),
            other => Err(ParseStrategyError(other.to_string())),
        }
    }
}

/// Token counts at which the selector moves to a more involved strategy.
///
/// Only built through [`StrategyThresholds::new`] so `merge_from <= refine_from`
/// always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StrategyThresholds {
    merge_from: usize,
    refine_from: usize,
}

impl StrategyThresholds {
    pub const DEFAULT_MERGE_FROM: usize = 8_000;
    pub const DEFAULT_REFINE_FROM: usize = 15_000;

    /// Returns `None` when `merge_from > refine_from`.
    pub fn new(merge_from: usize, refine_from: usize) -> Option<Self> {
        (merge_from <= refine_from).then_some(Self {
            merge_from,
            refine_from,
        })
    }

    pub fn merge_from(&self) -> usize {
        self.merge_from
    }

    pub fn refine_from(&self) -> usize {
        self.refine_from
    }
}

impl Default for StrategyThresholds {
    fn default() -> Self {
        Self {
            merge_from: Self::DEFAULT_MERGE_FROM,
            refine_from: Self::DEFAULT_REFINE_FROM,
        }
    }
}

/// Picks the summarization strategy for content of `total_tokens` tokens.
pub fn select_strategy(total_tokens: usize, thresholds: &StrategyThresholds) -> Strategy {
    if total_tokens < thresholds.merge_from {
        Strategy::Direct
    } else if total_tokens < thresholds.refine_from {
        Strategy::IterativeMerge
    } else {
        Strategy::SequentialRefine
    }
}
