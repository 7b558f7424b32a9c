//! # Digest Core
//!
//! The token-budget decision core of url-digest: estimating how many model
//! tokens a text costs, picking a summarization strategy from that estimate,
//! splitting documents into overlapping windows and keeping the ordered
//! prefix of windows that fits a token ceiling.
//!
//! Nothing in this crate touches the network; the fetching and model-calling
//! halves of the pipeline live in the `url_digest` crate.

mod budget;
mod chunker;
mod domain;
mod strategy;
mod token;

pub use budget::{select_within_budget, TokenBudget};
pub use chunker::{
    recursive::RecursiveSplitter, split, window::WindowSplitter, ChunkError, TextSplitter,
    DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE,
};
pub use domain::{Chunk, Document};
pub use strategy::{select_strategy, ParseStrategyError, Strategy, StrategyThresholds};
pub use token::{HeuristicEstimator, TiktokenEstimator, TokenEstimator};
