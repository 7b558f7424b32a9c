use std::sync::Arc;

use tiktoken_rs::CoreBPE;

/// Estimates how many model tokens a text would consume.
///
/// Estimates are approximate: the ceiling the estimate is compared against is
/// set below the provider's hard limit to absorb tokenizer drift.
pub trait TokenEstimator {
    fn estimate(&self, text: &str) -> usize;
}

impl<T: TokenEstimator + ?Sized> TokenEstimator for &T {
    fn estimate(&self, text: &str) -> usize {
        (**self).estimate(text)
    }
}

impl<T: TokenEstimator + ?Sized> TokenEstimator for Box<T> {
    fn estimate(&self, text: &str) -> usize {
        (**self).estimate(text)
    }
}

impl<T: TokenEstimator + ?Sized> TokenEstimator for Arc<T> {
    fn estimate(&self, text: &str) -> usize {
        (**self).estimate(text)
    }
}

/// BPE token counts over the `cl100k_base` vocabulary.
pub struct TiktokenEstimator {
    bpe: CoreBPE,
}

impl TiktokenEstimator {
    pub fn cl100k() -> anyhow::Result<Self> {
        let bpe = tiktoken_rs::cl100k_base()
            .inspect_err(|e| tracing::error!(error = ?e, "Failed to load cl100k_base encoding"))?;
        Ok(Self { bpe })
    }
}

impl std::fmt::Debug for TiktokenEstimator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TiktokenEstimator")
            .field("encoding", &"cl100k_base")
            .finish()
    }
}

impl TokenEstimator for TiktokenEstimator {
    fn estimate(&self, text: &str) -> usize {
        if text.is_empty() {
            return 0;
        }
        self.bpe.encode_with_special_tokens(text).len()
    }
}

/// ~4 characters per token.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicEstimator;

impl TokenEstimator for HeuristicEstimator {
    fn estimate(&self, text: &str) -> usize {
        text.chars().count().div_ceil(4)
    }
}
