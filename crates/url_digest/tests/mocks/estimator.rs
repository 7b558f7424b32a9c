use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use digest_core::TokenEstimator;

/// Estimates `tokens_per_char` tokens for every character and counts calls.
#[derive(Clone)]
pub struct CountingEstimator {
    pub tokens_per_char: usize,
    pub calls: Arc<AtomicUsize>,
}

impl CountingEstimator {
    pub fn new(tokens_per_char: usize) -> Self {
        Self {
            tokens_per_char,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl TokenEstimator for CountingEstimator {
    fn estimate(&self, text: &str) -> usize {
        self.calls.fetch_add(1, Ordering::SeqCst);
        text.chars().count() * self.tokens_per_char
    }
}
