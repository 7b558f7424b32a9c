pub mod estimator;
pub mod fetcher;
pub mod summarizer;
