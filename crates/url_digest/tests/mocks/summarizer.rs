use std::sync::{Arc, Mutex};

use url_digest::{Summarizer, SummaryPlan};

#[derive(Debug, Clone)]
pub struct SummarizerCall {
    pub inputs: Vec<String>,
    pub plan: SummaryPlan,
}

#[derive(Clone)]
pub struct MockSummarizer {
    pub summary: String,
    pub calls: Arc<Mutex<Vec<SummarizerCall>>>,
    pub fail_with: Option<String>,
}

impl MockSummarizer {
    pub fn new(summary: &str) -> Self {
        Self {
            summary: summary.to_string(),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: None,
        }
    }

    pub fn failing(msg: &str) -> Self {
        Self {
            summary: String::new(),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: Some(msg.to_string()),
        }
    }
}

impl Summarizer for MockSummarizer {
    type Error = anyhow::Error;

    async fn summarize<T: AsRef<str>>(
        &self,
        inputs: &[T],
        plan: &SummaryPlan,
    ) -> Result<String, Self::Error> {
        self.calls.lock().unwrap().push(SummarizerCall {
            inputs: inputs.iter().map(|i| i.as_ref().to_string()).collect(),
            plan: plan.clone(),
        });
        if let Some(ref msg) = self.fail_with {
            return Err(anyhow::anyhow!("{}", msg));
        }
        Ok(self.summary.clone())
    }
}
