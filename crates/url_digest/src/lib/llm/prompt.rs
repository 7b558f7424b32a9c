use std::{borrow::Cow, sync::LazyLock};

use digest_core::Strategy;
use regex::{Captures, Regex};

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)\}").unwrap());

pub const TEXT: &str = "text";
pub const EXISTING_ANSWER: &str = "existing_answer";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PromptError {
    #[error("prompt template is missing the {{{0}}} placeholder")]
    MissingVariable(&'static str),
}

/// A prompt with `{name}` placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    template: Cow<'static, str>,
}

impl PromptTemplate {
    /// Fails unless every name in `required` appears as a placeholder.
    pub fn new(
        template: impl Into<Cow<'static, str>>,
        required: &[&'static str],
    ) -> Result<Self, PromptError> {
        let template = Self {
            template: template.into(),
        };
        let present = template.variables();
        if let Some(&missing) = required.iter().find(|&&var| !present.contains(&var)) {
            return Err(PromptError::MissingVariable(missing));
        }
        Ok(template)
    }

    fn variables(&self) -> Vec<&str> {
        PLACEHOLDER_RE
            .captures_iter(&self.template)
            .filter_map(|cap| cap.get(1))
            .map(|m| m.as_str())
            .collect()
    }

    /// Substitutes the given values in a single pass; placeholders without a
    /// value are left untouched, and substituted text is never re-expanded.
    pub fn render(&self, values: &[(&str, &str)]) -> String {
        PLACEHOLDER_RE
            .replace_all(&self.template, |cap: &Captures| {
                values
                    .iter()
                    .find(|(name, _)| *name == &cap[1])
                    .map(|(_, value)| value.to_string())
                    .unwrap_or_else(|| cap[0].to_string())
            })
            .into_owned()
    }

    pub fn as_str(&self) -> &str {
        &self.template
    }
}

/// A strategy together with the prompts it needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryPlan {
    Direct {
        prompt: PromptTemplate,
    },
    /// `prompt` is used both for the per-chunk summaries and for merging them
    IterativeMerge {
        prompt: PromptTemplate,
    },
    SequentialRefine {
        initial: PromptTemplate,
        refine: PromptTemplate,
    },
}

impl SummaryPlan {
    pub fn strategy(&self) -> Strategy {
        match self {
            SummaryPlan::Direct { .. } => Strategy::Direct,
            SummaryPlan::IterativeMerge { .. } => Strategy::IterativeMerge,
            SummaryPlan::SequentialRefine { .. } => Strategy::SequentialRefine,
        }
    }
}

/// The prompts every strategy can draw from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptSet {
    summary: PromptTemplate,
    refine_initial: PromptTemplate,
    refine_update: PromptTemplate,
}

impl PromptSet {
    const SUMMARY: &str = include_str!("./prompts/summary.txt");
    const REFINE_INITIAL: &str = include_str!("./prompts/refine_initial.txt");
    const REFINE_UPDATE: &str = include_str!("./prompts/refine_update.txt");

    pub fn new(
        summary: impl Into<Cow<'static, str>>,
        refine_initial: impl Into<Cow<'static, str>>,
        refine_update: impl Into<Cow<'static, str>>,
    ) -> Result<Self, PromptError> {
        Ok(Self {
            summary: PromptTemplate::new(summary, &[TEXT])?,
            refine_initial: PromptTemplate::new(refine_initial, &[TEXT])?,
            refine_update: PromptTemplate::new(refine_update, &[EXISTING_ANSWER, TEXT])?,
        })
    }

    pub fn plan(&self, strategy: Strategy) -> SummaryPlan {
        match strategy {
            Strategy::Direct => SummaryPlan::Direct {
                prompt: self.summary.clone(),
            },
            Strategy::IterativeMerge => SummaryPlan::IterativeMerge {
                prompt: self.summary.clone(),
            },
            Strategy::SequentialRefine => SummaryPlan::SequentialRefine {
                initial: self.refine_initial.clone(),
                refine: self.refine_update.clone(),
            },
        }
    }
}

impl Default for PromptSet {
    fn default() -> Self {
        let template = |s: &'static str| PromptTemplate {
            template: Cow::Borrowed(s),
        };
        Self {
            summary: template(Self::SUMMARY),
            refine_initial: template(Self::REFINE_INITIAL),
            refine_update: template(Self::REFINE_UPDATE),
        }
    }
}
