use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

use crate::TokenEstimator;

/// Maximum estimated tokens allowed in one summarization pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenBudget(NonZeroUsize);

impl TokenBudget {
    /// Kept under the 12k tokens-per-minute quota of `llama-3.3-70b-versatile`
    pub const DEFAULT_CEILING: usize = 11_300;

    const DEFAULT: Self = match NonZeroUsize::new(Self::DEFAULT_CEILING) {
        Some(ceiling) => Self(ceiling),
        None => panic!("default ceiling must be positive"),
    };

    /// Returns `None` for a zero ceiling.
    pub fn new(ceiling: usize) -> Option<Self> {
        NonZeroUsize::new(ceiling).map(Self)
    }

    pub fn ceiling(&self) -> usize {
        self.0.get()
    }
}

impl Default for TokenBudget {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Keeps the longest ordered prefix of `items` whose summed estimate stays
/// within `budget`.
///
/// Selection stops at the first item that would overflow the budget, even if
/// a later, smaller item would still fit. An empty result is not an error.
#[tracing::instrument(skip_all, fields(ceiling = budget.ceiling()))]
pub fn select_within_budget<T, I, E>(items: I, budget: TokenBudget, estimator: &E) -> Vec<T>
where
    T: AsRef<str>,
    I: IntoIterator<Item = T>,
    E: TokenEstimator + ?Sized,
{
    let mut items = items.into_iter();
    let mut selected = Vec::new();
    let mut total = 0usize;

    while let Some(item) = items.next() {
        let tokens = estimator.estimate(item.as_ref());
        if total.saturating_add(tokens) > budget.ceiling() {
            let dropped = 1 + items.count();
            tracing::debug!(
                selected = selected.len(),
                dropped,
                total,
                "Token budget reached"
            );
            return selected;
        }
        total += tokens;
        selected.push(item);
    }

    tracing::debug!(selected = selected.len(), total, "All items fit the budget");
    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HeuristicEstimator;
    use proptest::prelude::*;

    /// One token per character
    struct CharEstimator;

    impl TokenEstimator for CharEstimator {
        fn estimate(&self, text: &str) -> usize {
            text.chars().count()
        }
    }

    fn text(len: usize) -> String {
        "x".repeat(len)
    }

    #[test]
    fn test_zero_ceiling_rejected() {
        assert!(TokenBudget::new(0).is_none());
        assert_eq!(TokenBudget::default().ceiling(), 11_300);
    }

    #[test]
    fn test_everything_fits() {
        let items = vec![text(10), text(20), text(30)];
        let selected =
            select_within_budget(items.clone(), TokenBudget::new(60).unwrap(), &CharEstimator);
        assert_eq!(selected, items);
    }

    #[test]
    fn test_stops_at_first_overflow() {
        let items = vec![text(5_000), text(5_000), text(2_000), text(10)];
        let selected =
            select_within_budget(items.clone(), TokenBudget::default(), &CharEstimator);

        // the 10 token item would fit, but it comes after the overflowing one
        assert_eq!(selected, items[..2].to_vec());
    }

    #[test]
    fn test_first_item_over_ceiling_yields_empty() {
        let items = vec![text(12_000), text(10)];
        let selected = select_within_budget(items, TokenBudget::default(), &CharEstimator);
        assert!(selected.is_empty());
    }

    #[test]
    fn test_exact_fit_is_included() {
        let items = vec![text(11_000), text(300)];
        let selected =
            select_within_budget(items.clone(), TokenBudget::default(), &CharEstimator);
        assert_eq!(selected, items);
    }

    #[test]
    fn test_empty_input() {
        let selected = select_within_budget(
            Vec::<String>::new(),
            TokenBudget::default(),
            &HeuristicEstimator,
        );
        assert!(selected.is_empty());
    }

    proptest! {
        #[test]
        fn prop_selection_is_a_prefix_within_budget(
            lens in prop::collection::vec(0usize..3_000, 0..30),
            ceiling in 1usize..20_000,
        ) {
            let items: Vec<String> = lens.iter().map(|&l| text(l)).collect();
            let budget = TokenBudget::new(ceiling).unwrap();
            let selected = select_within_budget(items.clone(), budget, &CharEstimator);

            prop_assert!(selected.len() <= items.len());
            prop_assert_eq!(&selected[..], &items[..selected.len()]);

            let used: usize = selected.iter().map(|s| s.len()).sum();
            prop_assert!(used <= ceiling);

            // the first dropped item is the one that overflowed
            if let Some(next) = items.get(selected.len()) {
                prop_assert!(used + next.len() > ceiling);
            }
        }

        #[test]
        fn prop_selection_is_idempotent(
            lens in prop::collection::vec(0usize..3_000, 0..30),
            ceiling in 1usize..20_000,
        ) {
            let items: Vec<String> = lens.iter().map(|&l| text(l)).collect();
            let budget = TokenBudget::new(ceiling).unwrap();

            let once = select_within_budget(items, budget, &CharEstimator);
            let twice = select_within_budget(once.clone(), budget, &CharEstimator);
            prop_assert_eq!(once, twice);
        }
    }
}
