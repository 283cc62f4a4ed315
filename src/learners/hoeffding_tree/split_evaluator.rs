//! Candidate ranking and the Hoeffding-bound split decision.

use crate::learners::conditional_tests::AttributeSplitSuggestion;
use crate::learners::hoeffding_tree::nodes::LearningNode;
use crate::learners::hoeffding_tree::split_criteria::SplitCriterion;

/// `sqrt(R^2 ln(1/delta) / (2n))`
pub fn hoeffding_bound(range: f64, delta: f64, n: f64) -> f64 {
    ((range * range * (1.0 / delta).ln()) / (2.0 * n)).sqrt()
}

/// One suggestion per feature that can be split, plus the null split unless
/// pre-pruning is off, best first.
pub fn best_splits(
    node: &LearningNode,
    criterion: &dyn SplitCriterion,
    binary_only: bool,
    no_pre_prune: bool,
) -> Vec<AttributeSplitSuggestion> {
    let pre_split = node.observed_stats();
    let mut suggestions: Vec<AttributeSplitSuggestion> = node
        .attribute_observers()
        .iter()
        .filter_map(|(feature_id, observer)| {
            observer.best_split_suggestion(criterion, pre_split, *feature_id, binary_only)
        })
        .collect();
    if !no_pre_prune {
        suggestions.push(AttributeSplitSuggestion::null_split(pre_split));
    }
    suggestions.sort_by(|a, b| a.rank(b));
    suggestions
}

/// Split decision over ranked suggestions.
///
/// With `epsilon` the Hoeffding bound for `n` observations, the best
/// candidate is accepted when it beats the runner-up by more than `epsilon`,
/// or when `epsilon` has shrunk below `tie_threshold` and the best merit
/// exceeds `min_merit`. A lone candidate or a winning null split never
/// splits.
pub fn should_split(
    suggestions: &[AttributeSplitSuggestion],
    range: f64,
    n: f64,
    confidence: f64,
    tie_threshold: f64,
    min_merit: f64,
) -> bool {
    select_split(suggestions, range, n, confidence, tie_threshold, min_merit).is_some()
}

/// Index of the suggestion to install, if [`should_split`] approves.
///
/// A clear winner is taken as is. When the split is forced by the tie rule,
/// every real candidate whose merit lies within `tie_threshold` of the best
/// and above `min_merit` counts as tied, and the lowest feature id among
/// them wins.
pub fn select_split(
    suggestions: &[AttributeSplitSuggestion],
    range: f64,
    n: f64,
    confidence: f64,
    tie_threshold: f64,
    min_merit: f64,
) -> Option<usize> {
    let [best, second, ..] = suggestions else {
        return None;
    };
    best.get_split_test()?;
    let epsilon = hoeffding_bound(range, confidence, n);
    if best.get_merit() - second.get_merit() > epsilon {
        return Some(0);
    }
    if !(epsilon < tie_threshold && best.get_merit() > min_merit) {
        return None;
    }
    let floor = best.get_merit() - tie_threshold;
    suggestions
        .iter()
        .enumerate()
        .filter(|(_, s)| s.get_merit() >= floor && s.get_merit() > min_merit)
        .filter_map(|(i, s)| s.feature_id().map(|f| (f, i)))
        .min()
        .map(|(_, i)| i)
}
