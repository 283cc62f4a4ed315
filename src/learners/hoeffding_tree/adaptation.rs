use crate::core::instances::Label;
use crate::drift::DriftDetector;
use crate::learners::hoeffding_tree::nodes::NodeId;

/// Error signal for one prediction: `1.0` for a wrong or missing class,
/// `min(1, |error| / (3 sigma))` for numeric targets.
pub fn error_signal(prediction: Option<Label>, label: Label, sigma: f64) -> f64 {
    match (prediction, label) {
        (Some(Label::Class(p)), Label::Class(y)) => (p != y) as u8 as f64,
        (Some(Label::Numeric(p)), Label::Numeric(y)) => {
            let error = (p - y).abs();
            if sigma > 0.0 {
                (error / (3.0 * sigma)).min(1.0)
            } else if error == 0.0 {
                0.0
            } else {
                1.0
            }
        }
        _ => 1.0,
    }
}

/// The primary tree's error on the current observation, shared by every
/// branch on its path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrimarySignal {
    pub error: f64,
    pub sigma: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlternateDecision {
    Continue,
    Promote,
    Discard,
}

/// A subtree grown after drift was detected at a branch, raced against the
/// original over fixed windows.
#[derive(Debug, Clone, PartialEq)]
pub struct AlternateTree {
    root: NodeId,
    window_count: usize,
    window_weight: f64,
    main_errors: f64,
    alternate_errors: f64,
    losing_windows: usize,
}

impl AlternateTree {
    pub fn new(root: NodeId) -> Self {
        Self {
            root,
            window_count: 0,
            window_weight: 0.0,
            main_errors: 0.0,
            alternate_errors: 0.0,
            losing_windows: 0,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn losing_windows(&self) -> usize {
        self.losing_windows
    }

    pub fn record(&mut self, main_error: f64, alternate_error: f64, weight: f64) {
        self.window_count += 1;
        self.window_weight += weight;
        self.main_errors += main_error * weight;
        self.alternate_errors += alternate_error * weight;
    }

    /// Closes the window once `period` observations were recorded.
    pub fn evaluate(&mut self, period: usize, margin: f64, max_losing: usize) -> AlternateDecision {
        if self.window_count < period {
            return AlternateDecision::Continue;
        }
        let main_rate = self.main_errors / self.window_weight;
        let alternate_rate = self.alternate_errors / self.window_weight;
        self.window_count = 0;
        self.window_weight = 0.0;
        self.main_errors = 0.0;
        self.alternate_errors = 0.0;

        if main_rate - alternate_rate > margin {
            return AlternateDecision::Promote;
        }
        self.losing_windows += 1;
        if self.losing_windows >= max_losing {
            AlternateDecision::Discard
        } else {
            AlternateDecision::Continue
        }
    }
}

/// Drift bookkeeping owned by a branch of the primary tree.
#[derive(Debug)]
pub struct BranchAdaptation {
    detector: Box<dyn DriftDetector>,
    alternate: Option<AlternateTree>,
}

impl BranchAdaptation {
    pub fn new(detector: Box<dyn DriftDetector>) -> Self {
        Self {
            detector,
            alternate: None,
        }
    }

    /// Feeds the detector; true when it signals drift.
    pub fn update(&mut self, error: f64) -> bool {
        self.detector.update(error)
    }

    pub fn detector(&self) -> &dyn DriftDetector {
        self.detector.as_ref()
    }

    pub fn alternate(&self) -> Option<&AlternateTree> {
        self.alternate.as_ref()
    }

    pub fn alternate_mut(&mut self) -> Option<&mut AlternateTree> {
        self.alternate.as_mut()
    }

    pub fn alternate_root(&self) -> Option<NodeId> {
        self.alternate.as_ref().map(AlternateTree::root)
    }

    pub fn start_alternate(&mut self, root: NodeId) {
        self.alternate = Some(AlternateTree::new(root));
    }

    pub fn take_alternate(&mut self) -> Option<AlternateTree> {
        self.alternate.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drift::Adwin;

    #[test]
    fn class_errors_are_binary() {
        assert_eq!(error_signal(Some(Label::Class(1)), Label::Class(1), 0.0), 0.0);
        assert_eq!(error_signal(Some(Label::Class(0)), Label::Class(1), 0.0), 1.0);
        assert_eq!(error_signal(None, Label::Class(1), 0.0), 1.0);
    }

    #[test]
    fn numeric_errors_are_scaled_and_capped() {
        let e = error_signal(Some(Label::Numeric(1.5)), Label::Numeric(0.0), 1.0);
        assert!((e - 0.5).abs() < 1e-12);
        assert_eq!(
            error_signal(Some(Label::Numeric(10.0)), Label::Numeric(0.0), 1.0),
            1.0
        );
        assert_eq!(
            error_signal(Some(Label::Numeric(2.0)), Label::Numeric(2.0), 0.0),
            0.0
        );
    }

    #[test]
    fn better_alternate_is_promoted_after_a_window() {
        let mut alt = AlternateTree::new(NodeId(3));
        for _ in 0..9 {
            alt.record(1.0, 0.0, 1.0);
            assert_eq!(alt.evaluate(10, 0.05, 3), AlternateDecision::Continue);
        }
        alt.record(1.0, 0.0, 1.0);
        assert_eq!(alt.evaluate(10, 0.05, 3), AlternateDecision::Promote);
    }

    #[test]
    fn losing_alternate_is_discarded() {
        let mut alt = AlternateTree::new(NodeId(3));
        let mut decisions = Vec::new();
        for _ in 0..3 {
            for _ in 0..5 {
                alt.record(0.2, 0.2, 1.0);
            }
            decisions.push(alt.evaluate(5, 0.05, 3));
        }
        assert_eq!(
            decisions,
            vec![
                AlternateDecision::Continue,
                AlternateDecision::Continue,
                AlternateDecision::Discard
            ]
        );
        assert_eq!(alt.losing_windows(), 3);
    }

    #[test]
    fn branch_tracks_a_single_alternate() {
        let mut branch = BranchAdaptation::new(Box::new(Adwin::default()));
        assert!(!branch.update(0.0));
        assert_eq!(branch.detector().samples_seen(), 1);
        branch.start_alternate(NodeId(9));
        assert_eq!(branch.alternate_root(), Some(NodeId(9)));
        assert_eq!(branch.take_alternate().map(|a| a.root()), Some(NodeId(9)));
        assert!(branch.alternate().is_none());
    }
}
