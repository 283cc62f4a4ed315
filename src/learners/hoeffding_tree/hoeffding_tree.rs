use crate::config::{HoeffdingTreeParams, TaskKind};
use crate::core::estimators::TargetStats;
use crate::core::instances::{FeatureKind, FeatureValue, Instance, Label};
use crate::error::{LearnerError, Result};
use crate::learners::Learner;
use crate::learners::conditional_tests::AttributeSplitSuggestion;
use crate::learners::hoeffding_tree::LeafPredictionOption;
use crate::learners::hoeffding_tree::adaptation::{
    AlternateDecision, BranchAdaptation, PrimarySignal, error_signal,
};
use crate::learners::hoeffding_tree::nodes::{
    FoundNode, LearningNode, Node, NodeArena, NodeId, SplitNode, max_index,
};
use crate::learners::hoeffding_tree::split_criteria::SplitCriterion;
use crate::learners::hoeffding_tree::split_evaluator;
use log::{debug, info, warn};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Class labels must be smaller than this. Per-class counts are dense
/// vectors, so an unbounded index would be an unbounded allocation.
pub const MAX_CLASSES: usize = 1 << 16;

/// Incremental decision tree grown with the Hoeffding bound, optionally
/// adapting to concept drift with per-branch detectors and alternate
/// subtrees.
///
/// Nodes live in an arena and refer to each other by [`NodeId`]. A split
/// replaces the leaf in its own slot, so parents never need updating, and an
/// alternate subtree is promoted by moving its root into the branch's slot.
pub struct HoeffdingTree {
    params: HoeffdingTreeParams,
    split_criterion: Box<dyn SplitCriterion>,
    leaf_prediction: LeafPredictionOption,
    task: TaskKind,
    nodes: NodeArena,
    root: NodeId,
    feature_kinds: BTreeMap<usize, FeatureKind>,
    num_classes: usize,
    target_stats: TargetStats,
    instances_seen: u64,
    drift_detections: u64,
    alternates_promoted: u64,
    alternates_discarded: u64,
}

impl HoeffdingTree {
    pub fn new(params: HoeffdingTreeParams) -> Result<Self> {
        params.validate()?;
        let task = params.task_kind();
        let target_stats = match task {
            TaskKind::Classification => TargetStats::classes(),
            TaskKind::Regression => TargetStats::moments(),
        };
        let mut nodes = NodeArena::new();
        let root = nodes.insert(Node::Leaf(LearningNode::new(target_stats.clone(), 0)));
        Ok(Self {
            split_criterion: params.split_criterion.build(),
            leaf_prediction: LeafPredictionOption::from(&params.leaf_prediction),
            task,
            nodes,
            root,
            feature_kinds: BTreeMap::new(),
            num_classes: 0,
            target_stats,
            instances_seen: 0,
            drift_detections: 0,
            alternates_promoted: 0,
            alternates_discarded: 0,
            params,
        })
    }

    pub fn params(&self) -> &HoeffdingTreeParams {
        &self.params
    }

    pub fn task_kind(&self) -> TaskKind {
        self.task
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Observations accepted so far.
    pub fn instances_seen(&self) -> u64 {
        self.instances_seen
    }

    /// Feature kinds fixed by the first observation carrying each feature.
    pub fn feature_kinds(&self) -> &BTreeMap<usize, FeatureKind> {
        &self.feature_kinds
    }

    pub fn drift_detections(&self) -> u64 {
        self.drift_detections
    }

    pub fn alternates_promoted(&self) -> u64 {
        self.alternates_promoted
    }

    pub fn alternates_discarded(&self) -> u64 {
        self.alternates_discarded
    }

    /// Nodes of the primary tree, alternates excluded.
    pub fn node_count(&self) -> usize {
        self.primary_nodes().len()
    }

    /// Leaves of the primary tree in depth-first order.
    pub fn leaves(&self) -> Vec<NodeId> {
        self.primary_nodes()
            .into_iter()
            .filter(|id| self.nodes.get(*id).is_some_and(Node::is_leaf))
            .collect()
    }

    pub fn leaf_count(&self) -> usize {
        self.leaves().len()
    }

    pub fn decision_node_count(&self) -> usize {
        self.node_count() - self.leaf_count()
    }

    /// Depth of the deepest primary leaf; a lone root leaf has depth 0.
    pub fn depth(&self) -> usize {
        self.leaves()
            .into_iter()
            .filter_map(|id| self.nodes.get(id).map(Node::depth))
            .max()
            .unwrap_or(0)
    }

    /// Bytes held by active leaves, alternate subtrees included.
    pub fn active_leaf_bytes(&self) -> usize {
        self.nodes
            .iter()
            .filter_map(|(_, node)| node.as_leaf())
            .filter(|leaf| leaf.is_active())
            .map(LearningNode::calc_byte_size)
            .sum()
    }

    pub fn active_leaf_count(&self) -> usize {
        self.nodes
            .iter()
            .filter_map(|(_, node)| node.as_leaf())
            .filter(|leaf| leaf.is_active())
            .count()
    }

    pub fn inactive_leaf_count(&self) -> usize {
        self.nodes
            .iter()
            .filter_map(|(_, node)| node.as_leaf())
            .filter(|leaf| !leaf.is_active())
            .count()
    }

    fn primary_nodes(&self) -> Vec<NodeId> {
        let mut found = Vec::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            let Some(node) = self.nodes.get(id) else {
                continue;
            };
            found.push(id);
            if let Some(split) = node.as_split() {
                stack.extend(split.children().iter().rev());
            }
        }
        found
    }

    fn empty_target_stats(&self) -> TargetStats {
        self.target_stats.empty_like()
    }

    fn target_std_dev(&self) -> f64 {
        self.target_stats.variance().sqrt()
    }

    /// Walks from `start` to the leaf the instance belongs to.
    pub fn filter_instance_to_leaf(
        &self,
        start: NodeId,
        instance: &dyn Instance,
    ) -> Result<FoundNode> {
        let mut id = start;
        let mut parent = None;
        let mut parent_branch = None;
        for _ in 0..=self.nodes.len() {
            match self.nodes.get(id) {
                None => {
                    return Err(LearnerError::MalformedTree(format!(
                        "node {id} does not exist"
                    )));
                }
                Some(Node::Leaf(_)) => return Ok(FoundNode::new(id, parent, parent_branch)),
                Some(Node::Split(split)) => {
                    let (branch, child) = split.child_for_instance(instance)?;
                    parent = Some(id);
                    parent_branch = Some(branch);
                    id = child;
                }
            }
        }
        Err(LearnerError::MalformedTree(format!(
            "traversal from {start} exceeded {} nodes",
            self.nodes.len()
        )))
    }

    pub fn predict(&self, instance: &dyn Instance) -> Result<Option<Label>> {
        self.predict_from(self.root, instance)
    }

    fn predict_from(&self, start: NodeId, instance: &dyn Instance) -> Result<Option<Label>> {
        let found = self.filter_instance_to_leaf(start, instance)?;
        let leaf = self.nodes.leaf(found.get_node())?;
        Ok(match self.task {
            TaskKind::Classification => max_index(&leaf.get_class_votes(
                instance,
                self.leaf_prediction,
                self.params.nb_threshold,
            ))
            .map(Label::Class),
            TaskKind::Regression => leaf.prediction_stats().mean().map(Label::Numeric),
        })
    }

    /// Class probabilities: Laplace-smoothed leaf frequencies, or the
    /// normalised naive Bayes votes when the leaf predicts with naive Bayes.
    /// Empty for regression trees.
    pub fn predict_proba(&self, instance: &dyn Instance) -> Result<BTreeMap<usize, f64>> {
        if self.task == TaskKind::Regression {
            return Ok(BTreeMap::new());
        }
        let found = self.filter_instance_to_leaf(self.root, instance)?;
        let leaf = self.nodes.leaf(found.get_node())?;
        let votes = leaf.get_class_votes(instance, self.leaf_prediction, self.params.nb_threshold);
        let k = self.num_classes.max(votes.len());
        let vote = |c: usize| votes.get(c).copied().unwrap_or(0.0);

        let nb_total: f64 = votes.iter().sum();
        if leaf.uses_naive_bayes(self.leaf_prediction, self.params.nb_threshold) && nb_total > 0.0
        {
            return Ok((0..k).map(|c| (c, vote(c) / nb_total)).collect());
        }
        let total = nb_total + k as f64;
        Ok((0..k).map(|c| (c, (vote(c) + 1.0) / total)).collect())
    }

    /// Raw leaf votes for classification, `[mean]` for regression.
    pub fn votes(&self, instance: &dyn Instance) -> Result<Vec<f64>> {
        let found = self.filter_instance_to_leaf(self.root, instance)?;
        let leaf = self.nodes.leaf(found.get_node())?;
        Ok(match self.task {
            TaskKind::Classification => {
                leaf.get_class_votes(instance, self.leaf_prediction, self.params.nb_threshold)
            }
            TaskKind::Regression => leaf.prediction_stats().mean().into_iter().collect(),
        })
    }

    fn validate_observation(
        &self,
        instance: &dyn Instance,
    ) -> Result<(Label, f64, Vec<(usize, FeatureValue)>)> {
        let weight = instance.weight();
        if !(weight.is_finite() && weight > 0.0) {
            return Err(LearnerError::InvalidObservation(format!(
                "weight must be finite and positive, got {weight}"
            )));
        }
        let label = instance.label().ok_or_else(|| {
            LearnerError::InvalidObservation("observation has no label".to_string())
        })?;
        match (self.task, label) {
            (TaskKind::Classification, Label::Class(c)) if c < MAX_CLASSES => {}
            (TaskKind::Classification, Label::Class(c)) => {
                return Err(LearnerError::InvalidObservation(format!(
                    "class index {c} is out of range, classes must be below {MAX_CLASSES}"
                )));
            }
            (TaskKind::Regression, Label::Numeric(v)) if v.is_finite() => {}
            (TaskKind::Regression, Label::Numeric(v)) => {
                return Err(LearnerError::InvalidObservation(format!(
                    "numeric target must be finite, got {v}"
                )));
            }
            (TaskKind::Classification, Label::Numeric(_)) => {
                return Err(LearnerError::InvalidObservation(
                    "classification tree received a numeric target".to_string(),
                ));
            }
            (TaskKind::Regression, Label::Class(_)) => {
                return Err(LearnerError::InvalidObservation(
                    "regression tree received a class label".to_string(),
                ));
            }
        }

        let features = instance.features();
        for (feature_id, value) in &features {
            if let FeatureValue::Numeric(v) = value {
                if !v.is_finite() {
                    return Err(LearnerError::InvalidObservation(format!(
                        "feature {feature_id} is not finite: {v}"
                    )));
                }
            }
            if let Some(kind) = self.feature_kinds.get(feature_id) {
                if *kind != value.kind() {
                    return Err(LearnerError::InvalidObservation(format!(
                        "feature {feature_id} was {kind} and is now {}",
                        value.kind()
                    )));
                }
            }
        }
        Ok((label, weight, features))
    }

    /// Learns from one labelled observation. A rejected observation leaves
    /// the tree untouched.
    pub fn learn(&mut self, instance: &dyn Instance) -> Result<()> {
        let (label, weight, features) = self.validate_observation(instance)?;

        let signal = if self.params.drift_detection {
            let prediction = self.predict_from(self.root, instance)?;
            let sigma = self.target_std_dev();
            Some(PrimarySignal {
                error: error_signal(prediction, label, sigma),
                sigma,
            })
        } else {
            None
        };

        for (feature_id, value) in &features {
            self.feature_kinds.entry(*feature_id).or_insert(value.kind());
        }
        if let Label::Class(c) = label {
            self.num_classes = self.num_classes.max(c + 1);
        }
        self.target_stats.add(label, weight);
        self.instances_seen += 1;

        self.learn_from(self.root, instance, &features, label, weight, signal)?;

        if self.instances_seen % self.params.memory_estimate_period as u64 == 0 {
            self.enforce_memory_bound();
        }
        Ok(())
    }

    /// Routes the observation from `start` down to a leaf, updating every
    /// branch on the way. `signal` is `None` inside alternate subtrees, which
    /// do no drift bookkeeping of their own.
    fn learn_from(
        &mut self,
        start: NodeId,
        instance: &dyn Instance,
        features: &[(usize, FeatureValue)],
        label: Label,
        weight: f64,
        signal: Option<PrimarySignal>,
    ) -> Result<()> {
        let mut id = start;
        for _ in 0..=self.nodes.len() {
            let is_leaf = self
                .nodes
                .get(id)
                .ok_or_else(|| LearnerError::MalformedTree(format!("node {id} does not exist")))?
                .is_leaf();

            if is_leaf {
                let grace_period = self.params.grace_period as f64;
                let leaf = self.nodes.leaf_mut(id)?;
                leaf.learn_from_instance(
                    instance,
                    features,
                    label,
                    weight,
                    self.leaf_prediction,
                    self.params.numeric_estimator.max_bins(),
                );
                if leaf.is_active()
                    && leaf.observed_count() - leaf.last_split_check_count() >= grace_period
                {
                    self.attempt_to_split(id)?;
                }
                return Ok(());
            }

            self.nodes.split_mut(id)?.observe(label, weight);
            if let Some(signal) = signal {
                if self.adapt_branch(id, instance, features, label, weight, signal)? {
                    return Ok(());
                }
            }
            let (_, child) = self.nodes.split(id)?.child_for_instance(instance)?;
            id = child;
        }
        Err(LearnerError::MalformedTree(format!(
            "traversal from {start} exceeded {} nodes",
            self.nodes.len()
        )))
    }

    /// Drift bookkeeping for one branch of the primary tree. Returns true
    /// when an alternate was promoted into the branch's slot; the promoted
    /// subtree has already learned the observation.
    fn adapt_branch(
        &mut self,
        branch_id: NodeId,
        instance: &dyn Instance,
        features: &[(usize, FeatureValue)],
        label: Label,
        weight: f64,
        signal: PrimarySignal,
    ) -> Result<bool> {
        if self.nodes.split(branch_id)?.adaptation().is_none() {
            let detector = self.params.drift_detector.build();
            self.nodes
                .split_mut(branch_id)?
                .set_adaptation(BranchAdaptation::new(detector));
        }

        let (drift, depth, alternate) = {
            let split = self.nodes.split_mut(branch_id)?;
            let depth = split.depth();
            let adaptation = split.adaptation_mut().ok_or_else(|| {
                LearnerError::MalformedTree(format!("branch {branch_id} lost its detector"))
            })?;
            let drift = adaptation.update(signal.error);
            (drift, depth, adaptation.alternate_root())
        };
        if drift {
            self.drift_detections += 1;
        }

        let Some(alternate_root) = alternate else {
            if drift {
                let leaf = LearningNode::new(self.empty_target_stats(), depth);
                let alternate_root = self.nodes.insert(Node::Leaf(leaf));
                if let Some(adaptation) = self.nodes.split_mut(branch_id)?.adaptation_mut() {
                    adaptation.start_alternate(alternate_root);
                }
                info!(
                    "drift detected at branch {branch_id} (depth {depth}); growing alternate {alternate_root}"
                );
            }
            return Ok(false);
        };

        let alternate_prediction = self.predict_from(alternate_root, instance)?;
        let alternate_error = error_signal(alternate_prediction, label, signal.sigma);
        self.learn_from(alternate_root, instance, features, label, weight, None)?;

        let decision = {
            let period = self.params.drift_evaluation_period;
            let margin = self.params.drift_switch_margin;
            let max_losing = self.params.drift_max_losing_windows;
            let alternate = self
                .nodes
                .split_mut(branch_id)?
                .adaptation_mut()
                .and_then(BranchAdaptation::alternate_mut)
                .ok_or_else(|| {
                    LearnerError::MalformedTree(format!("branch {branch_id} lost its alternate"))
                })?;
            alternate.record(signal.error, alternate_error, weight);
            alternate.evaluate(period, margin, max_losing)
        };

        match decision {
            AlternateDecision::Continue => Ok(false),
            AlternateDecision::Promote => {
                self.promote_alternate(branch_id)?;
                Ok(true)
            }
            AlternateDecision::Discard => {
                self.discard_alternate(branch_id)?;
                Ok(false)
            }
        }
    }

    /// Moves the branch's alternate root into the branch's slot and frees
    /// the replaced subtree. The promoted subtree starts with fresh detectors.
    fn promote_alternate(&mut self, branch_id: NodeId) -> Result<()> {
        let alternate = self
            .nodes
            .split_mut(branch_id)?
            .adaptation_mut()
            .and_then(BranchAdaptation::take_alternate)
            .ok_or_else(|| {
                LearnerError::MalformedTree(format!("branch {branch_id} has no alternate"))
            })?;
        let promoted = self.nodes.remove(alternate.root()).ok_or_else(|| {
            LearnerError::MalformedTree(format!("alternate {} does not exist", alternate.root()))
        })?;
        let replaced = self.nodes.replace(branch_id, promoted)?;
        let freed: usize = replaced
            .owned_ids()
            .into_iter()
            .map(|id| self.nodes.remove_subtree(id))
            .sum();
        self.alternates_promoted += 1;
        info!(
            "alternate promoted at {branch_id}; replaced subtree of {} nodes",
            freed + 1
        );
        Ok(())
    }

    fn discard_alternate(&mut self, branch_id: NodeId) -> Result<()> {
        let alternate = self
            .nodes
            .split_mut(branch_id)?
            .adaptation_mut()
            .and_then(BranchAdaptation::take_alternate);
        if let Some(alternate) = alternate {
            let freed = self.nodes.remove_subtree(alternate.root());
            self.alternates_discarded += 1;
            info!(
                "alternate at {branch_id} discarded after {} losing windows ({freed} nodes)",
                alternate.losing_windows()
            );
        }
        Ok(())
    }

    fn attempt_to_split(&mut self, leaf_id: NodeId) -> Result<()> {
        let max_depth = self.params.max_depth;
        let leaf = self.nodes.leaf_mut(leaf_id)?;
        leaf.set_last_split_check_count(leaf.observed_count());
        if max_depth.is_some_and(|d| leaf.depth() >= d) || leaf.observed_stats().is_pure() {
            return Ok(());
        }

        let leaf = self.nodes.leaf(leaf_id)?;
        let mut best_suggestions = split_evaluator::best_splits(
            leaf,
            self.split_criterion.as_ref(),
            self.params.binary_splits,
            self.params.no_pre_prune,
        );
        let range = self.split_criterion.get_range_of_merit(leaf.observed_stats());
        let chosen = split_evaluator::select_split(
            &best_suggestions,
            range,
            leaf.observed_count(),
            self.params.confidence,
            self.params.tie_threshold,
            self.params.min_merit,
        );
        match chosen {
            Some(index) => {
                let split_decision = best_suggestions.swap_remove(index);
                self.split_leaf(leaf_id, split_decision)
            }
            None => Ok(()),
        }
    }

    /// Replaces the leaf by a split node and one fresh leaf per branch.
    fn split_leaf(&mut self, leaf_id: NodeId, split_decision: AttributeSplitSuggestion) -> Result<()> {
        let Some(split_test) = split_decision.get_split_test().cloned() else {
            return Ok(());
        };
        let (depth, observed) = {
            let leaf = self.nodes.leaf(leaf_id)?;
            (leaf.depth(), leaf.prediction_stats())
        };
        let children: Vec<NodeId> = split_decision
            .get_resulting_stats()
            .iter()
            .map(|stats| {
                self.nodes
                    .insert(Node::Leaf(LearningNode::new(stats.clone(), depth + 1)))
            })
            .collect();
        debug!(
            "split {leaf_id} on {split_test} (merit {:.4}) into {} children at depth {depth}",
            split_decision.get_merit(),
            children.len()
        );
        let split = SplitNode::new(
            split_test,
            observed,
            children,
            split_decision.default_branch(),
            depth,
        );
        self.nodes.replace(leaf_id, Node::Split(split))?;
        self.enforce_memory_bound();
        Ok(())
    }

    /// Keeps active leaf statistics within `max_memory_bytes`.
    ///
    /// Over budget, active leaves are deactivated by ascending promise until
    /// the active total fits. Under budget, inactive leaves are reactivated
    /// by descending promise while an average active leaf would still fit.
    /// Ties are broken by node id.
    pub fn enforce_memory_bound(&mut self) {
        let budget = self.params.max_memory_bytes;
        let mut active: Vec<(NodeId, f64, usize)> = Vec::new();
        let mut inactive: Vec<(NodeId, f64)> = Vec::new();
        for (id, node) in self.nodes.iter() {
            if let Some(leaf) = node.as_leaf() {
                if leaf.is_active() {
                    active.push((id, leaf.calculate_promise(), leaf.calc_byte_size()));
                } else {
                    inactive.push((id, leaf.calculate_promise()));
                }
            }
        }
        let mut active_total: usize = active.iter().map(|(_, _, bytes)| bytes).sum();

        if active_total > budget {
            warn!(
                "active leaves use {active_total} bytes, over the {budget} byte budget; deactivating"
            );
            active.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
            for (id, promise, bytes) in active {
                if active_total <= budget {
                    break;
                }
                if let Some(leaf) = self.nodes.get_mut(id).and_then(Node::as_leaf_mut) {
                    leaf.deactivate();
                    active_total -= bytes;
                    debug!("deactivated leaf {id} (promise {promise:.3}, {bytes} bytes)");
                }
            }
            return;
        }

        if inactive.is_empty() {
            return;
        }
        let empty_leaf_size = LearningNode::new(self.empty_target_stats(), 0).calc_byte_size();
        let average_active_size = if active.is_empty() {
            empty_leaf_size
        } else {
            active_total / active.len()
        };
        let projected = average_active_size.max(empty_leaf_size);
        inactive.sort_by(|a, b| match b.1.total_cmp(&a.1) {
            Ordering::Equal => a.0.cmp(&b.0),
            other => other,
        });
        for (id, promise) in inactive {
            if active_total + projected > budget {
                break;
            }
            if let Some(leaf) = self.nodes.get_mut(id).and_then(Node::as_leaf_mut) {
                leaf.activate();
                active_total += leaf.calc_byte_size();
                debug!("reactivated leaf {id} (promise {promise:.3})");
            }
        }
    }

    /// Bytes held by every node, alternates included.
    pub fn calc_byte_size(&self) -> usize {
        size_of::<Self>()
            + self
                .nodes
                .iter()
                .map(|(_, node)| node.calc_byte_size())
                .sum::<usize>()
    }
}

impl Learner for HoeffdingTree {
    fn votes_for_instance(&self, instance: &dyn Instance) -> Result<Vec<f64>> {
        self.votes(instance)
    }

    fn train_on_instance(&mut self, instance: &dyn Instance) -> Result<()> {
        self.learn(instance)
    }

    fn byte_size(&self) -> usize {
        self.calc_byte_size()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LeafPredictionChoice, NoParams, SplitCriterionChoice};
    use crate::core::instances::Observation;
    use crate::learners::hoeffding_tree::nodes::LeafStatus;

    fn params() -> HoeffdingTreeParams {
        HoeffdingTreeParams {
            leaf_prediction: LeafPredictionChoice::MajorityClass(NoParams::default()),
            ..HoeffdingTreeParams::default()
        }
    }

    /// Deterministic pseudo-random values in `[0, 1)`.
    fn lcg(seed: &mut u64) -> f64 {
        *seed = seed
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        (*seed >> 11) as f64 / (1u64 << 53) as f64
    }

    fn threshold_stream(n: usize, seed: u64) -> Vec<Observation> {
        let mut s = seed;
        (0..n)
            .map(|_| {
                let noise = lcg(&mut s);
                let informative = lcg(&mut s);
                let class = (informative > 0.5) as usize;
                Observation::numeric(&[noise, informative], Some(Label::Class(class)))
            })
            .collect()
    }

    /// `x0 > 0.5` decides the class for `before` observations and the
    /// opposite class afterwards; `x1` is noise.
    fn axis_concepts(before: usize, after: usize, seed: u64) -> (Vec<Observation>, Vec<Observation>) {
        let mut s = seed;
        let mut draw = |reversed: bool| {
            let x0 = lcg(&mut s);
            let x1 = lcg(&mut s);
            let class = ((x0 > 0.5) != reversed) as usize;
            Observation::numeric(&[x0, x1], Some(Label::Class(class)))
        };
        let first = (0..before).map(|_| draw(false)).collect();
        let second = (0..after).map(|_| draw(true)).collect();
        (first, second)
    }

    fn accuracy(tree: &HoeffdingTree, data: &[Observation]) -> f64 {
        let correct = data
            .iter()
            .filter(|o| tree.predict(*o).unwrap() == o.label())
            .count();
        correct as f64 / data.len() as f64
    }

    #[test]
    fn new_tree_is_a_single_active_leaf() {
        let tree = HoeffdingTree::new(params()).unwrap();
        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.leaf_count(), 1);
        assert_eq!(tree.depth(), 0);
        assert_eq!(tree.instances_seen(), 0);
        assert!(tree.node(tree.root()).unwrap().is_leaf());
        assert_eq!(
            tree.predict(&Observation::numeric(&[0.1], None)).unwrap(),
            None
        );
    }

    #[test]
    fn invalid_params_are_rejected() {
        let p = HoeffdingTreeParams {
            confidence: 0.0,
            ..params()
        };
        assert!(matches!(
            HoeffdingTree::new(p),
            Err(LearnerError::Configuration(_))
        ));
    }

    #[test]
    fn splits_on_the_informative_feature() {
        let mut tree = HoeffdingTree::new(params()).unwrap();
        for obs in threshold_stream(5_000, 7) {
            tree.learn(&obs).unwrap();
        }
        assert!(tree.node_count() > 1);
        let root = tree.node(tree.root()).unwrap().as_split().unwrap();
        assert_eq!(root.get_split_test().feature_id(), 1);
        assert!(accuracy(&tree, &threshold_stream(1_000, 99)) > 0.95);
    }

    #[test]
    fn split_adds_arity_nodes() {
        let mut tree = HoeffdingTree::new(HoeffdingTreeParams {
            grace_period: 50,
            ..params()
        })
        .unwrap();
        let mut previous = tree.node_count();
        for obs in threshold_stream(3_000, 11) {
            tree.learn(&obs).unwrap();
            let now = tree.node_count();
            if now != previous {
                assert_eq!(now - previous, 2, "binary numeric split adds two leaves");
                previous = now;
            }
        }
        assert!(previous > 1);
    }

    #[test]
    fn root_branch_accounts_for_all_weight() {
        let mut tree = HoeffdingTree::new(params()).unwrap();
        for (i, obs) in threshold_stream(4_000, 3).into_iter().enumerate() {
            let weight = if i % 3 == 0 { 2.0 } else { 1.0 };
            tree.learn(&obs.with_weight(weight)).unwrap();
        }
        let total = tree.target_stats.total_weight();
        let root = tree.node(tree.root()).unwrap().as_split().unwrap();
        assert!((root.observed_stats().total_weight() - total).abs() < 1e-6);

        let leaves = tree.leaves();
        let observed: f64 = leaves
            .iter()
            .map(|id| tree.nodes.leaf(*id).unwrap().observed_count())
            .sum();
        let inherited: f64 = leaves
            .iter()
            .map(|id| tree.nodes.leaf(*id).unwrap().inherited_stats().total_weight())
            .sum();
        assert!(observed < total);
        assert!(inherited > 0.0);
    }

    /// One line per primary node: split tests with their thresholds, leaf
    /// depths and statistics.
    fn structure(tree: &HoeffdingTree) -> Vec<String> {
        tree.primary_nodes()
            .into_iter()
            .map(|id| match tree.node(id).unwrap() {
                Node::Split(split) => format!(
                    "{id} split {:?} default {} children {:?}",
                    split.get_split_test(),
                    split.default_child(),
                    split.children()
                ),
                Node::Leaf(leaf) => format!(
                    "{id} leaf depth {} {:?} observed {:?} count {}",
                    leaf.depth(),
                    leaf.status(),
                    leaf.observed_stats(),
                    leaf.observed_count()
                ),
            })
            .collect()
    }

    #[test]
    fn identical_streams_build_identical_trees() {
        let build = || {
            let mut tree = HoeffdingTree::new(HoeffdingTreeParams {
                grace_period: 100,
                ..HoeffdingTreeParams::default()
            })
            .unwrap();
            for obs in threshold_stream(3_000, 5) {
                tree.learn(&obs).unwrap();
            }
            tree
        };
        let a = build();
        let b = build();
        assert!(a.node_count() > 1);
        assert_eq!(structure(&a), structure(&b));
        for obs in threshold_stream(200, 42) {
            assert_eq!(a.predict(&obs).unwrap(), b.predict(&obs).unwrap());
            assert_eq!(a.predict_proba(&obs).unwrap(), b.predict_proba(&obs).unwrap());
        }
    }

    #[test]
    fn leaf_counts_match_a_replay_of_the_stream() {
        let mut tree = HoeffdingTree::new(HoeffdingTreeParams {
            grace_period: 50,
            drift_detection: false,
            ..params()
        })
        .unwrap();
        let mut routed: BTreeMap<NodeId, f64> = BTreeMap::new();
        for (i, obs) in threshold_stream(4_000, 61).into_iter().enumerate() {
            let obs = obs.with_weight(if i % 4 == 0 { 2.5 } else { 1.0 });
            let leaf = tree.filter_instance_to_leaf(tree.root(), &obs).unwrap().get_node();
            *routed.entry(leaf).or_default() += obs.weight();
            tree.learn(&obs).unwrap();
        }
        assert!(tree.leaf_count() > 2);
        for id in tree.leaves() {
            let leaf = tree.nodes.leaf(id).unwrap();
            let expected = routed.get(&id).copied().unwrap_or(0.0);
            assert!(
                (leaf.observed_count() - expected).abs() < 1e-9,
                "leaf {id}: observed {} but {expected} was routed to it",
                leaf.observed_count()
            );
            assert!((leaf.observed_stats().total_weight() - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn prediction_after_a_plain_update_is_the_leaf_majority() {
        let mut tree = HoeffdingTree::new(HoeffdingTreeParams {
            grace_period: 50,
            ..params()
        })
        .unwrap();
        let mut checked = 0;
        for obs in threshold_stream(3_000, 71) {
            let before = tree.node_count();
            tree.learn(&obs).unwrap();
            if tree.node_count() != before {
                continue;
            }
            let leaf_id = tree.filter_instance_to_leaf(tree.root(), &obs).unwrap().get_node();
            let majority = tree
                .nodes
                .leaf(leaf_id)
                .unwrap()
                .prediction_stats()
                .majority_class()
                .map(Label::Class);
            assert!(majority.is_some());
            assert_eq!(tree.predict(&obs).unwrap(), majority);
            checked += 1;
        }
        assert!(checked > 2_900);
    }

    /// Two binary nominal features that both track the class. Feature 0 is
    /// flipped on every 100th observation, feature 1 on every 200th, so
    /// feature 1 has the higher merit by about 0.03.
    fn near_tie_stream(n: usize) -> Vec<Observation> {
        (0..n)
            .map(|i| {
                let class = i % 2;
                let f0 = if i % 100 == 0 { 1 - class } else { class };
                let f1 = if i % 200 == 0 { 1 - class } else { class };
                Observation::new(
                    [(0, FeatureValue::Nominal(f0)), (1, FeatureValue::Nominal(f1))],
                    Some(Label::Class(class)),
                )
            })
            .collect()
    }

    #[test]
    fn forced_tie_installs_the_lower_feature_id() {
        let mut tree = HoeffdingTree::new(params()).unwrap();
        let stream = near_tie_stream(600);
        // The bound stays above the merit gap at 200 and 400 observations
        // and first drops under the tie threshold at 600.
        for obs in &stream[..599] {
            tree.learn(obs).unwrap();
        }
        assert!(tree.node(tree.root()).unwrap().is_leaf());
        tree.learn(&stream[599]).unwrap();
        let root = tree.node(tree.root()).unwrap().as_split().unwrap();
        assert_eq!(root.get_split_test().feature_id(), 0);
        assert_eq!(root.num_children(), 2);
    }

    #[test]
    fn predict_agrees_with_predict_proba() {
        for leaf_prediction in [
            LeafPredictionChoice::MajorityClass(NoParams::default()),
            LeafPredictionChoice::NaiveBayes(NoParams::default()),
            LeafPredictionChoice::NBAdaptive(NoParams::default()),
        ] {
            let mut tree = HoeffdingTree::new(HoeffdingTreeParams {
                leaf_prediction,
                ..HoeffdingTreeParams::default()
            })
            .unwrap();
            for obs in threshold_stream(2_000, 13) {
                tree.learn(&obs).unwrap();
            }
            for obs in threshold_stream(300, 17) {
                let proba = tree.predict_proba(&obs).unwrap();
                let sum: f64 = proba.values().sum();
                assert!((sum - 1.0).abs() < 1e-9);
                let best = proba
                    .iter()
                    .fold(None::<(usize, f64)>, |acc, (&c, &p)| match acc {
                        Some((_, bp)) if bp >= p => acc,
                        _ => Some((c, p)),
                    })
                    .map(|(c, _)| Label::Class(c));
                assert_eq!(tree.predict(&obs).unwrap(), best);
            }
        }
    }

    #[test]
    fn rejected_observations_do_not_mutate() {
        let mut tree = HoeffdingTree::new(params()).unwrap();
        for obs in threshold_stream(500, 1) {
            tree.learn(&obs).unwrap();
        }
        let nodes = tree.node_count();
        let seen = tree.instances_seen();
        let kinds = tree.feature_kinds().clone();
        let query = Observation::numeric(&[0.3, 0.7], None);
        let before = tree.predict_proba(&query).unwrap();

        let bad = [
            Observation::numeric(&[0.1, 0.2], None),
            Observation::numeric(&[0.1, 0.2], Some(Label::Numeric(1.0))),
            Observation::numeric(&[0.1, 0.2], Some(Label::Class(0))).with_weight(0.0),
            Observation::numeric(&[0.1, 0.2], Some(Label::Class(0))).with_weight(f64::NAN),
            Observation::new(
                [(0, FeatureValue::Nominal(1)), (1, FeatureValue::Numeric(0.2))],
                Some(Label::Class(1)),
            ),
            Observation::numeric(&[f64::INFINITY, 0.2], Some(Label::Class(1))),
            Observation::numeric(&[0.1, 0.2], Some(Label::Class(usize::MAX))),
            Observation::numeric(&[0.1, 0.2], Some(Label::Class(1_000_000_000_000))),
            Observation::numeric(&[0.1, 0.2], Some(Label::Class(MAX_CLASSES))),
            Observation::new(
                [(7, FeatureValue::Numeric(0.2))],
                Some(Label::Class(usize::MAX)),
            ),
        ];
        for obs in &bad {
            assert!(matches!(
                tree.learn(obs),
                Err(LearnerError::InvalidObservation(_))
            ));
        }
        assert_eq!(tree.node_count(), nodes);
        assert_eq!(tree.instances_seen(), seen);
        assert_eq!(tree.feature_kinds(), &kinds);
        assert_eq!(tree.predict_proba(&query).unwrap(), before);
        assert_eq!(tree.num_classes, 2);
        assert!(!tree.feature_kinds().contains_key(&7));

        tree.learn(&Observation::numeric(&[0.1, 0.2], Some(Label::Class(MAX_CLASSES - 1))))
            .unwrap();
        assert_eq!(tree.num_classes, MAX_CLASSES);
    }

    #[test]
    fn mismatched_kind_in_split_test_fails_prediction() {
        let mut tree = HoeffdingTree::new(params()).unwrap();
        for obs in threshold_stream(3_000, 21) {
            tree.learn(&obs).unwrap();
        }
        let query = Observation::new(
            [(0, FeatureValue::Numeric(0.2)), (1, FeatureValue::Nominal(0))],
            None,
        );
        assert!(matches!(
            tree.predict(&query),
            Err(LearnerError::InvalidObservation(_))
        ));
    }

    #[test]
    fn missing_feature_follows_default_branch() {
        let mut tree = HoeffdingTree::new(params()).unwrap();
        for obs in threshold_stream(3_000, 23) {
            tree.learn(&obs).unwrap();
        }
        let query = Observation::numeric(&[0.5], None);
        assert!(tree.predict(&query).unwrap().is_some());
    }

    #[test]
    fn memory_bound_holds_after_enforcement() {
        let budget = 6_000;
        let mut tree = HoeffdingTree::new(HoeffdingTreeParams {
            grace_period: 50,
            max_memory_bytes: budget,
            memory_estimate_period: 100,
            ..params()
        })
        .unwrap();
        for (i, obs) in threshold_stream(6_000, 31).into_iter().enumerate() {
            tree.learn(&obs).unwrap();
            if (i + 1) % 100 == 0 {
                assert!(tree.active_leaf_bytes() <= budget);
            }
        }
        assert!(tree.inactive_leaf_count() > 0);
        for id in tree.leaves() {
            let leaf = tree.nodes.leaf(id).unwrap();
            if leaf.status() == LeafStatus::Inactive {
                assert!(leaf.attribute_observers().is_empty());
            }
        }
    }

    #[test]
    fn generous_budget_reactivates_leaves() {
        let mut tree = HoeffdingTree::new(HoeffdingTreeParams {
            grace_period: 50,
            max_memory_bytes: 4_000,
            memory_estimate_period: 100,
            ..params()
        })
        .unwrap();
        for obs in threshold_stream(3_000, 37) {
            tree.learn(&obs).unwrap();
        }
        assert!(tree.inactive_leaf_count() > 0);
        tree.params.max_memory_bytes = 1 << 30;
        tree.enforce_memory_bound();
        assert_eq!(tree.inactive_leaf_count(), 0);
    }

    #[test]
    fn max_depth_limits_growth() {
        let mut tree = HoeffdingTree::new(HoeffdingTreeParams {
            grace_period: 50,
            max_depth: Some(1),
            ..params()
        })
        .unwrap();
        for obs in threshold_stream(5_000, 41) {
            tree.learn(&obs).unwrap();
        }
        assert!(tree.depth() <= 1);
    }

    #[test]
    fn nominal_features_split_multiway_or_binary() {
        let stream = |n: usize| {
            let mut s = 77;
            (0..n)
                .map(|_| {
                    let category = (lcg(&mut s) * 4.0) as usize;
                    let class = (category >= 2) as usize;
                    Observation::new([(0, FeatureValue::Nominal(category))], Some(Label::Class(class)))
                })
                .collect::<Vec<_>>()
        };

        let mut multiway = HoeffdingTree::new(params()).unwrap();
        let mut binary = HoeffdingTree::new(HoeffdingTreeParams {
            binary_splits: true,
            ..params()
        })
        .unwrap();
        for obs in stream(2_000) {
            multiway.learn(&obs).unwrap();
            binary.learn(&obs).unwrap();
        }
        let root = multiway.node(multiway.root()).unwrap().as_split().unwrap();
        assert_eq!(root.num_children(), 4);
        let root = binary.node(binary.root()).unwrap().as_split().unwrap();
        assert_eq!(root.num_children(), 2);
        assert_eq!(
            binary.feature_kinds().get(&0),
            Some(&FeatureKind::Nominal)
        );
    }

    #[test]
    fn regression_tree_learns_a_step_function() {
        let mut tree = HoeffdingTree::new(HoeffdingTreeParams {
            grace_period: 100,
            ..HoeffdingTreeParams::regression()
        })
        .unwrap();
        let mut s = 9;
        for _ in 0..4_000 {
            let x = lcg(&mut s);
            let y = if x < 0.3 { 2.0 } else { 8.0 };
            tree.learn(&Observation::numeric(&[x], Some(Label::Numeric(y))))
                .unwrap();
        }
        assert!(tree.node_count() > 1);
        let low = tree.predict(&Observation::numeric(&[0.1], None)).unwrap();
        let high = tree.predict(&Observation::numeric(&[0.9], None)).unwrap();
        assert!(matches!(low, Some(Label::Numeric(v)) if (v - 2.0).abs() < 0.5));
        assert!(matches!(high, Some(Label::Numeric(v)) if (v - 8.0).abs() < 0.5));
        assert!(tree.predict_proba(&Observation::numeric(&[0.1], None)).unwrap().is_empty());
        assert!(matches!(
            tree.learn(&Observation::numeric(&[0.1], Some(Label::Class(0)))),
            Err(LearnerError::InvalidObservation(_))
        ));
    }

    #[test]
    fn gini_criterion_also_finds_the_threshold() {
        let mut tree = HoeffdingTree::new(HoeffdingTreeParams {
            split_criterion: SplitCriterionChoice::Gini(NoParams::default()),
            ..params()
        })
        .unwrap();
        for obs in threshold_stream(4_000, 51) {
            tree.learn(&obs).unwrap();
        }
        assert!(accuracy(&tree, &threshold_stream(1_000, 52)) > 0.9);
    }

    fn drift_run(drift_detection: bool) -> (HoeffdingTree, f64) {
        let mut tree = HoeffdingTree::new(HoeffdingTreeParams {
            drift_detection,
            ..params()
        })
        .unwrap();
        let (before, after) = axis_concepts(10_000, 10_000, 1);
        for obs in before.iter().chain(after.iter().take(5_000)) {
            tree.learn(obs).unwrap();
        }
        let (_, held_out) = axis_concepts(0, 1_000, 2);
        let acc = accuracy(&tree, &held_out);
        (tree, acc)
    }

    #[test]
    fn drift_adaptation_recovers_after_a_concept_switch() {
        let (tree, adaptive) = drift_run(true);
        assert!(tree.drift_detections() > 0);
        assert!(tree.alternates_promoted() > 0);
        assert!(adaptive >= 0.9, "adaptive accuracy {adaptive}");

        let (_, plain) = drift_run(false);
        assert!(plain < 0.9, "plain accuracy {plain}");
    }

    #[test]
    fn alternate_subtrees_live_outside_the_primary_tree() {
        let mut tree = HoeffdingTree::new(HoeffdingTreeParams {
            drift_detection: true,
            ..params()
        })
        .unwrap();
        let (before, after) = axis_concepts(10_000, 200, 3);
        for obs in before.iter().chain(after.iter()) {
            tree.learn(obs).unwrap();
        }
        assert!(tree.nodes.len() >= tree.node_count());
        let alternates = tree
            .nodes
            .iter()
            .filter_map(|(_, n)| n.as_split())
            .filter(|s| s.alternate_root().is_some())
            .count();
        assert!(alternates <= tree.decision_node_count());
    }
}
