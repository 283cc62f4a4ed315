use crate::core::estimators::TargetStats;
use crate::core::instances::{Instance, Label};
use crate::error::{LearnerError, Result};
use crate::learners::hoeffding_tree::adaptation::BranchAdaptation;
use crate::learners::hoeffding_tree::instance_conditional_test::InstanceConditionalTest;
use crate::learners::hoeffding_tree::nodes::NodeId;

#[derive(Debug)]
pub struct SplitNode {
    split_test: InstanceConditionalTest,
    observed: TargetStats,
    children: Vec<NodeId>,
    default_child: usize,
    depth: usize,
    adaptation: Option<BranchAdaptation>,
}

impl SplitNode {
    pub fn new(
        split_test: InstanceConditionalTest,
        observed: TargetStats,
        children: Vec<NodeId>,
        default_child: usize,
        depth: usize,
    ) -> Self {
        Self {
            split_test,
            observed,
            children,
            default_child,
            depth,
            adaptation: None,
        }
    }

    pub fn get_split_test(&self) -> &InstanceConditionalTest {
        &self.split_test
    }

    pub fn observed_stats(&self) -> &TargetStats {
        &self.observed
    }

    pub fn observe(&mut self, label: Label, weight: f64) {
        self.observed.add(label, weight);
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn num_children(&self) -> usize {
        self.children.len()
    }

    pub fn get_child(&self, index: usize) -> Option<NodeId> {
        self.children.get(index).copied()
    }

    pub fn default_child(&self) -> usize {
        self.default_child
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Branch index for the instance; undecidable instances take the default
    /// branch.
    pub fn instance_child_index(&self, instance: &dyn Instance) -> Result<usize> {
        Ok(self
            .split_test
            .branch_for_instance(instance)?
            .unwrap_or(self.default_child))
    }

    pub fn child_for_instance(&self, instance: &dyn Instance) -> Result<(usize, NodeId)> {
        let branch = self.instance_child_index(instance)?;
        let child = self.get_child(branch).ok_or_else(|| {
            LearnerError::MalformedTree(format!(
                "split on {} has no child for branch {branch}",
                self.split_test
            ))
        })?;
        Ok((branch, child))
    }

    pub fn adaptation(&self) -> Option<&BranchAdaptation> {
        self.adaptation.as_ref()
    }

    pub fn adaptation_mut(&mut self) -> Option<&mut BranchAdaptation> {
        self.adaptation.as_mut()
    }

    pub fn set_adaptation(&mut self, adaptation: BranchAdaptation) {
        self.adaptation = Some(adaptation);
    }

    pub fn alternate_root(&self) -> Option<NodeId> {
        self.adaptation.as_ref().and_then(BranchAdaptation::alternate_root)
    }

    pub fn calc_byte_size(&self) -> usize {
        size_of::<Self>() + self.observed.byte_size() - size_of::<TargetStats>()
            + self.split_test.calc_byte_size()
            + self.children.capacity() * size_of::<NodeId>()
            + self
                .adaptation
                .as_ref()
                .map_or(0, |_| size_of::<BranchAdaptation>())
    }
}
