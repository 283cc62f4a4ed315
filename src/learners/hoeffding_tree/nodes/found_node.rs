use crate::learners::hoeffding_tree::nodes::NodeId;

/// Leaf an instance was routed to, with the branch it came through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FoundNode {
    node: NodeId,
    parent: Option<NodeId>,
    parent_branch: Option<usize>,
}

impl FoundNode {
    pub fn new(node: NodeId, parent: Option<NodeId>, parent_branch: Option<usize>) -> Self {
        Self {
            node,
            parent,
            parent_branch,
        }
    }

    pub fn get_node(&self) -> NodeId {
        self.node
    }

    pub fn get_parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn get_parent_branch(&self) -> Option<usize> {
        self.parent_branch
    }
}
