use crate::learners::hoeffding_tree::nodes::{LearningNode, SplitNode};
use std::fmt::{Display, Formatter};

/// Stable index of a node slot in the tree's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug)]
pub enum Node {
    Leaf(LearningNode),
    Split(SplitNode),
}

impl Node {
    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf(_))
    }

    pub fn as_leaf(&self) -> Option<&LearningNode> {
        match self {
            Node::Leaf(leaf) => Some(leaf),
            Node::Split(_) => None,
        }
    }

    pub fn as_leaf_mut(&mut self) -> Option<&mut LearningNode> {
        match self {
            Node::Leaf(leaf) => Some(leaf),
            Node::Split(_) => None,
        }
    }

    pub fn as_split(&self) -> Option<&SplitNode> {
        match self {
            Node::Split(split) => Some(split),
            Node::Leaf(_) => None,
        }
    }

    pub fn as_split_mut(&mut self) -> Option<&mut SplitNode> {
        match self {
            Node::Split(split) => Some(split),
            Node::Leaf(_) => None,
        }
    }

    pub fn depth(&self) -> usize {
        match self {
            Node::Leaf(leaf) => leaf.depth(),
            Node::Split(split) => split.depth(),
        }
    }

    /// Every node this one owns: children, plus a branch's alternate root.
    pub fn owned_ids(&self) -> Vec<NodeId> {
        match self {
            Node::Leaf(_) => Vec::new(),
            Node::Split(split) => {
                let mut ids = split.children().to_vec();
                if let Some(alt) = split.alternate_root() {
                    ids.push(alt);
                }
                ids
            }
        }
    }

    pub fn calc_byte_size(&self) -> usize {
        match self {
            Node::Leaf(leaf) => leaf.calc_byte_size(),
            Node::Split(split) => split.calc_byte_size(),
        }
    }
}
