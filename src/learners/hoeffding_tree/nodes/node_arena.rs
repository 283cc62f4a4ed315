use crate::error::{LearnerError, Result};
use crate::learners::hoeffding_tree::nodes::{LearningNode, Node, NodeId, SplitNode};

/// Slot storage for tree nodes.
///
/// Ids stay valid until the node is removed; freed slots are reused, most
/// recently freed first.
#[derive(Debug, Default)]
pub struct NodeArena {
    slots: Vec<Option<Node>>,
    free: Vec<usize>,
    live: usize,
}

impl NodeArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, node: Node) -> NodeId {
        self.live += 1;
        match self.free.pop() {
            Some(index) => {
                self.slots[index] = Some(node);
                NodeId(index)
            }
            None => {
                self.slots.push(Some(node));
                NodeId(self.slots.len() - 1)
            }
        }
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots.get_mut(id.0).and_then(Option::as_mut)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    pub fn remove(&mut self, id: NodeId) -> Option<Node> {
        let node = self.slots.get_mut(id.0)?.take()?;
        self.free.push(id.0);
        self.live -= 1;
        Some(node)
    }

    /// Puts `node` in the live slot `id` and hands back what was there.
    pub fn replace(&mut self, id: NodeId, node: Node) -> Result<Node> {
        let slot = self
            .slots
            .get_mut(id.0)
            .filter(|slot| slot.is_some())
            .ok_or_else(|| dangling(id))?;
        slot.replace(node).ok_or_else(|| dangling(id))
    }

    /// Removes `id` and everything it owns. Returns the number of nodes freed.
    pub fn remove_subtree(&mut self, id: NodeId) -> usize {
        let mut freed = 0;
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if let Some(node) = self.remove(next) {
                stack.extend(node.owned_ids());
                freed += 1;
            }
        }
        freed
    }

    /// Number of live nodes, alternates included.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Live nodes in id order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|n| (NodeId(i), n)))
    }

    pub fn leaf(&self, id: NodeId) -> Result<&LearningNode> {
        self.get(id)
            .ok_or_else(|| dangling(id))?
            .as_leaf()
            .ok_or_else(|| wrong_kind(id, "leaf"))
    }

    pub fn leaf_mut(&mut self, id: NodeId) -> Result<&mut LearningNode> {
        self.get_mut(id)
            .ok_or_else(|| dangling(id))?
            .as_leaf_mut()
            .ok_or_else(|| wrong_kind(id, "leaf"))
    }

    pub fn split(&self, id: NodeId) -> Result<&SplitNode> {
        self.get(id)
            .ok_or_else(|| dangling(id))?
            .as_split()
            .ok_or_else(|| wrong_kind(id, "split"))
    }

    pub fn split_mut(&mut self, id: NodeId) -> Result<&mut SplitNode> {
        self.get_mut(id)
            .ok_or_else(|| dangling(id))?
            .as_split_mut()
            .ok_or_else(|| wrong_kind(id, "split"))
    }
}

fn dangling(id: NodeId) -> LearnerError {
    LearnerError::MalformedTree(format!("node {id} does not exist"))
}

fn wrong_kind(id: NodeId, expected: &str) -> LearnerError {
    LearnerError::MalformedTree(format!("node {id} is not a {expected} node"))
}
