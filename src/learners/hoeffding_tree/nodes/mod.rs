mod found_node;
mod learning_node;
mod node;
mod node_arena;
mod split_node;

pub use found_node::FoundNode;
pub use learning_node::{LeafStatus, LearningNode};
pub(crate) use learning_node::max_index;
pub use node::{Node, NodeId};
pub use node_arena::NodeArena;
pub use split_node::SplitNode;
