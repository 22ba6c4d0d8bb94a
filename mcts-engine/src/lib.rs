//! A parallel Monte Carlo Tree Search engine over a shared tree.
//!
//! A pool of persistent worker threads (see [`TreeSearch`]) descends the same
//! [`Allocator`]-owned tree using the PUCT selection rule from `tree-policy`, expands
//! nodes on demand through a pluggable [`Actor`], and backs up rewards through
//! [`Node::accumulate_stats`]. See each module for the grounding for its piece.

mod actor;
mod allocator;
mod edge_info;
mod error;
mod node;
mod node_id;
mod options;
mod tree_search;

pub use actor::Actor;
pub use allocator::Allocator;
pub use edge_info::EdgeInfo;
pub use error::EngineError;
pub use node::{Node, VisitKind};
pub use node_id::NodeId;
pub use options::MctsOptions;
pub use tree_search::TreeSearch;
