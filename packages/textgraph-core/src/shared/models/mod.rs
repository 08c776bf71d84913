//! Shared models

mod node;

pub use node::{GraphNode, NodeId, NodeMetadata, NodeRecord};
