//! Graph node model
//!
//! A node is immutable once inserted. `depth` is fixed at insertion time
//! from the parent's depth. Only `filter_nodes` derives a new DAG with
//! re-rooted copies of orphaned nodes.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Opaque, globally unique node identifier (UUID v4)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(Uuid);

impl NodeId {
    /// Generate a fresh identifier
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for NodeId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

impl From<Uuid> for NodeId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// Provenance recorded for every node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeMetadata {
    /// Transformation that produced the node (`None` for roots)
    pub operation: Option<String>,
    /// Creation time, milliseconds since the Unix epoch
    pub timestamp: i64,
    /// 0 for roots, parent depth + 1 otherwise
    pub depth: usize,
}

impl NodeMetadata {
    pub(crate) fn stamped(operation: Option<String>, depth: usize) -> Self {
        Self {
            operation,
            timestamp: Utc::now().timestamp_millis(),
            depth,
        }
    }
}

/// A node in the text DAG
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode<A> {
    pub id: NodeId,
    pub data: A,
    pub parent_id: Option<NodeId>,
    pub metadata: NodeMetadata,
}

impl<A> GraphNode<A> {
    pub(crate) fn new(data: A, parent_id: Option<NodeId>, operation: Option<String>, depth: usize) -> Self {
        Self {
            id: NodeId::new(),
            data,
            parent_id,
            metadata: NodeMetadata::stamped(operation, depth),
        }
    }

    /// True when the node was inserted without a parent
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    pub fn depth(&self) -> usize {
        self.metadata.depth
    }

    pub fn operation(&self) -> Option<&str> {
        self.metadata.operation.as_deref()
    }

    /// Same id and provenance, different payload
    pub fn with_data<B>(&self, data: B) -> GraphNode<B> {
        GraphNode {
            id: self.id,
            data,
            parent_id: self.parent_id,
            metadata: self.metadata.clone(),
        }
    }
}

/// Transport shape of a node.
///
/// ```json
/// {"id": "...", "data": {...}, "parentId": null,
///  "metadata": {"operation": null, "timestamp": 1700000000000, "depth": 0}}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeRecord<A> {
    pub id: String,
    pub data: A,
    pub parent_id: Option<String>,
    pub metadata: NodeMetadata,
}

impl<A: Clone> From<&GraphNode<A>> for NodeRecord<A> {
    fn from(node: &GraphNode<A>) -> Self {
        Self {
            id: node.id.to_string(),
            data: node.data.clone(),
            parent_id: node.parent_id.map(|p| p.to_string()),
            metadata: node.metadata.clone(),
        }
    }
}
