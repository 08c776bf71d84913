//! Node store: node records plus the stable-id ↔ dense-index mapping
//!
//! Nodes live in a petgraph `DiGraph` whose `NodeIndex` is the dense
//! internal index. External callers address nodes by `NodeId`; indices are
//! only stable within one store (structural rebuilds such as filtering
//! renumber them). The store never removes nodes, so an index is never
//! reused for a different id.

use crate::errors::{GraphError, Result};
use crate::shared::models::{GraphNode, NodeId};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

/// Owns node records and parent → child edges.
///
/// Payloads are held behind `Arc` so cloning a store (one DAG version per
/// mutation) copies pointers, not node data.
pub struct NodeStore<A> {
    /// Parent → child edges. Node weight = shared node record.
    graph: DiGraph<Arc<GraphNode<A>>, ()>,

    /// NodeId → dense index for O(1) lookups
    id_to_index: HashMap<NodeId, NodeIndex>,
}

impl<A> Clone for NodeStore<A> {
    fn clone(&self) -> Self {
        Self {
            graph: self.graph.clone(),
            id_to_index: self.id_to_index.clone(),
        }
    }
}

impl<A> Default for NodeStore<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> NodeStore<A> {
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            id_to_index: HashMap::new(),
        }
    }

    pub fn with_capacity(nodes: usize) -> Self {
        Self {
            graph: DiGraph::with_capacity(nodes, nodes.saturating_sub(1)),
            id_to_index: HashMap::with_capacity(nodes),
        }
    }

    /// Insert a node and return its dense index.
    ///
    /// Fails with `InvalidRecord` if the id is already present.
    pub fn insert(&mut self, node: GraphNode<A>) -> Result<usize> {
        if self.id_to_index.contains_key(&node.id) {
            return Err(GraphError::invalid_record(format!(
                "duplicate node id {}",
                node.id
            )));
        }

        let id = node.id;
        let idx = self.graph.add_node(Arc::new(node));
        self.id_to_index.insert(id, idx);
        Ok(idx.index())
    }

    /// Append a root under a freshly generated id
    pub(crate) fn push_root(&mut self, data: A) -> usize {
        let node = GraphNode::new(data, None, None, 0);
        let id = node.id;
        let idx = self.graph.add_node(Arc::new(node));
        self.id_to_index.insert(id, idx);
        idx.index()
    }

    /// Record a parent → child edge. Callers validate acyclicity first.
    pub(crate) fn add_edge(&mut self, parent: usize, child: usize) {
        self.graph
            .add_edge(NodeIndex::new(parent), NodeIndex::new(child), ());
    }

    /// Node by id; `None` when absent
    pub fn get(&self, id: &NodeId) -> Option<&GraphNode<A>> {
        self.id_to_index
            .get(id)
            .and_then(|&idx| self.graph.node_weight(idx))
            .map(|node| node.as_ref())
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.id_to_index.contains_key(id)
    }

    pub fn index_of(&self, id: &NodeId) -> Option<usize> {
        self.id_to_index.get(id).map(|idx| idx.index())
    }

    pub fn id_of(&self, index: usize) -> Option<NodeId> {
        self.graph.node_weight(NodeIndex::new(index)).map(|n| n.id)
    }

    pub fn node_at(&self, index: usize) -> Option<&GraphNode<A>> {
        self.graph
            .node_weight(NodeIndex::new(index))
            .map(|n| n.as_ref())
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Children of `index` in insertion order
    pub fn child_indices(&self, index: usize) -> Vec<usize> {
        // petgraph lists neighbors newest-first; sort back to insertion order
        let mut children: Vec<usize> = self
            .graph
            .neighbors_directed(NodeIndex::new(index), Direction::Outgoing)
            .map(|idx| idx.index())
            .collect();
        children.sort_unstable();
        children
    }

    /// Structural parent (incoming edge), if any
    pub fn parent_index(&self, index: usize) -> Option<usize> {
        self.graph
            .neighbors_directed(NodeIndex::new(index), Direction::Incoming)
            .next()
            .map(|idx| idx.index())
    }

    pub fn has_children(&self, index: usize) -> bool {
        self.graph
            .neighbors_directed(NodeIndex::new(index), Direction::Outgoing)
            .next()
            .is_some()
    }

    /// True if `to` is reachable from `from` (a node reaches itself)
    pub fn reaches(&self, from: usize, to: usize) -> bool {
        petgraph::algo::has_path_connecting(
            &self.graph,
            NodeIndex::new(from),
            NodeIndex::new(to),
            None,
        )
    }

    /// All nodes in index (insertion) order
    pub fn iter(&self) -> impl Iterator<Item = (usize, &GraphNode<A>)> + '_ {
        self.graph
            .node_indices()
            .map(move |idx| (idx.index(), self.graph[idx].as_ref()))
    }

    /// Edges as `(parent, child)` index pairs, sorted
    pub fn edge_pairs(&self) -> Vec<(usize, usize)> {
        let mut pairs: Vec<(usize, usize)> = self
            .graph
            .raw_edges()
            .iter()
            .map(|e| (e.source().index(), e.target().index()))
            .collect();
        pairs.sort_unstable();
        pairs
    }

    pub fn is_cyclic(&self) -> bool {
        petgraph::algo::is_cyclic_directed(&self.graph)
    }

    /// Same indices, same edges, new payloads
    pub fn map<B, F>(&self, mut f: F) -> NodeStore<B>
    where
        F: FnMut(&A) -> B,
    {
        let graph = self
            .graph
            .map(|_, node| Arc::new(node.with_data(f(&node.data))), |_, _| ());

        NodeStore {
            graph,
            id_to_index: self.id_to_index.clone(),
        }
    }

    /// Keep nodes matching `keep`; edges touching a dropped node are dropped.
    /// Indices are renumbered, ids are untouched.
    ///
    /// A kept node whose parent was dropped is re-rooted (`parent_id: None`,
    /// depth 0) and depths below it are re-derived, so the kept records stay
    /// consistent with the kept edges.
    pub fn retain<P>(&self, mut keep: P) -> NodeStore<A>
    where
        A: Clone,
        P: FnMut(&GraphNode<A>) -> bool,
    {
        let mut graph = self.graph.filter_map(
            |_, node| keep(node.as_ref()).then(|| Arc::clone(node)),
            |_, _| Some(()),
        );

        let mut queue: VecDeque<(NodeIndex, usize)> = graph
            .node_indices()
            .filter(|&idx| {
                graph
                    .neighbors_directed(idx, Direction::Incoming)
                    .next()
                    .is_none()
            })
            .map(|idx| (idx, 0))
            .collect();

        while let Some((idx, depth)) = queue.pop_front() {
            let current = &graph[idx];
            let orphaned = depth == 0 && current.parent_id.is_some();
            let rewritten = (orphaned || current.depth() != depth).then(|| {
                let mut node = GraphNode::clone(current);
                if orphaned {
                    node.parent_id = None;
                }
                node.metadata.depth = depth;
                Arc::new(node)
            });
            if let Some(node) = rewritten {
                graph[idx] = node;
            }

            queue.extend(
                graph
                    .neighbors_directed(idx, Direction::Outgoing)
                    .map(|child| (child, depth + 1)),
            );
        }

        let id_to_index = graph
            .node_indices()
            .map(|idx| (graph[idx].id, idx))
            .collect();

        NodeStore { graph, id_to_index }
    }
}
