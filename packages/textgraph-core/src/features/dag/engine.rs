//! Append-only provenance DAG
//!
//! # Versioning
//! `Dag` is a value. `add_node` / `map` / `filter_nodes` return a new DAG
//! and leave the receiver untouched, so callers may keep earlier versions.
//! Node payloads are `Arc`-shared between versions; only the adjacency and
//! index tables are copied.
//!
//! `insert` / `connect` mutate in place through `&mut self`, which makes the
//! borrow checker the single-writer lock: readers (traversal, fold, search)
//! hold `&Dag` and cannot overlap a mutation of the same instance.
//!
//! # Invariants
//! - every non-root has exactly one parent edge
//! - `depth == 0` iff `parent_id == None`, else `parent.depth + 1`
//! - no node is its own ancestor (checked before any edge is committed)

use super::node_store::NodeStore;
use crate::errors::{GraphError, Result};
use crate::shared::models::{GraphNode, NodeId};
use std::fmt;
use tracing::debug;

pub struct Dag<A> {
    store: NodeStore<A>,
}

impl<A> Clone for Dag<A> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

impl<A> Default for Dag<A> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<A> Dag<A> {
    pub fn empty() -> Self {
        Self {
            store: NodeStore::new(),
        }
    }

    /// DAG with a single root at depth 0
    pub fn singleton(data: A) -> Self {
        let mut store = NodeStore::with_capacity(1);
        store.push_root(data);
        Self { store }
    }

    pub(crate) fn from_store(store: NodeStore<A>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &NodeStore<A> {
        &self.store
    }

    // ═══════════════════════════════════════════════════════════════════
    // Mutation
    // ═══════════════════════════════════════════════════════════════════

    /// Append a node under `parent` (or as a new root) and return its id.
    ///
    /// Depth is computed here from the parent and never changes afterwards.
    pub fn insert(
        &mut self,
        data: A,
        parent: Option<&NodeId>,
        operation: Option<&str>,
    ) -> Result<NodeId> {
        let parent_slot = match parent {
            Some(pid) => {
                let idx = self
                    .store
                    .index_of(pid)
                    .ok_or(GraphError::NodeNotFound(*pid))?;
                let depth = self
                    .store
                    .node_at(idx)
                    .map(|p| p.depth())
                    .ok_or(GraphError::NodeNotFound(*pid))?;
                Some((idx, *pid, depth))
            }
            None => None,
        };

        let node = match parent_slot {
            Some((_, pid, parent_depth)) => GraphNode::new(
                data,
                Some(pid),
                operation.map(str::to_string),
                parent_depth + 1,
            ),
            None => GraphNode::new(data, None, operation.map(str::to_string), 0),
        };
        let id = node.id;
        let child_idx = self.store.insert(node)?;

        // A freshly inserted node has no descendants, so this edge cannot close a cycle
        if let Some((parent_idx, _, _)) = parent_slot {
            self.store.add_edge(parent_idx, child_idx);
        }

        Ok(id)
    }

    /// Persistent insertion: the receiver is unchanged, the returned DAG
    /// holds the new node (see [`Dag::newest`]).
    pub fn add_node(&self, data: A, parent: Option<&NodeId>, operation: Option<&str>) -> Result<Dag<A>> {
        let mut next = self.clone();
        next.insert(data, parent, operation)?;
        Ok(next)
    }

    /// Commit a `parent → child` edge between existing nodes.
    ///
    /// Checked before anything is written:
    /// - `child` must not reach `parent` (and must differ from it): `Cycle`
    /// - `child` must not already have a parent: `InvalidEdge`
    /// - `child`'s recorded provenance must name `parent` at `parent.depth + 1`: `InvalidEdge`
    ///
    /// On error the DAG is unchanged.
    pub fn connect(&mut self, parent: &NodeId, child: &NodeId) -> Result<()> {
        let parent_idx = self
            .store
            .index_of(parent)
            .ok_or(GraphError::NodeNotFound(*parent))?;
        let child_idx = self
            .store
            .index_of(child)
            .ok_or(GraphError::NodeNotFound(*child))?;

        if parent_idx == child_idx || self.store.reaches(child_idx, parent_idx) {
            debug!(%parent, %child, "rejected edge: would create a cycle");
            return Err(GraphError::Cycle {
                parent: *parent,
                child: *child,
            });
        }

        if self.store.parent_index(child_idx).is_some() {
            return Err(GraphError::InvalidEdge {
                parent: *parent,
                child: *child,
                reason: "child already has a parent".to_string(),
            });
        }

        let (parent_node, child_node) = match (
            self.store.node_at(parent_idx),
            self.store.node_at(child_idx),
        ) {
            (Some(p), Some(c)) => (p, c),
            _ => return Err(GraphError::NodeNotFound(*child)),
        };

        if child_node.parent_id != Some(*parent) || child_node.depth() != parent_node.depth() + 1 {
            return Err(GraphError::InvalidEdge {
                parent: *parent,
                child: *child,
                reason: format!(
                    "child provenance (parent {:?}, depth {}) does not match",
                    child_node.parent_id.map(|p| p.to_string()),
                    child_node.depth()
                ),
            });
        }

        self.store.add_edge(parent_idx, child_idx);
        Ok(())
    }

    // ═══════════════════════════════════════════════════════════════════
    // Queries
    // ═══════════════════════════════════════════════════════════════════

    pub fn get(&self, id: &NodeId) -> Option<&GraphNode<A>> {
        self.store.get(id)
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.store.contains(id)
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn node_count(&self) -> usize {
        self.store.len()
    }

    pub fn edge_count(&self) -> usize {
        self.store.edge_count()
    }

    /// Nodes in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode<A>> + '_ {
        self.store.iter().map(|(_, node)| node)
    }

    /// Most recently inserted node
    pub fn newest(&self) -> Option<&GraphNode<A>> {
        self.store
            .len()
            .checked_sub(1)
            .and_then(|idx| self.store.node_at(idx))
    }

    /// Children of `id` in insertion order
    pub fn get_children(&self, id: &NodeId) -> Result<Vec<&GraphNode<A>>> {
        let idx = self.index(id)?;
        self.resolve_all(&self.store.child_indices(idx))
    }

    /// Nodes without an incoming edge, computed from current adjacency
    pub fn get_roots(&self) -> Vec<&GraphNode<A>> {
        self.root_indices()
            .into_iter()
            .filter_map(|idx| self.store.node_at(idx))
            .collect()
    }

    /// Nodes without an outgoing edge, computed from current adjacency
    pub fn get_leaves(&self) -> Vec<&GraphNode<A>> {
        self.store
            .iter()
            .filter(|(idx, _)| !self.store.has_children(*idx))
            .map(|(_, node)| node)
            .collect()
    }

    /// Structural parent of `id`
    pub fn parent(&self, id: &NodeId) -> Result<Option<&GraphNode<A>>> {
        let idx = self.index(id)?;
        Ok(self
            .store
            .parent_index(idx)
            .and_then(|p| self.store.node_at(p)))
    }

    /// Ancestors of `id`, nearest first
    pub fn ancestors(&self, id: &NodeId) -> Result<Vec<&GraphNode<A>>> {
        let mut current = self.index(id)?;
        let mut chain = Vec::new();
        while let Some(parent) = self.store.parent_index(current) {
            if let Some(node) = self.store.node_at(parent) {
                chain.push(node);
            }
            current = parent;
        }
        Ok(chain)
    }

    /// Holds for every DAG built through this API; exposed for validating
    /// externally constructed graphs.
    pub fn is_acyclic(&self) -> bool {
        !self.store.is_cyclic()
    }

    // ═══════════════════════════════════════════════════════════════════
    // Structure-preserving transforms
    // ═══════════════════════════════════════════════════════════════════

    /// Same ids, edges, depths and order; only payloads change
    pub fn map<B, F>(&self, f: F) -> Dag<B>
    where
        F: FnMut(&A) -> B,
    {
        Dag {
            store: self.store.map(f),
        }
    }

    /// Drop nodes failing `predicate` together with every edge touching them.
    ///
    /// Edges are not re-wired: a kept node whose parent was dropped becomes a
    /// root (no parent id, depth 0) and its kept descendants are re-numbered
    /// from there. The result round-trips through `to_records`/`from_records`.
    pub fn filter_nodes<P>(&self, predicate: P) -> Dag<A>
    where
        A: Clone,
        P: FnMut(&GraphNode<A>) -> bool,
    {
        Dag {
            store: self.store.retain(predicate),
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Index helpers
    // ═══════════════════════════════════════════════════════════════════

    pub(crate) fn index(&self, id: &NodeId) -> Result<usize> {
        self.store
            .index_of(id)
            .ok_or(GraphError::NodeNotFound(*id))
    }

    pub(crate) fn root_indices(&self) -> Vec<usize> {
        self.store
            .iter()
            .filter(|(idx, _)| self.store.parent_index(*idx).is_none())
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Resolve indices through the id mapping; a dangling index is a
    /// corrupted cross-reference.
    pub(crate) fn resolve(&self, idx: usize) -> Result<&GraphNode<A>> {
        let id = self.store.id_of(idx).ok_or_else(|| {
            GraphError::invalid_record(format!("dangling node index {}", idx))
        })?;
        self.store.get(&id).ok_or(GraphError::NodeNotFound(id))
    }

    pub(crate) fn resolve_all(&self, indices: &[usize]) -> Result<Vec<&GraphNode<A>>> {
        indices.iter().map(|&idx| self.resolve(idx)).collect()
    }
}

impl<A: PartialEq> PartialEq for Dag<A> {
    /// Same nodes (ids, payloads, provenance) in the same order, same edges
    fn eq(&self, other: &Self) -> bool {
        self.store.len() == other.store.len()
            && self
                .store
                .iter()
                .zip(other.store.iter())
                .all(|((_, a), (_, b))| a == b)
            && self.store.edge_pairs() == other.store.edge_pairs()
    }
}

impl<A: fmt::Debug> fmt::Debug for Dag<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dag")
            .field("nodes", &self.nodes().collect::<Vec<_>>())
            .field("edges", &self.store.edge_pairs())
            .finish()
    }
}
