//! Traversal orders over a [`Dag`]
//!
//! All orders visit each node reachable from the start set exactly once.
//! Siblings are visited in insertion order. An empty start set visits
//! nothing (it is not an error); an unknown start id is `NodeNotFound`.

use super::engine::Dag;
use crate::errors::Result;
use crate::shared::models::{GraphNode, NodeId};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::{BinaryHeap, VecDeque};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraversalOrder {
    /// Pre-order, first child first
    DepthFirst,
    /// Level by level
    BreadthFirst,
    /// Every parent strictly before all of its descendants
    Topological,
}

impl<A> Dag<A> {
    /// Traverse from the current roots
    pub fn traverse(&self, order: TraversalOrder) -> Result<Vec<&GraphNode<A>>> {
        let starts = self.root_indices();
        self.resolve_all(&self.walk(&starts, order))
    }

    /// Traverse from an explicit start set
    pub fn traverse_from(&self, start: &[NodeId], order: TraversalOrder) -> Result<Vec<&GraphNode<A>>> {
        let starts = start
            .iter()
            .map(|id| self.index(id))
            .collect::<Result<Vec<_>>>()?;
        self.resolve_all(&self.walk(&starts, order))
    }

    pub(crate) fn walk(&self, starts: &[usize], order: TraversalOrder) -> Vec<usize> {
        match order {
            TraversalOrder::DepthFirst => self.depth_first(starts),
            TraversalOrder::BreadthFirst => self.breadth_first(starts),
            TraversalOrder::Topological => self.topological(starts),
        }
    }

    fn depth_first(&self, starts: &[usize]) -> Vec<usize> {
        let store = self.store();
        let mut visited = vec![false; store.len()];
        let mut order = Vec::new();
        let mut stack: Vec<usize> = starts.iter().rev().copied().collect();

        while let Some(idx) = stack.pop() {
            if visited[idx] {
                continue;
            }
            visited[idx] = true;
            order.push(idx);

            for child in store.child_indices(idx).into_iter().rev() {
                if !visited[child] {
                    stack.push(child);
                }
            }
        }

        order
    }

    fn breadth_first(&self, starts: &[usize]) -> Vec<usize> {
        let store = self.store();
        let mut visited = vec![false; store.len()];
        let mut order = Vec::new();
        let mut queue = VecDeque::new();

        for &idx in starts {
            if !visited[idx] {
                visited[idx] = true;
                queue.push_back(idx);
            }
        }

        while let Some(idx) = queue.pop_front() {
            order.push(idx);
            for child in store.child_indices(idx) {
                if !visited[child] {
                    visited[child] = true;
                    queue.push_back(child);
                }
            }
        }

        order
    }

    /// Kahn's algorithm restricted to the nodes reachable from `starts`.
    /// Ready nodes are released smallest index first for a stable order.
    fn topological(&self, starts: &[usize]) -> Vec<usize> {
        let store = self.store();
        let reachable = self.depth_first(starts);

        let mut in_reach = vec![false; store.len()];
        for &idx in &reachable {
            in_reach[idx] = true;
        }

        // In-degree counting only edges from reachable parents
        let mut in_degree = vec![0usize; store.len()];
        for &idx in &reachable {
            for child in store.child_indices(idx) {
                in_degree[child] += 1;
            }
        }

        let mut ready: BinaryHeap<Reverse<usize>> = reachable
            .iter()
            .filter(|&&idx| in_degree[idx] == 0)
            .map(|&idx| Reverse(idx))
            .collect();

        let mut order = Vec::with_capacity(reachable.len());
        while let Some(Reverse(idx)) = ready.pop() {
            order.push(idx);
            for child in store.child_indices(idx) {
                if !in_reach[child] {
                    continue;
                }
                in_degree[child] -= 1;
                if in_degree[child] == 0 {
                    ready.push(Reverse(child));
                }
            }
        }

        order
    }
}
