//! Inverted attribute index over DAG nodes
//!
//! Built once from a key-extraction function; read-only afterwards.
//! Rebuild to reflect later inserts.
//!
//! # Performance
//!
//! - build: O(total keys)
//! - query: O(hits)
//! - intersection: smallest posting first, stops as soon as the running set is empty

use crate::features::dag::Dag;
use crate::shared::models::{GraphNode, NodeId};
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::hash::Hash;

/// `name = value` attribute emitted for a node (e.g. `type = token`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AttributeKey {
    pub name: String,
    pub value: String,
}

impl AttributeKey {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for AttributeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)
    }
}

pub struct SearchIndex<K> {
    /// Key → positions into `ids`, ordered
    postings: AHashMap<K, BTreeSet<usize>>,

    /// Indexed ids in first-seen order
    ids: Vec<NodeId>,
}

impl<K: Hash + Eq> SearchIndex<K> {
    /// Index `(id, item)` pairs. An item may emit zero, one or many keys;
    /// an id seen twice keeps its first position.
    pub fn build<T, I, F>(items: I, mut key_fn: F) -> Self
    where
        I: IntoIterator<Item = (NodeId, T)>,
        F: FnMut(&T) -> Vec<K>,
    {
        let mut postings: AHashMap<K, BTreeSet<usize>> = AHashMap::new();
        let mut ids = Vec::new();
        let mut position: HashMap<NodeId, usize> = HashMap::new();

        for (id, item) in items {
            let pos = *position.entry(id).or_insert_with(|| {
                ids.push(id);
                ids.len() - 1
            });
            for key in key_fn(&item) {
                postings.entry(key).or_default().insert(pos);
            }
        }

        Self { postings, ids }
    }

    /// Index every node of `dag`
    pub fn from_dag<A, F>(dag: &Dag<A>, mut key_fn: F) -> Self
    where
        F: FnMut(&GraphNode<A>) -> Vec<K>,
    {
        Self::build(dag.nodes().map(|node| (node.id, node)), |node| key_fn(*node))
    }

    /// Ids carrying `key`; empty for an unknown key
    pub fn query(&self, key: &K) -> Vec<NodeId> {
        self.postings
            .get(key)
            .map(|posting| self.resolve(posting.iter().copied()))
            .unwrap_or_default()
    }

    /// Ids carrying at least one of `keys`
    pub fn query_union(&self, keys: &[K]) -> Vec<NodeId> {
        let mut hits = BTreeSet::new();
        for key in keys {
            match self.postings.get(key) {
                Some(posting) if !posting.is_empty() => hits.extend(posting.iter().copied()),
                _ => continue,
            }
        }
        self.resolve(hits.into_iter())
    }

    /// Ids carrying every one of `keys`; empty for an empty key list
    pub fn query_intersection(&self, keys: &[K]) -> Vec<NodeId> {
        if keys.is_empty() {
            return Vec::new();
        }

        let mut postings = Vec::with_capacity(keys.len());
        for key in keys {
            match self.postings.get(key) {
                Some(posting) if !posting.is_empty() => postings.push(posting),
                // A missing key empties the whole intersection
                _ => return Vec::new(),
            }
        }
        postings.sort_by_key(|posting| posting.len());

        let mut running: BTreeSet<usize> = postings[0].clone();
        for posting in &postings[1..] {
            running.retain(|pos| posting.contains(pos));
            if running.is_empty() {
                return Vec::new();
            }
        }

        self.resolve(running.into_iter())
    }

    /// Number of distinct keys
    pub fn key_count(&self) -> usize {
        self.postings.len()
    }

    /// Number of indexed ids
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    fn resolve(&self, positions: impl Iterator<Item = usize>) -> Vec<NodeId> {
        positions.filter_map(|pos| self.ids.get(pos).copied()).collect()
    }
}
