//! Transport records for cross-process exchange of a [`Dag`]
//!
//! `from_records` is the entry point for externally constructed graphs and
//! validates everything `insert` guarantees by construction.

use super::engine::Dag;
use super::node_store::NodeStore;
use crate::errors::{GraphError, Result};
use crate::shared::models::{GraphNode, NodeId, NodeRecord};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;

impl<A: Clone> Dag<A> {
    /// Records in insertion order
    pub fn to_records(&self) -> Vec<NodeRecord<A>> {
        self.nodes().map(NodeRecord::from).collect()
    }
}

impl<A> Dag<A> {
    /// Rebuild a DAG from records in any order.
    ///
    /// # Errors
    /// - malformed or duplicate id: `InvalidRecord`
    /// - parent id not among the records: `NodeNotFound`
    /// - parent chain loops back on itself: `Cycle`
    /// - recorded depth differs from the parent chain: `InvalidRecord`
    pub fn from_records(records: Vec<NodeRecord<A>>) -> Result<Dag<A>> {
        let mut nodes = Vec::with_capacity(records.len());
        let mut position: HashMap<NodeId, usize> = HashMap::with_capacity(records.len());

        for record in records {
            let id = parse_id(&record.id)?;
            let parent_id = record.parent_id.as_deref().map(parse_id).transpose()?;
            if position.insert(id, nodes.len()).is_some() {
                return Err(GraphError::invalid_record(format!("duplicate node id {}", id)));
            }
            nodes.push(GraphNode {
                id,
                data: record.data,
                parent_id,
                metadata: record.metadata,
            });
        }

        let parents: Vec<Option<usize>> = nodes
            .iter()
            .map(|node| match node.parent_id {
                Some(pid) => position
                    .get(&pid)
                    .copied()
                    .map(Some)
                    .ok_or(GraphError::NodeNotFound(pid)),
                None => Ok(None),
            })
            .collect::<Result<_>>()?;

        let depths = resolve_depths(&nodes, &parents)?;
        for (node, depth) in nodes.iter().zip(&depths) {
            if node.depth() != *depth {
                return Err(GraphError::invalid_record(format!(
                    "node {} records depth {} but its parent chain gives {}",
                    node.id,
                    node.depth(),
                    depth
                )));
            }
        }

        let mut store = NodeStore::with_capacity(nodes.len());
        for node in nodes {
            store.insert(node)?;
        }

        // Store indices equal record positions. Chains are already proven
        // acyclic and each record names at most one parent.
        for (child, parent) in parents.iter().enumerate() {
            if let Some(parent) = parent {
                store.add_edge(*parent, child);
            }
        }

        Ok(Dag::from_store(store))
    }
}

impl<A: Clone + Serialize> Dag<A> {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.to_records())?)
    }
}

impl<A: DeserializeOwned> Dag<A> {
    pub fn from_json(json: &str) -> Result<Dag<A>> {
        let records: Vec<NodeRecord<A>> = serde_json::from_str(json)?;
        Dag::from_records(records)
    }
}

fn parse_id(raw: &str) -> Result<NodeId> {
    raw.parse()
        .map_err(|e| GraphError::invalid_record(format!("malformed node id '{}': {}", raw, e)))
}

/// Depth of every record by walking parent chains iteratively.
/// A chain that revisits a node still being resolved is a cycle.
fn resolve_depths<A>(nodes: &[GraphNode<A>], parents: &[Option<usize>]) -> Result<Vec<usize>> {
    const UNSEEN: u8 = 0;
    const ON_PATH: u8 = 1;
    const DONE: u8 = 2;

    let mut state = vec![UNSEEN; nodes.len()];
    let mut depth = vec![0usize; nodes.len()];

    for start in 0..nodes.len() {
        if state[start] == DONE {
            continue;
        }

        let mut path = Vec::new();
        let mut current = start;
        loop {
            match state[current] {
                DONE => break,
                ON_PATH => {
                    let child = nodes[current].id;
                    let parent = nodes[current].parent_id.unwrap_or(child);
                    return Err(GraphError::Cycle { parent, child });
                }
                _ => {}
            }
            state[current] = ON_PATH;
            path.push(current);
            match parents[current] {
                Some(parent) => current = parent,
                None => break,
            }
        }

        // Unwind from the top of the chain
        while let Some(idx) = path.pop() {
            depth[idx] = match parents[idx] {
                Some(parent) => depth[parent] + 1,
                None => 0,
            };
            state[idx] = DONE;
        }
    }

    Ok(depth)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn chain() -> Dag<String> {
        let mut dag = Dag::singleton("doc".to_string());
        let root = dag.get_roots()[0].id;
        let s = dag.insert("sentence".to_string(), Some(&root), Some("sentencize")).unwrap();
        dag.insert("token".to_string(), Some(&s), Some("tokenize")).unwrap();
        dag
    }

    #[test]
    fn test_records_roundtrip() {
        let dag = chain();
        let rebuilt = Dag::from_records(dag.to_records()).unwrap();
        assert_eq!(rebuilt, dag);
    }

    #[test]
    fn test_records_any_order() {
        let dag = chain();
        let mut records = dag.to_records();
        records.reverse();

        let rebuilt = Dag::from_records(records).unwrap();
        assert_eq!(rebuilt.len(), 3);
        assert_eq!(rebuilt.edge_count(), 2);
        assert!(rebuilt.is_acyclic());
    }

    #[test]
    fn test_long_reversed_chain() {
        let mut dag = Dag::singleton(0usize);
        let mut tip = dag.get_roots()[0].id;
        for i in 1..20_000 {
            tip = dag.insert(i, Some(&tip), Some("extend")).unwrap();
        }
        let mut records = dag.to_records();
        records.reverse();

        let rebuilt = Dag::from_records(records).unwrap();
        assert_eq!(rebuilt.edge_count(), 19_999);
        assert_eq!(rebuilt.get(&tip).unwrap().depth(), 19_999);
        assert_eq!(rebuilt.parent(&tip).unwrap().unwrap().data, 19_998);
        assert_eq!(rebuilt.get_roots().len(), 1);
    }

    #[test]
    fn test_json_roundtrip() {
        let dag = chain();
        let json = dag.to_json().unwrap();
        assert!(json.contains("\"parentId\""));

        let back: Dag<String> = Dag::from_json(&json).unwrap();
        assert_eq!(back, dag);
    }

    #[test]
    fn test_unknown_parent() {
        let mut records = chain().to_records();
        let ghost = NodeId::new();
        records[2].parent_id = Some(ghost.to_string());

        let err = Dag::from_records(records).unwrap_err();
        assert!(matches!(err, GraphError::NodeNotFound(id) if id == ghost));
    }

    #[test]
    fn test_parent_loop_is_cycle() {
        let mut records = chain().to_records();
        // root now claims the token as its parent: root → sentence → token → root
        records[0].parent_id = Some(records[2].id.clone());

        assert!(matches!(
            Dag::from_records(records),
            Err(GraphError::Cycle { .. })
        ));
    }

    #[test]
    fn test_depth_mismatch() {
        let mut records = chain().to_records();
        records[2].metadata.depth = 5;
        assert!(matches!(
            Dag::from_records(records),
            Err(GraphError::InvalidRecord(_))
        ));
    }

    #[test]
    fn test_duplicate_and_malformed_ids() {
        let mut records = chain().to_records();
        records[1].id = records[0].id.clone();
        assert!(matches!(
            Dag::from_records(records),
            Err(GraphError::InvalidRecord(_))
        ));

        let mut records = chain().to_records();
        records[0].id = "nope".to_string();
        assert!(matches!(
            Dag::from_records(records),
            Err(GraphError::InvalidRecord(_))
        ));
    }
}
