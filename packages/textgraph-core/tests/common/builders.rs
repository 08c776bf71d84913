use textgraph_core::{Dag, NodeId};

/// Build a DAG from a parent table: entry `i` is the index of node `i`'s
/// parent (always `< i`) or `None` for a root. Payload is the node index.
pub fn dag_from_parents(parents: &[Option<usize>]) -> (Dag<usize>, Vec<NodeId>) {
    let mut dag = Dag::empty();
    let mut ids: Vec<NodeId> = Vec::with_capacity(parents.len());

    for (i, parent) in parents.iter().enumerate() {
        let parent_id = parent.map(|p| ids[p]);
        let op = parent.map(|_| "derive");
        let id = dag
            .insert(i, parent_id.as_ref(), op)
            .expect("parent inserted earlier");
        ids.push(id);
    }

    (dag, ids)
}

/// Same shape through the persistent API, one version per call
pub fn dag_from_parents_persistent(parents: &[Option<usize>]) -> Vec<Dag<usize>> {
    let mut versions = vec![Dag::empty()];
    let mut ids: Vec<NodeId> = Vec::new();

    for (i, parent) in parents.iter().enumerate() {
        let current = versions.last().cloned().unwrap_or_default();
        let parent_id = parent.map(|p| ids[p]);
        let next = current
            .add_node(i, parent_id.as_ref(), parent.map(|_| "derive"))
            .expect("parent inserted earlier");
        ids.push(next.newest().expect("just inserted").id);
        versions.push(next);
    }

    versions
}
