use textgraph_core::Dag;

/// depth == 0 iff no parent, otherwise parent depth + 1
pub fn assert_depth_invariant<A>(dag: &Dag<A>) {
    for node in dag.nodes() {
        match node.parent_id {
            None => assert_eq!(node.depth(), 0, "root {} has non-zero depth", node.id),
            Some(parent) => {
                let parent = dag.get(&parent).expect("parent present");
                assert_eq!(node.depth(), parent.depth() + 1, "depth drift at {}", node.id);
            }
        }
    }
}

/// Every recorded parent id matches the structural parent edge
pub fn assert_edges_match_provenance<A>(dag: &Dag<A>) {
    for node in dag.nodes() {
        let structural = dag.parent(&node.id).expect("node present").map(|p| p.id);
        assert_eq!(structural, node.parent_id);
    }
}
