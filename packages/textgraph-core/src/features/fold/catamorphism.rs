//! Bottom-up fold with per-node memoization
//!
//! Iterative post-order over an explicit stack, so deep corpora do not hit
//! call-stack limits. Results are memoized by dense index: the algebra runs
//! exactly once per reachable node, and only after all of that node's
//! children have been folded. Children results arrive in insertion order.

use crate::errors::{GraphError, Result};
use crate::features::dag::Dag;
use crate::shared::models::{GraphNode, NodeId};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Visit {
    Unseen,
    Expanded,
    Done,
}

/// Fold every root; one result per root, in root order
pub fn cata<A, B, F>(dag: &Dag<A>, mut algebra: F) -> Result<Vec<B>>
where
    B: Clone,
    F: FnMut(&GraphNode<A>, Vec<B>) -> B,
{
    let roots = dag.root_indices();
    fold_indices(dag, &roots, |node, children| Ok(algebra(node, children)))
}

/// Fold the sub-DAGs rooted at `start`; one result per start id
pub fn cata_from<A, B, F>(dag: &Dag<A>, start: &[NodeId], mut algebra: F) -> Result<Vec<B>>
where
    B: Clone,
    F: FnMut(&GraphNode<A>, Vec<B>) -> B,
{
    let starts = start
        .iter()
        .map(|id| dag.index(id))
        .collect::<Result<Vec<_>>>()?;
    fold_indices(dag, &starts, |node, children| Ok(algebra(node, children)))
}

/// Fold with a fallible algebra. The first algebra error stops the fold.
pub fn try_cata<A, B, E, F>(dag: &Dag<A>, algebra: F) -> std::result::Result<Vec<B>, E>
where
    B: Clone,
    E: From<GraphError>,
    F: FnMut(&GraphNode<A>, Vec<B>) -> std::result::Result<B, E>,
{
    let roots = dag.root_indices();
    fold_indices(dag, &roots, algebra)
}

fn fold_indices<A, B, E, F>(dag: &Dag<A>, starts: &[usize], mut algebra: F) -> std::result::Result<Vec<B>, E>
where
    B: Clone,
    E: From<GraphError>,
    F: FnMut(&GraphNode<A>, Vec<B>) -> std::result::Result<B, E>,
{
    let store = dag.store();
    let mut memo: Vec<Option<B>> = vec![None; store.len()];
    let mut visit = vec![Visit::Unseen; store.len()];

    for &start in starts {
        let mut stack = vec![(start, false)];

        while let Some((idx, children_done)) = stack.pop() {
            if visit[idx] == Visit::Done {
                continue;
            }

            if !children_done {
                if visit[idx] == Visit::Expanded {
                    // Reached again while its own subtree is pending
                    let node = dag.resolve(idx)?;
                    return Err(GraphError::Cycle {
                        parent: node.id,
                        child: node.id,
                    }
                    .into());
                }
                visit[idx] = Visit::Expanded;
                stack.push((idx, true));
                for child in store.child_indices(idx).into_iter().rev() {
                    if visit[child] != Visit::Done {
                        stack.push((child, false));
                    }
                }
                continue;
            }

            let node = dag.resolve(idx)?;
            let mut child_results = Vec::new();
            for child in store.child_indices(idx) {
                let result = memo[child].clone().ok_or_else(|| {
                    let missing = store.id_of(child).unwrap_or(node.id);
                    GraphError::NodeNotFound(missing)
                })?;
                child_results.push(result);
            }

            memo[idx] = Some(algebra(node, child_results)?);
            visit[idx] = Visit::Done;
        }
    }

    starts
        .iter()
        .map(|&idx| {
            memo[idx].clone().ok_or_else(|| {
                let id = store.id_of(idx).unwrap_or_default();
                E::from(GraphError::NodeNotFound(id))
            })
        })
        .collect()
}
