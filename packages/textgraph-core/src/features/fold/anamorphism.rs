//! Top-down unfold from a seed
//!
//! Seeds are expanded breadth-first, so siblings keep the order the
//! coalgebra returned them in. Termination is the coalgebra's
//! responsibility; `ana_with_cancel` lets a caller stop a runaway unfold.

use crate::errors::{GraphError, Result};
use crate::features::dag::Dag;
use crate::shared::cancellation::CancellationToken;
use crate::shared::models::NodeId;
use std::collections::VecDeque;

/// Operation name recorded on every non-root node built by an unfold
pub const UNFOLD_OPERATION: &str = "unfold";

/// Build a DAG from `seed`; the seed's payload becomes the single root
pub fn ana<S, A, F>(seed: S, coalgebra: F) -> Result<Dag<A>>
where
    F: FnMut(S) -> (A, Vec<S>),
{
    unfold(seed, coalgebra, None)
}

/// Like [`ana`], checking `cancel` before expanding each seed
pub fn ana_with_cancel<S, A, F>(seed: S, coalgebra: F, cancel: &CancellationToken) -> Result<Dag<A>>
where
    F: FnMut(S) -> (A, Vec<S>),
{
    unfold(seed, coalgebra, Some(cancel))
}

fn unfold<S, A, F>(seed: S, mut coalgebra: F, cancel: Option<&CancellationToken>) -> Result<Dag<A>>
where
    F: FnMut(S) -> (A, Vec<S>),
{
    let mut dag = Dag::empty();
    let mut queue: VecDeque<(S, Option<NodeId>)> = VecDeque::new();
    queue.push_back((seed, None));

    while let Some((seed, parent)) = queue.pop_front() {
        if cancel.map_or(false, CancellationToken::is_cancelled) {
            tracing::debug!(nodes = dag.len(), "unfold cancelled");
            return Err(GraphError::Cancelled);
        }

        let (data, children) = coalgebra(seed);
        let operation = parent.map(|_| UNFOLD_OPERATION);
        let id = dag.insert(data, parent.as_ref(), operation)?;
        queue.extend(children.into_iter().map(|child| (child, Some(id))));
    }

    Ok(dag)
}
