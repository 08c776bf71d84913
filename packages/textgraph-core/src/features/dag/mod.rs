//! Provenance DAG
//!
//! ```text
//! NodeStore (records + id ↔ index)
//!      ↑
//! Dag (insert/connect, queries, map/filter)
//!      ↑
//! traversal (DFS / BFS / topological), records (transport)
//! ```

mod engine;
mod node_store;
mod records;
mod traversal;

pub use engine::Dag;
pub use node_store::NodeStore;
pub use traversal::TraversalOrder;
