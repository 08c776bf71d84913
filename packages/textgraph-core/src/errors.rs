//! Error types for textgraph-core
//!
//! Provides unified error handling across the crate.

use crate::config::ConfigError;
use crate::shared::models::NodeId;
use thiserror::Error;

/// Failure reported by a text-feature collaborator or a per-document extractor
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Extraction failed{}: {message}", document_suffix(.document))]
pub struct ExtractionError {
    /// Document the failure belongs to, if known
    pub document: Option<String>,
    /// Human-readable cause
    pub message: String,
}

fn document_suffix(document: &Option<String>) -> String {
    match document {
        Some(id) => format!(" for document '{}'", id),
        None => String::new(),
    }
}

impl ExtractionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            document: None,
            message: message.into(),
        }
    }

    /// Attach the failing document id (keeps an id that is already set)
    pub fn for_document(mut self, document: impl Into<String>) -> Self {
        if self.document.is_none() {
            self.document = Some(document.into());
        }
        self
    }
}

/// Main error type for textgraph-core operations
#[derive(Debug, Error)]
pub enum GraphError {
    /// Inserting `parent → child` would close a cycle. The DAG is left unchanged.
    #[error("Cycle detected: edge {parent} -> {child} would make {child} its own ancestor")]
    Cycle { parent: NodeId, child: NodeId },

    /// A referenced node is absent from the store
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    /// Edge rejected for a reason other than a cycle (second parent, depth drift)
    #[error("Invalid edge {parent} -> {child}: {reason}")]
    InvalidEdge {
        parent: NodeId,
        child: NodeId,
        reason: String,
    },

    /// Externally produced node record failed validation
    #[error("Invalid node record: {0}")]
    InvalidRecord(String),

    /// Per-document extraction failed; the aggregation was aborted
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    /// Operation stopped by its cancellation token
    #[error("Operation cancelled")]
    Cancelled,

    /// Worker pool could not be built
    #[error("Thread pool error: {0}")]
    ThreadPool(String),

    /// JSON (de)serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl GraphError {
    /// Structural invariant violations are never worth retrying
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            GraphError::Cycle { .. }
                | GraphError::NodeNotFound(_)
                | GraphError::InvalidEdge { .. }
                | GraphError::InvalidRecord(_)
        )
    }

    /// Extraction failures may succeed when the caller re-runs the same input
    pub fn is_retryable(&self) -> bool {
        matches!(self, GraphError::Extraction(_))
    }

    pub fn invalid_record(msg: impl Into<String>) -> Self {
        GraphError::InvalidRecord(msg.into())
    }
}

/// Result type alias for textgraph operations
pub type Result<T> = std::result::Result<T, GraphError>;
