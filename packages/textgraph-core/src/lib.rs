/*
 * textgraph-core - Provenance DAGs for text pipelines
 *
 * Feature-First Architecture:
 * - shared/      : Common models (NodeId, GraphNode, records), cancellation
 * - features/    : dag → fold → search, corpus aggregation, text pipeline
 * - config/      : Aggregation settings + YAML loading
 *
 * Performance:
 * - Dense-index adjacency (petgraph) behind stable ids
 * - Iterative folds and traversals (no recursion limits)
 * - Rayon work-stealing inside each aggregation batch
 */

#![allow(clippy::type_complexity)] // Closure-heavy generic signatures

pub mod config;
pub mod errors;
pub mod features;
pub mod shared;

pub use config::{AggregationConfig, ConfigError};
pub use errors::{ExtractionError, GraphError, Result};
pub use features::corpus::{
    cosine_similarity, top_k_similar, AggregateOptions, Aggregation, CorpusAggregator, CorpusStatistics, Document,
    DocumentFeatures, FeatureExtractor, Monoid, Progress, TextFeatureExtractor, TfIdfVector,
};
pub use features::dag::{Dag, NodeStore, TraversalOrder};
pub use features::fold::{ana, ana_with_cancel, cata, cata_from, try_cata};
pub use features::search::{AttributeKey, SearchIndex};
pub use features::text::{TextFeatures, TextNode, TextPipeline, WhitespaceTextFeatures};
pub use shared::cancellation::CancellationToken;
pub use shared::models::{GraphNode, NodeId, NodeMetadata, NodeRecord};
