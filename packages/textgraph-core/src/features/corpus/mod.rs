//! Corpus-scale aggregation
//!
//! ```text
//! documents ─► FeatureExtractor ─► CorpusStatistics (per doc)
//!                                        │ combine (monoid)
//!                                        ▼
//!                               corpus statistics ─► TF-IDF ─► similarity
//! ```

mod aggregator;
mod batch;
mod extractor;
mod statistics;
mod tfidf;

pub use aggregator::{Aggregation, CorpusAggregator};
pub use batch::{AggregateOptions, Progress};
pub use extractor::{Document, DocumentFeatures, FeatureExtractor, TextFeatureExtractor};
pub use statistics::{CorpusStatistics, Monoid};
pub use tfidf::{cosine_similarity, idf, tfidf_vector, top_k_similar, TfIdfVector};
