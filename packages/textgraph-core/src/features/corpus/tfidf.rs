//! TF-IDF weighting and cosine similarity
//!
//! tf(t, d)  = count(t, d) / |d|
//! idf(t)    = ln(N / df(t)), 0 when N or df(t) is 0
//! weight    = tf * idf
//!
//! A term present in every document has idf 0 and never contributes to
//! similarity.

use super::aggregator::CorpusAggregator;
use super::batch::AggregateOptions;
use super::extractor::FeatureExtractor;
use super::statistics::CorpusStatistics;
use crate::errors::Result;
use std::cmp::Ordering;
use std::collections::BTreeMap;

pub type TfIdfVector = BTreeMap<String, f64>;

pub fn idf(document_count: u64, document_frequency: u64) -> f64 {
    if document_count == 0 || document_frequency == 0 {
        return 0.0;
    }
    (document_count as f64 / document_frequency as f64).ln().max(0.0)
}

/// Weights for one document's tokens against corpus-wide statistics
pub fn tfidf_vector(tokens: &[String], statistics: &CorpusStatistics) -> TfIdfVector {
    if tokens.is_empty() {
        return TfIdfVector::new();
    }

    let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
    for token in tokens {
        *counts.entry(token.as_str()).or_insert(0) += 1;
    }

    let length = tokens.len() as f64;
    counts
        .into_iter()
        .map(|(term, count)| {
            let tf = count as f64 / length;
            let weight = tf * idf(statistics.document_count, statistics.document_frequency_of(term));
            (term.to_string(), weight)
        })
        .collect()
}

/// Cosine of the angle between two vectors, in [0, 1].
/// Returns 0 when either vector has zero norm.
pub fn cosine_similarity(a: &TfIdfVector, b: &TfIdfVector) -> f64 {
    // Terms missing from one side contribute 0 to the dot product
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let dot: f64 = small
        .iter()
        .filter_map(|(term, x)| large.get(term).map(|y| x * y))
        .sum();

    let norm_a = a.values().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b = b.values().map(|x| x * x).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    (dot / (norm_a * norm_b)).clamp(0.0, 1.0)
}

/// Up to `k` documents most similar to `query`, best first. Ties keep
/// document order; zero scores are skipped.
pub fn top_k_similar(query: &TfIdfVector, vectors: &[(String, TfIdfVector)], k: usize) -> Vec<(String, f64)> {
    let mut scored: Vec<(String, f64)> = vectors
        .iter()
        .map(|(id, vector)| (id.clone(), cosine_similarity(query, vector)))
        .filter(|(_, score)| *score > 0.0)
        .collect();

    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    scored.truncate(k);
    scored
}

impl CorpusAggregator {
    /// Two passes: corpus statistics first, then one vector per document
    /// (in input order, keyed by document id).
    pub fn compute_tfidf<D, E>(&self, documents: &[D], extractor: &E) -> Result<Vec<(String, TfIdfVector)>>
    where
        D: Sync,
        E: FeatureExtractor<D>,
    {
        let statistics = self.aggregate(documents, extractor)?;

        self.process_parallel(
            documents,
            |document| {
                let features = extractor.extract(document)?;
                let vector = tfidf_vector(&features.tokens, &statistics);
                Ok((features.document_id, vector))
            },
            AggregateOptions::default(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::corpus::extractor::DocumentFeatures;
    use crate::features::corpus::statistics::Monoid;

    fn vector(pairs: &[(&str, f64)]) -> TfIdfVector {
        pairs.iter().map(|(t, w)| (t.to_string(), *w)).collect()
    }

    #[test]
    fn test_idf_edge_cases() {
        assert_eq!(idf(0, 0), 0.0);
        assert_eq!(idf(5, 0), 0.0);
        assert_eq!(idf(3, 3), 0.0);
        assert!((idf(3, 1) - 3f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn test_tfidf_vector() {
        let docs = [vec!["a", "b"], vec!["a", "c"]];
        let stats = CorpusStatistics::concat(docs.iter().enumerate().map(|(i, tokens)| {
            CorpusStatistics::from_features(&DocumentFeatures {
                document_id: i.to_string(),
                tokens: tokens.iter().map(|t| t.to_string()).collect(),
                sentence_count: 1,
                char_count: 3,
            })
        }));

        let tokens: Vec<String> = vec!["a".into(), "b".into(), "b".into()];
        let weights = tfidf_vector(&tokens, &stats);
        assert_eq!(weights["a"], 0.0);
        assert!((weights["b"] - (2.0 / 3.0) * 2f64.ln()).abs() < 1e-12);
        assert!(tfidf_vector(&[], &stats).is_empty());
    }

    #[test]
    fn test_cosine_bounds() {
        let a = vector(&[("x", 1.0), ("y", 2.0)]);
        assert!((cosine_similarity(&a, &a) - 1.0).abs() < 1e-12);
        assert_eq!(cosine_similarity(&a, &vector(&[("z", 3.0)])), 0.0);
        assert_eq!(cosine_similarity(&a, &TfIdfVector::new()), 0.0);
        assert_eq!(cosine_similarity(&vector(&[("x", 0.0)]), &a), 0.0);
    }

    #[test]
    fn test_top_k() {
        let query = vector(&[("x", 1.0)]);
        let vectors = vec![
            ("none".to_string(), vector(&[("z", 1.0)])),
            ("half".to_string(), vector(&[("x", 1.0), ("y", 1.0)])),
            ("same".to_string(), vector(&[("x", 2.0)])),
            ("tie".to_string(), vector(&[("x", 5.0)])),
        ];

        let ranked = top_k_similar(&query, &vectors, 2);
        let ids: Vec<&str> = ranked.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["same", "tie"]);

        assert_eq!(top_k_similar(&query, &vectors, 10).len(), 3);
    }
}
