//! Corpus statistics as a commutative monoid
//!
//! All counts are integers and all collections are ordered, so `combine`
//! is exactly associative and commutative. That is what makes batched and
//! parallel aggregation independent of batch size, worker count and
//! completion order.

use super::extractor::DocumentFeatures;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Associative combine with an identity element
pub trait Monoid: Sized {
    fn empty() -> Self;

    fn combine(self, other: Self) -> Self;

    fn concat<I>(items: I) -> Self
    where
        I: IntoIterator<Item = Self>,
    {
        items.into_iter().fold(Self::empty(), Self::combine)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorpusStatistics {
    pub document_count: u64,
    pub total_words: u64,
    pub total_sentences: u64,
    pub total_chars: u64,
    pub vocabulary: BTreeSet<String>,
    /// Occurrences of each term across the corpus
    pub term_frequency: BTreeMap<String, u64>,
    /// Number of documents containing each term
    pub document_frequency: BTreeMap<String, u64>,
}

impl CorpusStatistics {
    /// Statistics of a single document
    pub fn from_features(features: &DocumentFeatures) -> Self {
        let mut term_frequency: BTreeMap<String, u64> = BTreeMap::new();
        for token in &features.tokens {
            *term_frequency.entry(token.clone()).or_insert(0) += 1;
        }

        let vocabulary: BTreeSet<String> = term_frequency.keys().cloned().collect();
        let document_frequency = vocabulary.iter().map(|term| (term.clone(), 1)).collect();

        Self {
            document_count: 1,
            total_words: features.tokens.len() as u64,
            total_sentences: features.sentence_count as u64,
            total_chars: features.char_count as u64,
            vocabulary,
            term_frequency,
            document_frequency,
        }
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn document_frequency_of(&self, term: &str) -> u64 {
        self.document_frequency.get(term).copied().unwrap_or(0)
    }

    pub fn term_frequency_of(&self, term: &str) -> u64 {
        self.term_frequency.get(term).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

impl Monoid for CorpusStatistics {
    fn empty() -> Self {
        Self::default()
    }

    fn combine(self, other: Self) -> Self {
        // Merge the smaller side into the larger one
        let (mut into, from) = if self.vocabulary.len() >= other.vocabulary.len() {
            (self, other)
        } else {
            (other, self)
        };

        into.document_count += from.document_count;
        into.total_words += from.total_words;
        into.total_sentences += from.total_sentences;
        into.total_chars += from.total_chars;
        into.vocabulary.extend(from.vocabulary);
        merge_counts(&mut into.term_frequency, from.term_frequency);
        merge_counts(&mut into.document_frequency, from.document_frequency);
        into
    }
}

fn merge_counts(into: &mut BTreeMap<String, u64>, from: BTreeMap<String, u64>) {
    for (term, count) in from {
        *into.entry(term).or_insert(0) += count;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    fn features(id: &str, tokens: &[&str]) -> DocumentFeatures {
        DocumentFeatures {
            document_id: id.to_string(),
            tokens: tokens.iter().map(|t| t.to_string()).collect(),
            sentence_count: 1,
            char_count: tokens.iter().map(|t| t.len()).sum::<usize>() + tokens.len().saturating_sub(1),
        }
    }

    /// Small alphabet so generated documents share terms
    fn stats_from(raw: &[Vec<u8>]) -> CorpusStatistics {
        CorpusStatistics::concat(raw.iter().enumerate().map(|(i, doc)| {
            let tokens: Vec<String> = doc.iter().map(|b| format!("t{}", b % 6)).collect();
            CorpusStatistics::from_features(&DocumentFeatures {
                document_id: i.to_string(),
                char_count: tokens.iter().map(String::len).sum(),
                sentence_count: doc.len() / 4 + 1,
                tokens,
            })
        }))
    }

    #[test]
    fn test_single_document() {
        let stats = CorpusStatistics::from_features(&features("d1", &["the", "cat", "the"]));
        assert_eq!(stats.document_count, 1);
        assert_eq!(stats.total_words, 3);
        assert_eq!(stats.term_frequency_of("the"), 2);
        assert_eq!(stats.document_frequency_of("the"), 1);
        assert_eq!(stats.vocabulary_size(), 2);
    }

    #[test]
    fn test_combine_counts_documents_per_term() {
        let a = CorpusStatistics::from_features(&features("a", &["the", "cat"]));
        let b = CorpusStatistics::from_features(&features("b", &["the", "dog", "dog"]));
        let total = a.combine(b);

        assert_eq!(total.document_count, 2);
        assert_eq!(total.document_frequency_of("the"), 2);
        assert_eq!(total.document_frequency_of("dog"), 1);
        assert_eq!(total.term_frequency_of("dog"), 2);
        assert_eq!(total.vocabulary_size(), 3);
    }

    #[test]
    fn test_empty_is_identity_element() {
        assert!(CorpusStatistics::empty().is_empty());
        assert!(CorpusStatistics::concat(Vec::new()).is_empty());
    }

    #[quickcheck]
    fn qc_identity(raw: Vec<Vec<u8>>) -> bool {
        let stats = stats_from(&raw);
        stats.clone().combine(CorpusStatistics::empty()) == stats
            && CorpusStatistics::empty().combine(stats.clone()) == stats
    }

    #[quickcheck]
    fn qc_associative(a: Vec<Vec<u8>>, b: Vec<Vec<u8>>, c: Vec<Vec<u8>>) -> bool {
        let (a, b, c) = (stats_from(&a), stats_from(&b), stats_from(&c));
        a.clone().combine(b.clone()).combine(c.clone()) == a.combine(b.combine(c))
    }

    #[quickcheck]
    fn qc_commutative(a: Vec<Vec<u8>>, b: Vec<Vec<u8>>) -> bool {
        let (a, b) = (stats_from(&a), stats_from(&b));
        a.clone().combine(b.clone()) == b.combine(a)
    }
}
